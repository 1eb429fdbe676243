//! Tests for PCM payload decoding.

use super::*;
use crate::error::AudioError;

// ============================================================================
// Byte reinterpretation
// ============================================================================

#[test]
fn test_pcm_from_le_bytes() {
    let data = [
        0x00, 0x04, // 1024
        0x00, 0x08, // 2048
        0xFF, 0xFF, // -1
        0x00, 0x80, // -32768
    ];
    assert_eq!(pcm_from_le_bytes(&data), vec![1024, 2048, -1, -32768]);
}

#[test]
fn test_pcm_odd_trailing_byte_dropped() {
    // 3 raw bytes yield exactly one sample.
    assert_eq!(pcm_from_le_bytes(&[0x01, 0x00, 0x7F]), vec![1]);
    assert!(pcm_from_le_bytes(&[0x7F]).is_empty());
}

// ============================================================================
// Base64 decoding
// ============================================================================

#[test]
fn test_decode_length_is_half_byte_length() {
    for byte_len in [0usize, 2, 4, 10, 480] {
        let bytes: Vec<u8> = (0..byte_len).map(|i| i as u8).collect();
        let payload = STANDARD.encode(&bytes);
        let samples = decode_base64_pcm(&payload).unwrap();
        assert_eq!(samples.len(), byte_len / 2);
    }
}

#[test]
fn test_decode_odd_payload() {
    // "AQB/" is [0x01, 0x00, 0x7F]
    let samples = decode_base64_pcm("AQB/").unwrap();
    assert_eq!(samples, vec![1]);
}

#[test]
fn test_decode_rejects_invalid_characters() {
    let err = decode_base64_pcm("AAAA!AAA").unwrap_err();
    assert!(matches!(err, AudioError::Decode(_)));
    assert!(err.is_decode());
}

#[test]
fn test_decode_rejects_bad_padding() {
    assert!(decode_base64_pcm("AEAAgA=").is_err());
    assert!(decode_base64_pcm("AEAAgA").is_err());
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_normalize_bounds() {
    assert_eq!(normalize_sample(-32768), -1.0);
    assert_eq!(normalize_sample(0), 0.0);
    let max = normalize_sample(32767);
    assert!((max - 0.999_969).abs() < 1e-6);
    assert!(max < 1.0);
}

#[test]
fn test_normalize_range_for_all_samples() {
    for s in i16::MIN..=i16::MAX {
        let v = normalize_sample(s);
        assert!((-1.0..1.0).contains(&v), "sample {} normalized to {}", s, v);
        assert_eq!(v, s as f32 / 32768.0);
    }
}

#[test]
fn test_known_vector() {
    let raw: [i16; 5] = [0, 16384, -16384, 32767, -32768];
    let payload = encode_base64_pcm(&raw);

    let buffer = decode_payload(&payload, Format::MONO_24K).unwrap();
    let samples = buffer.samples();

    assert_eq!(samples.len(), 5);
    assert_eq!(samples[0], 0.0);
    assert_eq!(samples[1], 0.5);
    assert_eq!(samples[2], -0.5);
    assert_eq!(samples[3], 32767.0 / 32768.0);
    assert_eq!(samples[4], -1.0);
}

#[test]
fn test_decode_payload_format() {
    let buffer = decode_payload(&encode_base64_pcm(&[0i16; 2400]), Format::MONO_24K).unwrap();
    assert_eq!(buffer.format(), Format::MONO_24K);
    assert_eq!(buffer.frames(), 2400);
    assert_eq!(buffer.duration(), std::time::Duration::from_millis(100));
}

#[test]
fn test_decode_payload_empty_string() {
    let buffer = decode_payload("", Format::MONO_24K).unwrap();
    assert!(buffer.is_empty());
}

// ============================================================================
// SampleBuffer
// ============================================================================

#[test]
fn test_buffer_channel_and_mono() {
    let buffer = SampleBuffer::new(Format::new(24000, 2), vec![0.5, -0.5, 1.0, 0.0]);
    assert_eq!(buffer.frames(), 2);
    assert_eq!(buffer.channel(0).collect::<Vec<_>>(), vec![0.5, 1.0]);
    assert_eq!(buffer.channel(1).collect::<Vec<_>>(), vec![-0.5, 0.0]);
    assert_eq!(buffer.to_mono(), vec![0.0, 0.5]);
}

#[test]
fn test_buffer_mono_passthrough() {
    let buffer = SampleBuffer::new(Format::MONO_24K, vec![0.25, -0.25]);
    assert_eq!(buffer.to_mono(), vec![0.25, -0.25]);
    assert_eq!(buffer.clone().into_samples(), vec![0.25, -0.25]);
}
