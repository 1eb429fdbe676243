//! PCM payload decoding.
//!
//! Speech payloads arrive as standard base64 text wrapping 16-bit signed
//! little-endian mono samples. Decoding is a single pass:
//!
//! ```text
//! base64 text ──▶ bytes ──▶ i16 (LE) ──▶ f32 = s / 32768.0 ──▶ SampleBuffer
//! ```
//!
//! A trailing unpaired byte is dropped without error. Normalization is
//! asymmetric: `-32768` maps to exactly `-1.0`, `32767` to `0.99997`, so the
//! result never reaches `+1.0`.

mod buffer;

pub use buffer::SampleBuffer;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::Result;
use crate::format::Format;

/// Divisor mapping the 16-bit signed range onto [-1.0, 1.0).
pub const PCM_SCALE: f32 = 32768.0;

/// Reinterprets bytes as 16-bit signed little-endian samples.
///
/// An odd trailing byte is ignored.
pub fn pcm_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

/// Decodes a base64 payload into 16-bit samples.
pub fn decode_base64_pcm(payload: &str) -> Result<Vec<i16>> {
    let bytes = STANDARD.decode(payload)?;
    Ok(pcm_from_le_bytes(&bytes))
}

/// Normalizes a single 16-bit sample.
#[inline]
pub fn normalize_sample(sample: i16) -> f32 {
    sample as f32 / PCM_SCALE
}

/// Normalizes a sequence of 16-bit samples, preserving order.
pub fn normalize(samples: &[i16]) -> Vec<f32> {
    samples.iter().copied().map(normalize_sample).collect()
}

/// Decodes a base64 payload straight into a playable buffer.
pub fn decode_payload(payload: &str, format: Format) -> Result<SampleBuffer> {
    let pcm = decode_base64_pcm(payload)?;
    Ok(SampleBuffer::new(format, normalize(&pcm)))
}

/// Encodes 16-bit samples as a base64 payload.
///
/// Inverse of [`decode_base64_pcm`].
pub fn encode_base64_pcm(samples: &[i16]) -> String {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests;
