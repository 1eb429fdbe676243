//! Audio format of decoded sample buffers.

use std::time::Duration;

/// Describes the layout of a sample buffer.
///
/// Speech payloads are always 16-bit signed little-endian PCM on the wire;
/// the format only carries what playback needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Sample rate in Hz (e.g., 24000, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl Format {
    /// Creates a new mono format with the given sample rate.
    pub const fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }

    /// Creates a new format with the given sample rate and channel count.
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Returns the number of bytes per frame of 16-bit source PCM.
    pub fn pcm_frame_bytes(&self) -> usize {
        2 * self.channels as usize
    }

    /// Returns the number of frames in the given count of interleaved samples.
    pub fn frames(&self, samples: usize) -> usize {
        if self.channels == 0 {
            return 0;
        }
        samples / self.channels as usize
    }

    /// Returns the playback duration of the given count of interleaved samples.
    pub fn duration(&self, samples: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = self.frames(samples) as u64;
        Duration::from_micros(frames * 1_000_000 / self.sample_rate as u64)
    }

    /// Returns the number of interleaved samples needed for the given duration.
    pub fn samples_in_duration(&self, duration: Duration) -> usize {
        let frames = duration.as_micros() as u64 * self.sample_rate as u64 / 1_000_000;
        frames as usize * self.channels as usize
    }
}

// Common format presets
impl Format {
    /// 24kHz mono, the format of synthesized speech payloads.
    pub const MONO_24K: Format = Format::mono(24000);
    /// 44.1kHz stereo (CD quality)
    pub const STEREO_44K: Format = Format::new(44100, 2);
    /// 48kHz stereo
    pub const STEREO_48K: Format = Format::new(48000, 2);
}

impl Default for Format {
    fn default() -> Self {
        Self::MONO_24K
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mono() {
        let fmt = Format::mono(16000);
        assert_eq!(fmt.sample_rate, 16000);
        assert_eq!(fmt.channels, 1);
    }

    #[test]
    fn test_format_presets() {
        assert_eq!(Format::MONO_24K.sample_rate, 24000);
        assert_eq!(Format::MONO_24K.channels, 1);
        assert_eq!(Format::STEREO_48K.channels, 2);
        assert_eq!(Format::default(), Format::MONO_24K);
    }

    #[test]
    fn test_pcm_frame_bytes() {
        assert_eq!(Format::MONO_24K.pcm_frame_bytes(), 2);
        assert_eq!(Format::STEREO_44K.pcm_frame_bytes(), 4);
    }

    #[test]
    fn test_duration() {
        let fmt = Format::MONO_24K;
        assert_eq!(fmt.duration(24000), Duration::from_secs(1));
        assert_eq!(fmt.duration(2400), Duration::from_millis(100));

        // Stereo samples are counted per channel.
        assert_eq!(Format::STEREO_48K.duration(96000), Duration::from_secs(1));
    }

    #[test]
    fn test_samples_in_duration() {
        assert_eq!(Format::MONO_24K.samples_in_duration(Duration::from_millis(20)), 480);
        assert_eq!(Format::STEREO_48K.samples_in_duration(Duration::from_millis(10)), 960);
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Format::mono(0).duration(100), Duration::ZERO);
        assert_eq!(Format::new(24000, 0).frames(100), 0);
    }
}
