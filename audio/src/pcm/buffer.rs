//! Normalized sample buffer.

use std::time::Duration;

use crate::format::Format;

/// A buffer of normalized `f32` samples ready for playback.
///
/// Samples are interleaved when the format has more than one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    format: Format,
    samples: Vec<f32>,
}

impl SampleBuffer {
    /// Creates a new buffer with the given format and samples.
    pub fn new(format: Format, samples: Vec<f32>) -> Self {
        Self { format, samples }
    }

    /// Returns the format of this buffer.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consumes the buffer and returns the samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Returns the number of interleaved samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the number of frames.
    pub fn frames(&self) -> usize {
        self.format.frames(self.samples.len())
    }

    /// Returns the playback duration.
    pub fn duration(&self) -> Duration {
        self.format.duration(self.samples.len())
    }

    /// Iterates over the samples of one channel.
    pub fn channel(&self, index: usize) -> impl Iterator<Item = f32> + '_ {
        let channels = self.format.channels.max(1) as usize;
        self.samples.iter().copied().skip(index).step_by(channels)
    }

    /// Returns the buffer folded down to a single channel by averaging.
    pub fn to_mono(&self) -> Vec<f32> {
        let channels = self.format.channels.max(1) as usize;
        if channels == 1 {
            return self.samples.clone();
        }
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}
