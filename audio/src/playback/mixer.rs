//! Voice mixer feeding an output device.

use crate::pcm::SampleBuffer;

/// A buffer being played, with its read position in source frames.
#[derive(Debug)]
struct Voice {
    samples: Vec<f32>,
    position: f64,
    step: f64,
}

impl Voice {
    fn new(buffer: &SampleBuffer, output_rate: u32) -> Self {
        let step = if output_rate == 0 {
            1.0
        } else {
            buffer.format().sample_rate as f64 / output_rate as f64
        };
        Self {
            samples: buffer.to_mono(),
            position: 0.0,
            step,
        }
    }

    fn finished(&self) -> bool {
        self.position >= self.samples.len() as f64
    }

    /// Returns the next output sample, linearly interpolated.
    fn next_sample(&mut self) -> Option<f32> {
        let index = self.position as usize;
        let current = *self.samples.get(index)?;
        let next = self.samples.get(index + 1).copied().unwrap_or(current);
        let frac = (self.position - index as f64) as f32;
        self.position += self.step;
        Some(current + (next - current) * frac)
    }
}

/// Sums every active voice into interleaved output frames.
///
/// Each added buffer becomes an independent voice that starts at the next
/// fill, so overlapping plays are mixed rather than queued. Source buffers are
/// converted to the output rate by linear interpolation and copied to every
/// output channel.
#[derive(Debug)]
pub struct Mixer {
    output_rate: u32,
    voices: Vec<Voice>,
}

impl Mixer {
    /// Creates a mixer producing samples at `output_rate`.
    pub fn new(output_rate: u32) -> Self {
        Self {
            output_rate,
            voices: Vec::new(),
        }
    }

    /// Returns the output sample rate.
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Adds a buffer as a new voice.
    pub fn add(&mut self, buffer: &SampleBuffer) {
        if buffer.is_empty() {
            return;
        }
        self.voices.push(Voice::new(buffer, self.output_rate));
    }

    /// Returns the number of voices still playing.
    pub fn active(&self) -> usize {
        self.voices.len()
    }

    /// Returns true when nothing is playing.
    pub fn is_idle(&self) -> bool {
        self.voices.is_empty()
    }

    /// Overwrites `out` with the next mixed frames.
    ///
    /// `out` is interleaved with `channels` channels. Finished voices are
    /// dropped and the result is clamped to [-1.0, 1.0].
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        let channels = channels.max(1);

        for voice in self.voices.iter_mut() {
            for frame in out.chunks_mut(channels) {
                let Some(sample) = voice.next_sample() else {
                    break;
                };
                for slot in frame {
                    *slot += sample;
                }
            }
        }

        self.voices.retain(|v| !v.finished());
        for slot in out.iter_mut() {
            *slot = slot.clamp(-1.0, 1.0);
        }
    }
}
