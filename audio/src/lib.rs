//! Audio utilities for kata.
//!
//! This crate turns the base64 PCM payloads returned by speech synthesis
//! into playable sample buffers and hands them to a playback sink:
//!
//! - `format`: sample rate and channel layout
//! - `pcm`: base64 → 16-bit PCM → normalized `f32` decoding
//! - `playback`: the [`PlaybackSink`] trait, the lazily created
//!   [`PlaybackContext`] and the built-in sinks
//!
//! # Example
//!
//! ```rust
//! use kata_audio::{Format, pcm};
//!
//! // Two samples: 16384 and -32768
//! let buffer = pcm::decode_payload("AEAAgA==", Format::MONO_24K).unwrap();
//! assert_eq!(buffer.samples(), &[0.5, -1.0]);
//! ```

mod error;
pub mod format;
pub mod pcm;
pub mod playback;

pub use error::{AudioError, Result};
pub use format::Format;
pub use pcm::SampleBuffer;
pub use playback::{NullSink, PlaybackContext, PlaybackReport, PlaybackSink, WavFileSink};

#[cfg(feature = "cpal")]
pub use playback::CpalSink;
