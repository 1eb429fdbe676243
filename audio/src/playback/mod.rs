//! Playback sinks and the session playback context.
//!
//! A [`PlaybackSink`] plays normalized sample buffers, fire-and-forget.
//! [`PlaybackContext`] owns at most one sink for the lifetime of a session:
//! the sink is created on the first non-empty payload and reused for every
//! later call. It is never torn down explicitly.
//!
//! # Example
//!
//! ```rust
//! use kata_audio::{PlaybackContext, WavFileSink};
//!
//! let dir = std::env::temp_dir().join("kata-doc-playback");
//! let ctx = PlaybackContext::new(move || Ok(WavFileSink::new(dir.join("speech.wav"))));
//!
//! // Empty payloads are a no-op and never create the sink.
//! assert!(ctx.decode_and_play(Some("")).unwrap().is_none());
//! assert!(!ctx.is_initialized());
//! ```

mod mixer;
mod wav;

#[cfg(feature = "cpal")]
mod cpal_sink;

#[cfg(feature = "cpal")]
pub use cpal_sink::CpalSink;
pub use mixer::Mixer;
pub use wav::{WavFileSink, write_wav};

use std::time::Duration;

use once_cell::unsync::OnceCell;

use crate::error::Result;
use crate::format::Format;
use crate::pcm::{self, SampleBuffer};

/// An audio output that plays sample buffers.
///
/// `play` starts playback and returns without waiting for it to finish.
/// Implementations are not required to be `Send`; device streams usually are not.
pub trait PlaybackSink {
    /// Starts playing the buffer.
    fn play(&self, buffer: SampleBuffer) -> Result<()>;

    /// Returns true while audio handed to `play` is still being output.
    ///
    /// Sinks that finish inside `play` keep the default.
    fn is_playing(&self) -> bool {
        false
    }
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for Box<S> {
    fn play(&self, buffer: SampleBuffer) -> Result<()> {
        (**self).play(buffer)
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }
}

/// A sink that discards everything it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PlaybackSink for NullSink {
    fn play(&self, _buffer: SampleBuffer) -> Result<()> {
        Ok(())
    }
}

/// Summary of a buffer handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Number of decoded samples.
    pub samples: usize,
    /// Playback duration of the buffer.
    pub duration: Duration,
}

type SinkFactory = Box<dyn Fn() -> Result<Box<dyn PlaybackSink>>>;

/// Lazily created playback context shared by all decode calls of a session.
pub struct PlaybackContext {
    format: Format,
    factory: SinkFactory,
    sink: OnceCell<Box<dyn PlaybackSink>>,
}

impl PlaybackContext {
    /// Creates a context that builds its sink with `factory` on first use.
    ///
    /// Payloads are decoded as 24kHz mono.
    pub fn new<F, S>(factory: F) -> Self
    where
        F: Fn() -> Result<S> + 'static,
        S: PlaybackSink + 'static,
    {
        Self {
            format: Format::MONO_24K,
            factory: Box::new(move || Ok(Box::new(factory()?) as Box<dyn PlaybackSink>)),
            sink: OnceCell::new(),
        }
    }

    /// Creates a context around an already opened sink.
    pub fn with_sink<S: PlaybackSink + 'static>(sink: S) -> Self {
        let ctx = Self::new(|| Ok(NullSink));
        let _ = ctx.sink.set(Box::new(sink));
        ctx
    }

    /// Overrides the payload format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Returns the payload format.
    pub fn payload_format(&self) -> Format {
        self.format
    }

    /// Returns true once the sink has been created.
    pub fn is_initialized(&self) -> bool {
        self.sink.get().is_some()
    }

    /// Returns true while the sink is still outputting audio. Never creates
    /// the sink.
    pub fn is_playing(&self) -> bool {
        self.sink.get().is_some_and(|s| s.is_playing())
    }

    /// Returns the sink, creating it on first use.
    ///
    /// If creation fails the error is returned and nothing is stored, so a
    /// later call tries again.
    pub fn sink(&self) -> Result<&dyn PlaybackSink> {
        let sink = self.sink.get_or_try_init(|| {
            tracing::debug!("creating playback sink");
            (self.factory)()
        })?;
        Ok(sink.as_ref())
    }

    /// Decodes a base64 PCM payload and starts playing it.
    ///
    /// - `None` or an empty payload is a no-op and returns `Ok(None)`.
    /// - Malformed base64 returns [`AudioError::Decode`](crate::AudioError::Decode)
    ///   and nothing is played.
    /// - Sink creation or playback failures are returned as-is.
    pub fn decode_and_play(&self, payload: Option<&str>) -> Result<Option<PlaybackReport>> {
        let payload = match payload {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(None),
        };

        let buffer = pcm::decode_payload(payload, self.format)?;
        let report = PlaybackReport {
            samples: buffer.len(),
            duration: buffer.duration(),
        };

        self.sink()?.play(buffer)?;
        Ok(Some(report))
    }

    /// Plays an already decoded buffer.
    pub fn play(&self, buffer: SampleBuffer) -> Result<()> {
        self.sink()?.play(buffer)
    }
}

impl std::fmt::Debug for PlaybackContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackContext")
            .field("format", &self.format)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
