//! Error types for audio decoding and playback.

use thiserror::Error;

/// Result type alias for audio operations.
pub type Result<T> = std::result::Result<T, AudioError>;

/// Error type for audio operations.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The payload is not valid base64.
    #[error("audio payload decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The output device or playback context could not be created or used.
    #[error("playback unavailable: {0}")]
    PlaybackUnavailable(String),

    /// WAV encoding error.
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates a playback-unavailable error from any displayable cause.
    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        AudioError::PlaybackUnavailable(cause.to_string())
    }

    /// Returns true if the payload could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, AudioError::Decode(_))
    }
}
