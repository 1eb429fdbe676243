//! Error types for the coach.

use std::time::Duration;

use thiserror::Error;

/// Result type for coach operations.
pub type Result<T> = std::result::Result<T, CoachError>;

/// Errors produced by providers, stats persistence and the session.
#[derive(Debug, Error)]
pub enum CoachError {
    /// Gemini request failed.
    #[error(transparent)]
    Gemini(#[from] kata_gemini::Error),

    /// Payload decoding or playback failed.
    #[error(transparent)]
    Audio(#[from] kata_audio::AudioError),

    /// A provider call did not finish before its deadline.
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    /// Submit or hint was requested with no challenge loaded.
    #[error("no current challenge; generate one first")]
    NoChallenge,

    /// Unknown language tag or file extension.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Provider returned something unusable.
    #[error("provider: {0}")]
    Provider(String),

    /// Stats or challenge file I/O failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Stats or challenge file is not valid JSON.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoachError {
    /// Returns true for errors caused by a deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoachError::Timeout { .. })
    }
}
