//! Error types for the Gemini API client.

use thiserror::Error;

/// Result type alias for Gemini operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Gemini API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by Gemini.
    #[error("gemini: {message} (code={code}, status={status})")]
    Api {
        code: u16,
        status: String,
        message: String,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The response carried no usable candidate.
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(code: u16, status: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api {
            code,
            status: status.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Error::Api { code, status, .. } => *code == 429 || status == "RESOURCE_EXHAUSTED",
            _ => false,
        }
    }

    /// Returns true if this is an invalid API key error.
    pub fn is_invalid_api_key(&self) -> bool {
        match self {
            Error::Api {
                code,
                status,
                message,
            } => {
                *code == 401
                    || status == "UNAUTHENTICATED"
                    || message.contains("API key not valid")
            }
            _ => false,
        }
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// Returns true if the request can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            _ => self.is_rate_limit() || self.is_server_error(),
        }
    }
}
