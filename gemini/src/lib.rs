//! Google Gemini API client for kata.
//!
//! A thin wrapper over the `generateContent` endpoint covering the three
//! request shapes the coach needs:
//!
//! - structured JSON output constrained by a response schema
//! - free text
//! - speech synthesis (base64 16-bit PCM at 24kHz)
//!
//! # Example
//!
//! ```rust,no_run
//! use kata_gemini::Client;
//!
//! # async fn run() -> kata_gemini::Result<()> {
//! let client = Client::new("AIza...")?;
//!
//! let text = client.text().generate("You are terse.", "Say hi").await?;
//! let audio_b64 = client.speech().synthesize("Well done!").await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod http;
mod speech;
mod text;
mod types;

pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_SPEECH_MODEL,
    DEFAULT_TEXT_MODEL, DEFAULT_TIMEOUT, DEFAULT_VOICE, MAX_RETRIES_LIMIT,
};
pub use error::{Error, Result};
pub use speech::SpeechService;
pub use text::{TextService, strip_code_fence};
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, PrebuiltVoiceConfig, PromptFeedback, SpeechConfig, UsageMetadata,
    VoiceConfig,
};
