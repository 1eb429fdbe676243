//! Speech synthesis service.

use std::sync::Arc;

use super::{
    client::generate_path,
    error::{Error, Result},
    http::HttpClient,
    types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig},
};

/// Speech synthesis service.
///
/// The speech models answer with a single inline audio part: standard base64
/// wrapping 16-bit signed little-endian mono PCM at 24kHz.
pub struct SpeechService {
    http: Arc<HttpClient>,
    model: String,
    voice: String,
}

impl SpeechService {
    pub(crate) fn new(http: Arc<HttpClient>, model: String, voice: String) -> Self {
        Self { http, model, voice }
    }

    /// Returns the voice used by this service.
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Synthesizes `script` and returns the base64 audio payload.
    ///
    /// Returns an empty string when the response carries no audio. Blank
    /// scripts are not sent.
    pub async fn synthesize(&self, script: &str) -> Result<String> {
        if script.trim().is_empty() {
            return Ok(String::new());
        }

        let request = GenerateContentRequest::user_text(script)
            .with_config(GenerationConfig::speech(&self.voice));
        let response: GenerateContentResponse =
            self.http.post(&generate_path(&self.model), &request).await?;
        audio_payload(&response)
    }
}

/// Extracts the base64 audio payload from a speech response.
pub(crate) fn audio_payload(response: &GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response.block_reason() {
        return Err(Error::EmptyResponse(format!("prompt blocked: {}", reason)));
    }
    let payload = response
        .inline_data()
        .map(|d| d.data.clone())
        .unwrap_or_default();
    if payload.is_empty() {
        tracing::debug!(
            finish_reason = response.finish_reason().unwrap_or(""),
            "speech response has no audio"
        );
    }
    Ok(payload)
}
