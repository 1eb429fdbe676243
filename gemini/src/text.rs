//! Text and structured JSON generation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    client::generate_path,
    error::{Error, Result},
    http::HttpClient,
    types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig},
};

/// Text generation service.
pub struct TextService {
    http: Arc<HttpClient>,
    model: String,
}

impl TextService {
    pub(crate) fn new(http: Arc<HttpClient>, model: String) -> Self {
        Self { http, model }
    }

    /// Returns the model used by this service.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a raw request to the text model.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.http.post(&generate_path(&self.model), request).await
    }

    /// Generates free text.
    ///
    /// `system` may be empty.
    pub async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::user_text(prompt).with_system(system);
        let response = self.generate_content(&request).await?;
        response_text(&response)
    }

    /// Generates JSON constrained by `schema` and parses it as `T`.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        schema: Value,
    ) -> Result<T> {
        let request = GenerateContentRequest::user_text(prompt)
            .with_system(system)
            .with_config(GenerationConfig::json(schema));
        let response = self.generate_content(&request).await?;
        parse_json_response(&response)
    }
}

/// Extracts the text of the first candidate.
pub(crate) fn response_text(response: &GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response.block_reason() {
        return Err(Error::EmptyResponse(format!("prompt blocked: {}", reason)));
    }
    response.text().ok_or_else(|| {
        let reason = response.finish_reason().unwrap_or("no candidates");
        Error::EmptyResponse(format!("no text in response ({})", reason))
    })
}

/// Parses the first candidate's text as JSON.
pub(crate) fn parse_json_response<T: DeserializeOwned>(
    response: &GenerateContentResponse,
) -> Result<T> {
    let text = response_text(response)?;
    serde_json::from_str(strip_code_fence(&text)).map_err(Error::from)
}

/// Removes a surrounding Markdown code fence (```json ... ```), if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match body.find('\n') {
        Some(pos) => body[pos + 1..].trim(),
        None => body.trim(),
    }
}
