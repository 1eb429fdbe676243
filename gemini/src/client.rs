//! Gemini API client.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    error::{Error, Result},
    http::HttpClient,
    speech::SpeechService,
    text::TextService,
};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for text and JSON generation.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for speech synthesis.
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default prebuilt voice.
pub const DEFAULT_VOICE: &str = "Kore";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default maximum number of retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound for configured retries.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Gemini API client.
///
/// # Example
///
/// ```rust,no_run
/// use kata_gemini::Client;
///
/// # async fn run() -> kata_gemini::Result<()> {
/// let client = Client::builder("AIza...")
///     .voice("Puck")
///     .max_retries(1)
///     .build()?;
///
/// let reply = client.text().generate("", "Explain big-O in one line").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Debug, Clone)]
struct ClientConfig {
    text_model: String,
    speech_model: String,
    voice: String,
}

impl Client {
    /// Creates a new client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Returns the text generation model.
    pub fn text_model(&self) -> &str {
        &self.config.text_model
    }

    /// Returns the speech synthesis model.
    pub fn speech_model(&self) -> &str {
        &self.config.speech_model
    }

    /// Returns the prebuilt voice name.
    pub fn voice(&self) -> &str {
        &self.config.voice
    }

    /// Returns the text generation service.
    pub fn text(&self) -> TextService {
        TextService::new(self.http.clone(), self.config.text_model.clone())
    }

    /// Returns the speech synthesis service.
    pub fn speech(&self) -> SpeechService {
        SpeechService::new(
            self.http.clone(),
            self.config.speech_model.clone(),
            self.config.voice.clone(),
        )
    }

    /// Generates free text with the text model.
    pub async fn generate_text(&self, system: &str, prompt: &str) -> Result<String> {
        self.text().generate(system, prompt).await
    }

    /// Generates schema-constrained JSON with the text model and parses it.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        schema: Value,
    ) -> Result<T> {
        self.text().generate_json(system, prompt, schema).await
    }

    /// Synthesizes speech; returns base64 PCM or an empty string.
    pub async fn synthesize_speech(&self, script: &str) -> Result<String> {
        self.speech().synthesize(script).await
    }

    /// Returns a reference to the internal HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for creating a Gemini API client.
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    text_model: String,
    speech_model: String,
    voice: String,
    timeout: Duration,
    max_retries: u32,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets a custom base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the model used for text and JSON generation.
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Sets the model used for speech synthesis.
    pub fn speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    /// Sets the prebuilt voice.
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of retries for transient errors, clamped to
    /// [`MAX_RETRIES_LIMIT`].
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.min(MAX_RETRIES_LIMIT);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("api_key must be non-empty".to_string()));
        }
        if self.text_model.is_empty() || self.speech_model.is_empty() {
            return Err(Error::Config("model names must be non-empty".to_string()));
        }

        let http = HttpClient::new(self.base_url, self.api_key, self.timeout, self.max_retries)?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                text_model: self.text_model,
                speech_model: self.speech_model,
                voice: self.voice,
            },
        })
    }
}

/// Returns the `generateContent` path for a model.
pub(crate) fn generate_path(model: &str) -> String {
    format!("/models/{}:generateContent", model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        let err = Client::new("").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_model_rejected() {
        let err = Client::builder("key").text_model("").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let client = Client::new("key").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(client.speech_model(), DEFAULT_SPEECH_MODEL);
        assert_eq!(client.voice(), DEFAULT_VOICE);
    }

    #[test]
    fn test_builder_overrides() {
        let client = Client::builder("key")
            .base_url("http://localhost:8080/v1beta")
            .text_model("gemini-2.5-pro")
            .voice("Puck")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1beta");
        assert_eq!(client.text_model(), "gemini-2.5-pro");
        assert_eq!(client.voice(), "Puck");
    }

    #[test]
    fn test_max_retries_clamped() {
        assert_eq!(Client::builder("key").max_retries(2).max_retries, 2);
        let builder = Client::builder("key").max_retries(1000);
        assert_eq!(builder.max_retries, MAX_RETRIES_LIMIT);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = Client::new("secret-key-123").unwrap();
        assert!(!format!("{:?}", client).contains("secret-key-123"));
    }

    #[test]
    fn test_generate_path() {
        assert_eq!(
            generate_path("gemini-2.5-flash"),
            "/models/gemini-2.5-flash:generateContent"
        );
    }
}
