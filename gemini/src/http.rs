//! HTTP client implementation for the Gemini API.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};

use super::{
    error::{Error, Result},
    types::ApiErrorResponse,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Backoff stops doubling after 2^5 = 32s.
const MAX_BACKOFF_SHIFT: u32 = 5;

/// HTTP client for the Gemini API.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    api_key: String,
    max_retries: u32,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            max_retries,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs a JSON body with retry support.
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = backoff(attempt);
                tracing::debug!(attempt, ?backoff, path, "retrying gemini request");
                tokio::time::sleep(backoff).await;
            }

            match self.do_post(path, body).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if e.is_retryable() {
                        last_err = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Other("max retries exceeded".to_string())))
    }

    /// Performs a single POST request.
    async fn do_post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "gemini request");

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers()?)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Returns default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.api_key).map_err(|e| Error::Config(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("kata-gemini-rust/1.0"));
        Ok(headers)
    }

    /// Handles the API response.
    async fn handle_response<R>(&self, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(parse_error(&body, status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(Error::from)
    }
}

/// Delay before retry `attempt` (1-based): 1s, 2s, 4s, ... capped at 32s.
fn backoff(attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
    Duration::from_secs(1u64 << shift)
}

/// Parses an error response body.
pub(crate) fn parse_error(body: &[u8], http_status: u16) -> Error {
    if let Ok(resp) = serde_json::from_slice::<ApiErrorResponse>(body) {
        let code = if resp.error.code == 0 {
            http_status
        } else {
            resp.error.code
        };
        return Error::api(code, resp.error.status, resp.error.message);
    }

    Error::api(
        http_status,
        String::new(),
        String::from_utf8_lossy(body).to_string(),
    )
}
