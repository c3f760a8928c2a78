use std::time::Duration;

use designer_ext_core::constants::{API_URL_ENV, TIMEOUT_SECS_ENV};
use designer_ext_core::env_config::env_parse_optional;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Maximum number of body bytes echoed back in error messages.
pub const MAX_ERROR_BODY_LEN: usize = 500;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// No timeout is applied when `None`.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: None }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `DESIGNER_EXT_API_URL` and the optional `DESIGNER_EXT_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// Returns [`ApiError::NotConfigured`] when the base URL is unset or blank.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ApiError::NotConfigured(format!("{API_URL_ENV} not set")))?;
        let timeout = env_parse_optional::<u64>(TIMEOUT_SECS_ENV).map(Duration::from_secs);
        Ok(Self { base_url, timeout })
    }
}

/// Client for the extension backend.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET, decoding the body as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).query(query).bearer_auth(token).send().await?;
        Self::decode(path, response).await
    }

    /// POST with a JSON body, decoding the response as `T`.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST");
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        Self::decode(path, response).await
    }

    /// Checks the status and parses the body. An empty body decodes as `null`,
    /// so envelopes with an absent `result` come out empty.
    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_LEN).to_owned(),
            });
        }

        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::JsonParse {
            context: format!("{path} (body: {})", truncate(&body, 200)),
            source: e,
        })
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
