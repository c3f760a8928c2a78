//! Typed error enum for the API crate.

use thiserror::Error;

/// Errors from backend API operations.
///
/// Transport failures, non-success statuses and undecodable bodies are kept
/// apart so callers can log them distinctly even when they handle them alike.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing field in response: {0}")]
    MissingField(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ApiError {
    /// Whether this error is transient and worth retrying by the user.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Whether the backend rejected the session token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::HttpStatus { code: 401 | 403, .. })
    }

    /// Short label for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::HttpRequest(_) => "network",
            Self::HttpStatus { .. } => "status",
            Self::JsonParse { .. } | Self::MissingField(_) => "malformed_response",
            Self::ClientInit(_) | Self::NotConfigured(_) => "config",
        }
    }
}
