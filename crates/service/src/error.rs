//! Typed error enum for the service layer.
//!
//! Unifies API, local persistence and designer host failures into a single
//! error type.

use designer_ext_api::ApiError;
use designer_ext_core::CoreError;
use thiserror::Error;

/// Service-layer error unifying backend, persistence and host failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Backend call failed.
    #[error("api: {0}")]
    Api(#[from] ApiError),

    /// Local session persistence failed.
    #[error("core: {0}")]
    Core(#[from] CoreError),

    /// The designer host API failed or returned something unusable.
    #[error("host: {0}")]
    Host(String),

    /// Caller provided invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization failed in the service layer.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether the backend rejected the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Core(CoreError::Io(err))
    }
}
