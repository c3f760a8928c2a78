use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by core domain parsing and local persistence.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid target type: {0}")]
    InvalidTargetType(String),

    #[error("Invalid script location: {0}")]
    InvalidLocation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = StdResult<T, CoreError>;
