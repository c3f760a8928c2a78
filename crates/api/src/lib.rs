//! HTTP client for the designer-ext backend: session exchange, sites and
//! custom code registration, application and status.

#![allow(
    clippy::missing_errors_doc,
    reason = "Errors are self-explanatory from Result types"
)]

mod auth;
pub mod backend;
pub mod client;
mod custom_code;
pub mod error;
mod wire;

#[cfg(test)]
mod tests;

pub use backend::CustomCodeBackend;
pub use client::{ApiClient, ClientConfig};
pub use error::ApiError;
