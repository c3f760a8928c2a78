//! Core types for designer-ext
//!
//! This crate contains domain types shared across all other crates.

pub mod constants;
mod element;
pub mod env_config;
mod error;
mod script;
mod site;
mod status;

pub use element::*;
pub use error::*;
pub use script::*;
pub use site::*;
pub use status::*;
