//! Service layer for designer-ext
//!
//! Status reconciliation, script management, sessions and element inspection
//! on top of the API client.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::cognitive_complexity, reason = "Complex async flows are inherent")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod element_inspector;
mod error;
mod script_service;
mod session_service;
mod session_store;
mod status_reconciler;
#[cfg(test)]
mod test_support;

pub use element_inspector::{DesignerHost, ElementInspector, ElementMapper, SelectionReceiver};
pub use error::ServiceError;
pub use script_service::ScriptService;
pub use session_service::SessionService;
pub use session_store::SessionStore;
pub use status_reconciler::{ApplyGuard, ReconcilerConfig, StatusReconciler};
