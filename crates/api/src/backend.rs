//! Backend trait abstraction
//!
//! The service layer depends on these operations rather than on
//! [`ApiClient`] directly, so status reconciliation can run against any
//! implementation.

use async_trait::async_trait;
use designer_ext_core::{CodeApplication, CustomCode, ScriptRegistrationRequest, StatusPayload};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Custom code operations against the extension backend.
#[async_trait]
pub trait CustomCodeBackend: Send + Sync {
    /// Status of scripts applied to the site itself. One request.
    async fn site_status(&self, site_id: &str, token: &str) -> Result<StatusPayload, ApiError>;

    /// Status of scripts applied to the given pages. One request.
    async fn pages_status(
        &self,
        site_id: &str,
        page_ids: &[String],
        token: &str,
    ) -> Result<StatusPayload, ApiError>;

    /// Apply one script to one target.
    async fn apply(&self, application: &CodeApplication, token: &str) -> Result<(), ApiError>;

    /// Register a script with a site.
    async fn register(
        &self,
        request: &ScriptRegistrationRequest,
        token: &str,
    ) -> Result<Option<CustomCode>, ApiError>;

    /// List scripts registered with a site.
    async fn scripts(&self, site_id: &str, token: &str) -> Result<Vec<CustomCode>, ApiError>;
}

#[async_trait]
impl CustomCodeBackend for ApiClient {
    async fn site_status(&self, site_id: &str, token: &str) -> Result<StatusPayload, ApiError> {
        self.get_site_status(site_id, token).await
    }

    async fn pages_status(
        &self,
        site_id: &str,
        page_ids: &[String],
        token: &str,
    ) -> Result<StatusPayload, ApiError> {
        tracing::trace!(site_id, page_count = page_ids.len(), "page status request");
        self.get_pages_status(page_ids, token).await
    }

    async fn apply(&self, application: &CodeApplication, token: &str) -> Result<(), ApiError> {
        self.apply_script(application, token).await
    }

    async fn register(
        &self,
        request: &ScriptRegistrationRequest,
        token: &str,
    ) -> Result<Option<CustomCode>, ApiError> {
        self.register_script(request, token).await
    }

    async fn scripts(&self, site_id: &str, token: &str) -> Result<Vec<CustomCode>, ApiError> {
        self.get_scripts(site_id, token).await
    }
}
