//! Custom code endpoints: registration, listing, application and status.

use designer_ext_core::constants::PAGE_STATUS_BATCH_SIZE;
use designer_ext_core::{CodeApplication, CustomCode, ScriptRegistrationRequest, StatusPayload};
use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::wire::Envelope;

const REGISTER_PATH: &str = "/api/custom-code/register";
const APPLY_PATH: &str = "/api/custom-code/apply";
const STATUS_PATH: &str = "/api/custom-code/status";

impl ApiClient {
    async fn get_result<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<Option<T>, ApiError> {
        let envelope: Option<Envelope<T>> = self.get_json(path, query, token).await?;
        Ok(envelope.unwrap_or_default().result)
    }

    /// Registers a new script with a site.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or an
    /// undecodable body.
    pub async fn register_script(
        &self,
        request: &ScriptRegistrationRequest,
        token: &str,
    ) -> Result<Option<CustomCode>, ApiError> {
        let envelope: Option<Envelope<CustomCode>> =
            self.post_json(REGISTER_PATH, request, Some(token)).await?;
        Ok(envelope.unwrap_or_default().result)
    }

    /// Lists scripts registered with a site.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or an
    /// undecodable body.
    pub async fn get_scripts(&self, site_id: &str, token: &str) -> Result<Vec<CustomCode>, ApiError> {
        let scripts = self.get_result(REGISTER_PATH, &[("siteId", site_id)], token).await?;
        Ok(scripts.unwrap_or_default())
    }

    /// Applies one script to one target.
    ///
    /// # Errors
    /// Returns an error on transport failure or non-success status.
    pub async fn apply_script(
        &self,
        application: &CodeApplication,
        token: &str,
    ) -> Result<(), ApiError> {
        tracing::debug!(
            script_id = %application.script_id,
            target_type = %application.target_type,
            target_id = %application.target_id,
            location = %application.location,
            "applying script"
        );
        let _: Option<serde_json::Value> = self.post_json(APPLY_PATH, application, Some(token)).await?;
        Ok(())
    }

    /// Status of every script applied to the site itself.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or an
    /// undecodable body.
    pub async fn get_site_status(&self, site_id: &str, token: &str) -> Result<StatusPayload, ApiError> {
        let status = self
            .get_result(STATUS_PATH, &[("targetType", "site"), ("targetId", site_id)], token)
            .await?;
        Ok(status.unwrap_or_default())
    }

    /// Status of every script applied to each of `page_ids`, in one request.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or an
    /// undecodable body.
    pub async fn get_pages_status(
        &self,
        page_ids: &[String],
        token: &str,
    ) -> Result<StatusPayload, ApiError> {
        let joined = page_ids.join(",");
        let status = self
            .get_result(STATUS_PATH, &[("targetType", "page"), ("targetIds", &joined)], token)
            .await?;
        Ok(status.unwrap_or_default())
    }

    /// Site status plus page status fetched in sequential batches of
    /// [`PAGE_STATUS_BATCH_SIZE`], merged into one payload.
    ///
    /// An empty site ID, or the literal `"page"`, is rejected with a warning
    /// and an empty payload. Failures are logged and yield an empty payload.
    pub async fn get_batch_status(
        &self,
        site_id: &str,
        page_ids: &[String],
        token: &str,
    ) -> StatusPayload {
        if site_id.is_empty() || site_id == "page" {
            tracing::warn!(site_id, "invalid site id for batch status");
            return StatusPayload::new();
        }

        match self.try_batch_status(site_id, page_ids, token).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(
                    site_id,
                    page_count = page_ids.len(),
                    kind = e.kind(),
                    error = %e,
                    "batch status failed"
                );
                StatusPayload::new()
            },
        }
    }

    async fn try_batch_status(
        &self,
        site_id: &str,
        page_ids: &[String],
        token: &str,
    ) -> Result<StatusPayload, ApiError> {
        let mut merged = self.get_site_status(site_id, token).await?;
        for batch in page_ids.chunks(PAGE_STATUS_BATCH_SIZE) {
            merged.extend(self.get_pages_status(batch, token).await?);
        }
        Ok(merged)
    }
}
