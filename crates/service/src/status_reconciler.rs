//! Batched fetching and caching of script application status.
//!
//! Status is cached per [`StatusCacheKey`]. A lookup only fetches targets the
//! cached map does not know yet: the site first, then pages in sequential
//! batches. Read failures never escape; whatever was merged before the
//! failure is cached and returned.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use designer_ext_api::{ApiError, CustomCodeBackend};
use designer_ext_core::constants::{
    CHUNK_DELAY_MS_ENV, DEFAULT_CHUNK_DELAY_MS, DEFAULT_STATUS_IDLE_SECS, MAX_PAGES_PER_CHUNK,
    PAGE_STATUS_BATCH_SIZE, STATUS_CACHE_CAPACITY, STATUS_IDLE_SECS_ENV,
};
use designer_ext_core::env_config::env_parse_with_default;
use designer_ext_core::{
    ApplicationStatus, CodeApplication, ScriptLocation, StatusCacheKey, StatusPayload,
    TargetStatus, TargetType, status_for_script,
};
use moka::future::Cache;

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Page IDs handled per reconciliation chunk.
    pub chunk_size: usize,
    /// Page IDs per status request. The smaller of the two bounds wins.
    pub request_batch_size: usize,
    /// Pause between consecutive page requests.
    pub request_delay: Duration,
    /// Idle period after which a cache entry is evicted.
    pub idle_timeout: Duration,
    pub capacity: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            chunk_size: MAX_PAGES_PER_CHUNK,
            request_batch_size: PAGE_STATUS_BATCH_SIZE,
            request_delay: Duration::from_millis(DEFAULT_CHUNK_DELAY_MS),
            idle_timeout: Duration::from_secs(DEFAULT_STATUS_IDLE_SECS),
            capacity: STATUS_CACHE_CAPACITY,
        }
    }
}

impl ReconcilerConfig {
    /// Defaults, with the delay and idle period overridable from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            request_delay: Duration::from_millis(env_parse_with_default(
                CHUNK_DELAY_MS_ENV,
                DEFAULT_CHUNK_DELAY_MS,
            )),
            idle_timeout: Duration::from_secs(env_parse_with_default(
                STATUS_IDLE_SECS_ENV,
                DEFAULT_STATUS_IDLE_SECS,
            )),
            ..defaults
        }
    }
}

/// Held while an apply is in flight; clears the applying flag on drop.
#[derive(Debug)]
pub struct ApplyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ApplyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct StatusReconciler {
    backend: Arc<dyn CustomCodeBackend>,
    cache: Cache<StatusCacheKey, ApplicationStatus>,
    config: ReconcilerConfig,
    applying: AtomicBool,
}

impl std::fmt::Debug for StatusReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReconciler")
            .field("cached_entries", &self.cache.entry_count())
            .field("config", &self.config)
            .field("applying", &self.is_applying())
            .finish_non_exhaustive()
    }
}

impl StatusReconciler {
    #[must_use]
    pub fn new(backend: Arc<dyn CustomCodeBackend>, config: ReconcilerConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_idle(config.idle_timeout)
            .build();
        Self { backend, cache, config, applying: AtomicBool::new(false) }
    }

    /// Application status of `script_id` on the site and each page.
    ///
    /// Returns an empty map without any request when the token, script or
    /// site is empty.
    pub async fn get_status(
        &self,
        session_token: &str,
        script_id: &str,
        site_id: &str,
        page_ids: &[String],
    ) -> ApplicationStatus {
        if session_token.is_empty() || script_id.is_empty() || site_id.is_empty() {
            return ApplicationStatus::new();
        }

        let key = StatusCacheKey::new(script_id, site_id, page_ids);
        let mut status = self.cache.get(&key).await.unwrap_or_default();

        let mut seen = HashSet::new();
        let pending: Vec<String> = page_ids
            .iter()
            .filter(|id| !status.contains_key(id.as_str()) && seen.insert(id.as_str()))
            .cloned()
            .collect();

        if pending.is_empty() && !status.is_empty() {
            tracing::trace!(%key, "status served from cache");
            return status;
        }

        let fetched = self.fetch_into(&mut status, session_token, script_id, site_id, &pending).await;
        if let Err(e) = fetched {
            tracing::error!(
                %key,
                kind = e.kind(),
                error = %e,
                known = status.len(),
                "error fetching application status, keeping partial result"
            );
        }

        self.cache.insert(key, status.clone()).await;
        status
    }

    async fn fetch_into(
        &self,
        status: &mut ApplicationStatus,
        token: &str,
        script_id: &str,
        site_id: &str,
        pending: &[String],
    ) -> Result<(), ApiError> {
        if !status.contains_key(site_id) {
            let payload = self.backend.site_status(site_id, token).await?;
            let site_status = payload.get(site_id).map_or_else(TargetStatus::not_applied, |scripts| {
                status_for_script(scripts, script_id)
            });
            status.insert(site_id.to_owned(), site_status);
        }

        let chunk_size = self.config.chunk_size.max(1);
        let batch_size = self.config.request_batch_size.max(1);
        let batches: Vec<&[String]> =
            pending.chunks(chunk_size).flat_map(|chunk| chunk.chunks(batch_size)).collect();

        for (index, batch) in batches.iter().enumerate() {
            if index > 0 && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }
            let payload = self.backend.pages_status(site_id, batch, token).await?;
            merge_pages(status, batch, &payload, script_id);
            tracing::debug!(site_id, batch = index + 1, of = batches.len(), "merged page status");
        }
        Ok(())
    }

    /// Applies `script_id` to each target in turn, stopping at the first
    /// failure. On success every cached status for the script is invalidated.
    ///
    /// An empty script ID or target list is a no-op.
    pub async fn apply_script(
        &self,
        session_token: &str,
        script_id: &str,
        target_type: TargetType,
        target_ids: &[String],
        location: ScriptLocation,
    ) -> Result<(), ServiceError> {
        if script_id.is_empty() || target_ids.is_empty() {
            tracing::debug!(script_id, "nothing to apply");
            return Ok(());
        }

        for target_id in target_ids {
            let application = CodeApplication {
                script_id: script_id.to_owned(),
                target_type,
                target_id: target_id.clone(),
                location,
            };
            if let Err(e) = self.backend.apply(&application, session_token).await {
                tracing::error!(script_id, %target_type, %target_id, error = %e, "error applying script");
                return Err(e.into());
            }
        }

        tracing::info!(script_id, %target_type, targets = target_ids.len(), %location, "script applied");
        self.invalidate_script(script_id).await;
        Ok(())
    }

    /// Drops every cached status computed for `script_id`.
    pub async fn invalidate_script(&self, script_id: &str) {
        let stale: Vec<Arc<StatusCacheKey>> = self
            .cache
            .iter()
            .filter(|(key, _)| key.script_id() == script_id)
            .map(|(key, _)| key)
            .collect();
        tracing::debug!(script_id, entries = stale.len(), "invalidating cached status");
        for key in stale {
            self.cache.invalidate(key.as_ref()).await;
        }
    }

    /// Caller-controlled hint that an apply is in flight. Not consulted by
    /// [`Self::get_status`].
    pub fn is_applying(&self) -> bool {
        self.applying.load(Ordering::Acquire)
    }

    pub fn set_applying(&self, applying: bool) {
        self.applying.store(applying, Ordering::Release);
    }

    /// Marks an apply as in flight unless one already is.
    ///
    /// Returns `None` when another guard is alive.
    pub fn try_begin_apply(&self) -> Option<ApplyGuard<'_>> {
        self.applying
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ApplyGuard { flag: &self.applying })
    }
}

/// Requested pages absent from a successful response are recorded as not
/// applied; other returned entries are merged as-is.
fn merge_pages(
    status: &mut ApplicationStatus,
    requested: &[String],
    payload: &StatusPayload,
    script_id: &str,
) {
    for page_id in requested {
        if !payload.contains_key(page_id) {
            status.insert(page_id.clone(), TargetStatus::not_applied());
        }
    }
    for (target_id, scripts) in payload {
        status.insert(target_id.clone(), status_for_script(scripts, script_id));
    }
}

#[cfg(test)]
#[path = "status_reconciler_tests.rs"]
mod tests;
