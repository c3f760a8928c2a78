use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use designer_ext_api::CustomCodeBackend;
use designer_ext_core::constants::DEFAULT_SCRIPT_VERSION;
use designer_ext_core::{
    CustomCode, ScriptData, ScriptLocation, ScriptRegistrationRequest, TargetType,
};
use tokio::sync::RwLock;

use crate::error::ServiceError;
use crate::status_reconciler::StatusReconciler;

/// Registered scripts for a site, the current selection, and registration.
pub struct ScriptService {
    backend: Arc<dyn CustomCodeBackend>,
    reconciler: Arc<StatusReconciler>,
    selected: RwLock<Option<CustomCode>>,
    registered: RwLock<Vec<CustomCode>>,
    registering: AtomicBool,
}

impl ScriptService {
    #[must_use]
    pub fn new(backend: Arc<dyn CustomCodeBackend>, reconciler: Arc<StatusReconciler>) -> Self {
        Self {
            backend,
            reconciler,
            selected: RwLock::new(None),
            registered: RwLock::new(Vec::new()),
            registering: AtomicBool::new(false),
        }
    }

    pub fn reconciler(&self) -> &Arc<StatusReconciler> {
        &self.reconciler
    }

    /// Fetches the scripts registered with a site. Failures are logged and
    /// yield an empty list, leaving the previous list in place.
    pub async fn fetch_scripts(&self, session_token: &str, site_id: &str) -> Vec<CustomCode> {
        match self.backend.scripts(site_id, session_token).await {
            Ok(scripts) => {
                tracing::debug!(site_id, count = scripts.len(), "fetched scripts");
                *self.registered.write().await = scripts.clone();
                scripts
            },
            Err(e) => {
                tracing::error!(site_id, error = %e, "error fetching scripts");
                Vec::new()
            },
        }
    }

    /// Last successfully fetched script list.
    pub async fn registered_scripts(&self) -> Vec<CustomCode> {
        self.registered.read().await.clone()
    }

    pub async fn select_script(&self, script: CustomCode) {
        *self.selected.write().await = Some(script);
    }

    pub async fn selected_script(&self) -> Option<CustomCode> {
        self.selected.read().await.clone()
    }

    pub fn is_registering(&self) -> bool {
        self.registering.load(Ordering::Acquire)
    }

    /// Registers `code` as a hosted URL or inline source under a generated
    /// `Script<n>` name.
    ///
    /// Returns `Ok(None)` without a request when the token or site is empty.
    pub async fn register_script(
        &self,
        session_token: &str,
        site_id: &str,
        code: &str,
        is_hosted: bool,
    ) -> Result<Option<CustomCode>, ServiceError> {
        if session_token.is_empty() || site_id.is_empty() {
            return Ok(None);
        }
        if code.trim().is_empty() {
            return Err(ServiceError::InvalidInput("script code is empty".to_owned()));
        }

        let _registering = RegisteringGuard::set(&self.registering);
        let request = ScriptRegistrationRequest {
            site_id: site_id.to_owned(),
            is_hosted,
            script_data: ScriptData::new(
                generate_script_name(),
                DEFAULT_SCRIPT_VERSION.to_owned(),
                code.to_owned(),
                is_hosted,
            ),
        };
        match self.backend.register(&request, session_token).await {
            Ok(script) => {
                tracing::info!(
                    site_id,
                    is_hosted,
                    display_name = %request.script_data.display_name,
                    "script registered"
                );
                Ok(script)
            },
            Err(e) => {
                tracing::error!(site_id, error = %e, "error registering script");
                Err(e.into())
            },
        }
    }

    /// Applies the selected script to the targets. No-op when nothing is
    /// selected.
    pub async fn apply_selected(
        &self,
        session_token: &str,
        target_type: TargetType,
        target_ids: &[String],
        location: ScriptLocation,
    ) -> Result<(), ServiceError> {
        let Some(script) = self.selected_script().await else {
            tracing::debug!("no script selected, skipping apply");
            return Ok(());
        };
        self.reconciler
            .apply_script(session_token, &script.id, target_type, target_ids, location)
            .await
    }
}

/// Raises the registering flag; clears it on drop, including cancellation.
struct RegisteringGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RegisteringGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for RegisteringGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// `Script` followed by a number below one million.
fn generate_script_name() -> String {
    let n = uuid::Uuid::new_v4().as_u128() % 1_000_000;
    format!("Script{n}")
}
