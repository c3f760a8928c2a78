//! In-memory backend double shared by service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use designer_ext_api::{ApiError, CustomCodeBackend};
use designer_ext_core::{
    AppliedScript, CodeApplication, CustomCode, ScriptRegistrationRequest, ScriptStatus,
    StatusPayload,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Site(String),
    Pages(Vec<String>),
    Apply(String),
    Register(ScriptRegistrationRequest),
    Scripts(String),
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub calls: Mutex<Vec<Call>>,
    pub applied: Mutex<StatusPayload>,
    pub scripts: Mutex<Vec<CustomCode>>,
    /// 1-based index of the page request that fails.
    pub fail_page_request: Option<usize>,
    pub fail_apply_target: Option<String>,
    pub fail_scripts: bool,
    pub register_delay: Option<Duration>,
    pub page_requests: AtomicUsize,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Pages(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    pub fn site_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Site(_))).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn scripts_on(&self, target_id: &str) -> ScriptStatus {
        self.applied.lock().unwrap().get(target_id).cloned().unwrap_or_default()
    }
}

pub(crate) fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_owned()).collect()
}

#[async_trait]
impl CustomCodeBackend for FakeBackend {
    async fn site_status(&self, site_id: &str, _token: &str) -> Result<StatusPayload, ApiError> {
        self.record(Call::Site(site_id.to_owned()));
        let mut payload = StatusPayload::new();
        payload.insert(site_id.to_owned(), self.scripts_on(site_id));
        Ok(payload)
    }

    async fn pages_status(
        &self,
        _site_id: &str,
        page_ids: &[String],
        _token: &str,
    ) -> Result<StatusPayload, ApiError> {
        self.record(Call::Pages(page_ids.to_vec()));
        let n = self.page_requests.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_page_request == Some(n) {
            return Err(ApiError::HttpStatus { code: 500, body: "boom".to_owned() });
        }
        Ok(page_ids.iter().map(|id| (id.clone(), self.scripts_on(id))).collect())
    }

    async fn apply(&self, application: &CodeApplication, _token: &str) -> Result<(), ApiError> {
        self.record(Call::Apply(application.target_id.clone()));
        if self.fail_apply_target.as_deref() == Some(application.target_id.as_str()) {
            return Err(ApiError::HttpStatus { code: 400, body: "rejected".to_owned() });
        }
        self.applied
            .lock()
            .unwrap()
            .entry(application.target_id.clone())
            .or_default()
            .insert(
                application.script_id.clone(),
                AppliedScript { location: Some(application.location), version: None },
            );
        Ok(())
    }

    async fn register(
        &self,
        request: &ScriptRegistrationRequest,
        _token: &str,
    ) -> Result<Option<CustomCode>, ApiError> {
        self.record(Call::Register(request.clone()));
        if let Some(delay) = self.register_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Some(CustomCode {
            id: "registered-1".to_owned(),
            display_name: request.script_data.display_name.clone(),
            version: request.script_data.version.clone(),
            hosted_location: request.script_data.hosted_location.clone(),
            integrity_hash: None,
            can_copy: None,
            created_on: None,
            last_updated: None,
        }))
    }

    async fn scripts(&self, site_id: &str, _token: &str) -> Result<Vec<CustomCode>, ApiError> {
        self.record(Call::Scripts(site_id.to_owned()));
        if self.fail_scripts {
            return Err(ApiError::HttpStatus { code: 502, body: "bad gateway".to_owned() });
        }
        Ok(self.scripts.lock().unwrap().clone())
    }
}
