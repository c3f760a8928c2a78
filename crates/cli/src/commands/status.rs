use std::sync::Arc;

use anyhow::Result;
use designer_ext_api::CustomCodeBackend;
use designer_ext_service::{ReconcilerConfig, StatusReconciler};

use crate::{api_client, print_json, require_session};

pub(crate) async fn run_status(script_id: &str, site_id: &str, page_ids: &[String]) -> Result<()> {
    let session = require_session()?;
    let api = api_client()?;
    let backend: Arc<dyn CustomCodeBackend> = api;
    let reconciler = StatusReconciler::new(backend, ReconcilerConfig::from_env());
    let status = reconciler.get_status(&session.session_token, script_id, site_id, page_ids).await;
    print_json(&status)
}

pub(crate) async fn run_batch_status(site_id: &str, page_ids: &[String]) -> Result<()> {
    let session = require_session()?;
    let api = api_client()?;
    let payload = api.get_batch_status(site_id, page_ids, &session.session_token).await;
    print_json(&payload)
}
