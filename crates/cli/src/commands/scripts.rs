use std::sync::Arc;

use anyhow::{Context, Result};
use designer_ext_api::{ApiClient, CustomCodeBackend};
use designer_ext_core::{ScriptLocation, TargetType};
use designer_ext_service::{ReconcilerConfig, ScriptService, StatusReconciler};

use crate::{api_client, print_json, require_session};

fn script_service(api: Arc<ApiClient>) -> ScriptService {
    let backend: Arc<dyn CustomCodeBackend> = api;
    let reconciler =
        Arc::new(StatusReconciler::new(Arc::clone(&backend), ReconcilerConfig::from_env()));
    ScriptService::new(backend, reconciler)
}

pub(crate) async fn run_list(site_id: &str) -> Result<()> {
    let session = require_session()?;
    let api = api_client()?;
    let scripts = script_service(api).fetch_scripts(&session.session_token, site_id).await;
    print_json(&scripts)
}

pub(crate) async fn run_register(site_id: &str, code: &str, is_hosted: bool) -> Result<()> {
    let session = require_session()?;
    let api = api_client()?;
    let registered = script_service(api)
        .register_script(&session.session_token, site_id, code, is_hosted)
        .await?;
    print_json(&registered)
}

/// Applies a script to the site, or to `page_ids` when any are given, then
/// prints the resulting status.
pub(crate) async fn run_apply(
    script_id: &str,
    site_id: &str,
    page_ids: &[String],
    location: ScriptLocation,
) -> Result<()> {
    let session = require_session()?;
    let api = api_client()?;
    let token = session.session_token.as_str();
    let service = script_service(api);

    let script = service
        .fetch_scripts(token, site_id)
        .await
        .into_iter()
        .find(|s| s.id == script_id)
        .with_context(|| format!("script {script_id} is not registered with site {site_id}"))?;
    service.select_script(script).await;

    let guard = service
        .reconciler()
        .try_begin_apply()
        .context("another apply is already running")?;
    if page_ids.is_empty() {
        let site = vec![site_id.to_owned()];
        service.apply_selected(token, TargetType::Site, &site, location).await?;
    } else {
        service.apply_selected(token, TargetType::Page, page_ids, location).await?;
    }
    drop(guard);

    let status = service.reconciler().get_status(token, script_id, site_id, page_ids).await;
    print_json(&status)
}
