use anyhow::Result;
use serde_json::json;

use crate::{api_client, print_json, require_session, session_service, session_store};

pub(crate) async fn run_login(id_token: Option<&str>, site_id: Option<&str>) -> Result<()> {
    let service = session_service(api_client()?);
    let Some(id_token) = id_token else {
        return print_json(&json!({ "authorizeUrl": service.authorize_url() }));
    };
    let session = service.login(id_token, site_id).await?;
    print_json(&json!({ "user": session.user, "exp": session.exp }))
}

pub(crate) fn run_logout() -> Result<()> {
    session_store().logout()?;
    print_json(&json!({ "loggedOut": true }))
}

pub(crate) fn run_whoami() -> Result<()> {
    let session = require_session()?;
    print_json(&json!({ "user": session.user, "exp": session.exp }))
}

pub(crate) async fn run_sites() -> Result<()> {
    let session = require_session()?;
    let service = session_service(api_client()?);
    let sites = service.list_sites(&session).await?;
    print_json(&sites)
}
