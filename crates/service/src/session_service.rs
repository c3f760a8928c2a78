use std::sync::Arc;

use designer_ext_api::ApiClient;
use designer_ext_core::{AuthSession, Site};

use crate::error::ServiceError;
use crate::session_store::SessionStore;

/// Login, session restore and logout, plus the site list for a session.
pub struct SessionService {
    api: Arc<ApiClient>,
    store: SessionStore,
}

impl SessionService {
    #[must_use]
    pub const fn new(api: Arc<ApiClient>, store: SessionStore) -> Self {
        Self { api, store }
    }

    #[must_use]
    pub fn authorize_url(&self) -> String {
        self.api.authorize_url()
    }

    /// Exchanges an ID token, persists the session and clears any logout marker.
    pub async fn login(
        &self,
        id_token: &str,
        site_id: Option<&str>,
    ) -> Result<AuthSession, ServiceError> {
        if id_token.trim().is_empty() {
            return Err(ServiceError::InvalidInput("id token is empty".to_owned()));
        }
        let session = self.api.exchange_id_token(id_token, site_id).await?;
        self.store.save(&session)?;
        self.store.clear_logged_out()?;
        tracing::info!(email = %session.user.email, "session established");
        Ok(session)
    }

    /// Stored session, unless the user logged out or it expired.
    pub fn restore(&self) -> Result<Option<AuthSession>, ServiceError> {
        Ok(self.store.restore()?)
    }

    pub fn logout(&self) -> Result<(), ServiceError> {
        self.store.logout()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub async fn list_sites(&self, session: &AuthSession) -> Result<Vec<Site>, ServiceError> {
        let sites = self.api.list_sites(&session.session_token).await?;
        tracing::debug!(count = sites.len(), "fetched sites");
        Ok(sites)
    }
}
