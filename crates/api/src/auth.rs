//! Session token exchange and site listing.

use designer_ext_core::constants::AUTHORIZE_STATE;
use designer_ext_core::{AuthSession, Site};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::wire::{SitesResponse, TokenRequest, TokenResponse};

impl ApiClient {
    /// Browser URL that starts the OAuth authorization flow.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!("{}/api/auth/authorize?state={AUTHORIZE_STATE}", self.base_url)
    }

    /// Exchanges a designer ID token for a backend session token.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, an
    /// undecodable body, or a response without a session token.
    pub async fn exchange_id_token(
        &self,
        id_token: &str,
        site_id: Option<&str>,
    ) -> Result<AuthSession, ApiError> {
        let request = TokenRequest { id_token, site_id };
        let response: TokenResponse = self.post_json("/api/auth/token", &request, None).await?;
        let user = response.user();
        let session_token = response
            .session_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::MissingField("sessionToken".to_owned()))?;
        Ok(AuthSession { user, session_token, exp: response.exp })
    }

    /// Lists the sites the session can access.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or an
    /// undecodable body.
    pub async fn list_sites(&self, token: &str) -> Result<Vec<Site>, ApiError> {
        let response: Option<SitesResponse> = self.get_json("/api/sites", &[], token).await?;
        Ok(response.unwrap_or_default().sites)
    }
}
