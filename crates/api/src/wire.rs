use designer_ext_core::{Site, User};
use serde::{Deserialize, Serialize};

/// `{ result: ... }` wrapper used by every custom-code endpoint.
#[derive(Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: Option<T>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self { result: None }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenRequest<'a> {
    pub id_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub session_token: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub exp: i64,
}

impl TokenResponse {
    pub fn user(&self) -> User {
        User { email: self.email.clone(), first_name: self.first_name.clone() }
    }
}

#[derive(Deserialize, Default)]
pub(crate) struct SitesResponse {
    #[serde(default)]
    pub sites: Vec<Site>,
}
