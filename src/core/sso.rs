//! SSO provider client.
//!
//! Two calls are needed: obtaining a token for the operator, and creating one
//! group per app.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::types::{AuthToken, SsoGroup};
use crate::error::{Error, Result};

/// Scope requested for the token. Group creation needs write access.
const TOKEN_SCOPE: &str = "write:group";

/// Group management on the SSO side.
pub trait SsoClient {
    /// Create `group`. Only a `201 Created` answer counts as success.
    ///
    /// # Errors
    ///
    /// Returns `Error::GroupCreateFailed` with the status and raw body, or the
    /// transport error text.
    fn create_group(&self, token: &AuthToken, group: &SsoGroup) -> Result<()>;
}

impl<C: SsoClient + ?Sized> SsoClient for &C {
    fn create_group(&self, token: &AuthToken, group: &SsoGroup) -> Result<()> {
        (**self).create_group(token, group)
    }
}

/// Operator credentials for the password grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    pub redirect_uri: String,
    pub username: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// SSO client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSso {
    client: Client,
    base_url: String,
}

impl HttpSso {
    /// Create a client for the SSO server at `url`.
    pub fn new(url: &str, timeout: Duration, accept_invalid_certs: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange operator credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `Error::LoginFailed` on any transport error, non-success
    /// status, or a response without `access_token`.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthToken> {
        let url = format!("{}/oauth2/token", self.base_url);
        debug!(%url, client_id = %credentials.client_id, username = %credentials.username, "requesting token");

        let form = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("scope", TOKEN_SCOPE),
        ];

        let resp = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .map_err(|e| Error::LoginFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::LoginFailed(format!("{}: {}", status, body.trim())));
        }

        let token: TokenResponse = resp
            .json()
            .map_err(|e| Error::LoginFailed(format!("unexpected token response: {}", e)))?;
        if token.access_token.is_empty() {
            return Err(Error::LoginFailed("empty access token".to_string()));
        }

        info!(username = %credentials.username, "logged in to sso");
        Ok(AuthToken::new(token.access_token))
    }
}

impl SsoClient for HttpSso {
    fn create_group(&self, token: &AuthToken, group: &SsoGroup) -> Result<()> {
        let url = format!("{}/api/groups/", self.base_url);
        debug!(%url, name = %group.name, fullname = %group.fullname, "creating group");

        let failed = |reason: String| Error::GroupCreateFailed {
            group: group.name.clone(),
            reason,
        };

        let resp = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .bearer_auth(token.expose())
            .json(group)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let body = resp.text().unwrap_or_default();
            return Err(failed(format!("{}: {}", status, body.trim())));
        }

        Ok(())
    }
}
