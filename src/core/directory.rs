//! Sources of app names to provision.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::core::types::{App, AuthToken};
use crate::error::{Error, Result};

/// Enumerates the apps that need an SSO group.
pub trait AppDirectory {
    /// # Errors
    ///
    /// Returns `Error::DirectoryUnavailable` if the list cannot be obtained.
    fn list_apps(&self, token: &AuthToken) -> Result<Vec<App>>;
}

impl<D: AppDirectory + ?Sized> AppDirectory for &D {
    fn list_apps(&self, token: &AuthToken) -> Result<Vec<App>> {
        (**self).list_apps(token)
    }
}

/// A fixed list of apps.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    apps: Vec<App>,
}

impl StaticDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps: names.into_iter().map(App::new).collect(),
        }
    }
}

impl AppDirectory for StaticDirectory {
    fn list_apps(&self, _token: &AuthToken) -> Result<Vec<App>> {
        Ok(self.apps.clone())
    }
}

#[derive(Deserialize)]
struct ReposResponse {
    repos: Vec<Repo>,
}

#[derive(Deserialize)]
struct Repo {
    appname: String,
}

/// The live app list from the console API.
#[derive(Debug, Clone)]
pub struct ConsoleDirectory {
    client: Client,
    base_url: String,
}

impl ConsoleDirectory {
    /// Directory for the console at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Directory for the console of cluster `domain` (`http://console.<domain>`).
    pub fn for_domain(domain: &str, timeout: Duration) -> Result<Self> {
        Self::new(&format!("http://console.{}", domain), timeout)
    }
}

impl AppDirectory for ConsoleDirectory {
    fn list_apps(&self, token: &AuthToken) -> Result<Vec<App>> {
        let url = format!("{}/api/v1/repos/", self.base_url);
        debug!(%url, "listing console apps");

        let resp = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .header("access-token", token.expose())
            .send()
            .map_err(|e| Error::DirectoryUnavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::DirectoryUnavailable(format!(
                "{} answered {}: {}",
                url,
                status,
                body.trim()
            )));
        }

        let body: ReposResponse = resp
            .json()
            .map_err(|e| {
                Error::DirectoryUnavailable(format!("unexpected response from {}: {}", url, e))
            })?;

        debug!(count = body.repos.len(), "console apps listed");
        Ok(body.repos.into_iter().map(|r| App::new(r.appname)).collect())
    }
}
