//! etcd v2 keys API store.
//!
//! Keys map to `http://<host>:<port>/v2/keys<namespace><key>`:
//!
//! - read: `GET`, value taken from `node.value`
//! - write: `PUT` with form field `value`
//! - delete: `DELETE`, a 404 means the key was already gone

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use super::ConfigStore;
use crate::core::validation;
use crate::error::{Error, Result};

/// Store talking to etcd over its v2 HTTP API.
#[derive(Debug, Clone)]
pub struct Etcd {
    client: Client,
    base_url: String,
    namespace: String,
}

#[derive(Deserialize)]
struct KeyResponse {
    node: Node,
}

#[derive(Deserialize)]
struct Node {
    value: Option<String>,
}

impl Etcd {
    /// Create a store for `authority` (`host[:port]`).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for a malformed authority, or
    /// `Error::Http` if the HTTP client cannot be built.
    pub fn new(authority: &str, namespace: &str, timeout: Duration) -> Result<Self> {
        let (host, port) = validation::parse_authority(authority)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("http://{}:{}", host, port),
            namespace: namespace.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, key: &str) -> String {
        format!("{}/v2/keys{}{}", self.base_url, self.namespace, key)
    }
}

/// Render a non-success response as an error reason.
fn describe(status: StatusCode, body: String) -> String {
    if body.trim().is_empty() {
        format!("etcd answered {}", status)
    } else {
        format!("etcd answered {}: {}", status, body.trim())
    }
}

impl ConfigStore for Etcd {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let url = self.url(key);
        debug!(%url, "reading key");

        let failed = |reason: String| Error::ConfigReadFailed {
            key: key.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            trace!(key, "key not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(failed(describe(status, resp.text().unwrap_or_default())));
        }

        let body: KeyResponse = resp.json().map_err(|e| failed(e.to_string()))?;
        Ok(body.node.value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let url = self.url(key);
        debug!(%url, "writing key");

        let failed = |reason: String| Error::ConfigWriteFailed {
            key: key.to_string(),
            reason,
        };

        let resp = self
            .client
            .put(&url)
            .form(&[("value", value)])
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(failed(describe(status, resp.text().unwrap_or_default())));
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let url = self.url(key);
        debug!(%url, "deleting key");

        let failed = |reason: String| Error::ConfigWriteFailed {
            key: key.to_string(),
            reason,
        };

        let resp = self
            .client
            .delete(&url)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(key, "key already absent");
            return Ok(());
        }
        if !status.is_success() {
            return Err(failed(describe(status, resp.text().unwrap_or_default())));
        }
        Ok(())
    }
}
