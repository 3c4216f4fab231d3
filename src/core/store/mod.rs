//! Configuration store access.
//!
//! The platform reads its runtime configuration from etcd. Auth toggles are
//! plain key writes and deletes, so the store is abstracted behind a small
//! trait with an etcd implementation and an in-process one.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `ConfigStore` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use crate::core::constants;
use crate::error::{Error, Result};

mod etcd;
mod memory;

pub use etcd::Etcd;
pub use memory::Memory;

/// Key-value configuration store.
///
/// Keys are absolute paths such as `/config/auth/console`.
pub trait ConfigStore {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigReadFailed` if the store cannot be reached or
    /// answers with an unexpected response.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigWriteFailed` if the write is not acknowledged.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigWriteFailed` if the delete is not acknowledged.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

/// Read the cluster domain from `/config/domain`.
///
/// # Errors
///
/// Returns `Error::ConfigReadFailed` if the key is missing, empty, or cannot
/// be read.
pub fn cluster_domain<S: ConfigStore + ?Sized>(store: &S) -> Result<String> {
    let key = constants::DOMAIN_KEY;
    match store.read(key)? {
        Some(domain) if !domain.trim().is_empty() => Ok(domain.trim().to_string()),
        _ => Err(Error::ConfigReadFailed {
            key: key.to_string(),
            reason: "cluster domain is not set".to_string(),
        }),
    }
}
