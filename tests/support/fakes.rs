//! In-process fakes for the external collaborators.
//!
//! Fakes that share a [`Journal`] append to it, so tests can assert on the
//! interleaving of calls and pauses.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lain_auth::core::container::ContainerController;
use lain_auth::core::directory::AppDirectory;
use lain_auth::core::pause::Sleeper;
use lain_auth::core::sso::SsoClient;
use lain_auth::core::store::{ConfigStore, Memory};
use lain_auth::core::types::{App, AuthToken, ContainerId, SsoGroup};
use lain_auth::error::{Error, Result};

/// Ordered record of calls made to the fakes.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

/// Records pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub journal: Journal,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.journal.push(format!("sleep {}s", duration.as_secs()));
    }
}

/// Container controller with one optional container.
pub struct FakeContainers {
    pub journal: Journal,
    /// Id returned by `find_container`, `None` when nothing runs.
    pub running: Option<String>,
    pub fail_stop: bool,
    pub fail_start: bool,
}

impl FakeContainers {
    pub fn running(id: &str) -> Self {
        Self {
            journal: Journal::default(),
            running: Some(id.to_string()),
            fail_stop: false,
            fail_start: false,
        }
    }

    pub fn missing() -> Self {
        Self {
            running: None,
            ..Self::running("")
        }
    }

    pub fn failing_start(id: &str) -> Self {
        Self {
            fail_start: true,
            ..Self::running(id)
        }
    }
}

impl ContainerController for FakeContainers {
    fn find_container(&self, filter: &str) -> Result<Option<ContainerId>> {
        self.journal.push(format!("find {}", filter));
        Ok(self.running.clone().map(ContainerId))
    }

    fn stop(&self, id: &ContainerId) -> Result<()> {
        self.journal.push(format!("stop {}", id));
        if self.fail_stop {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "daemon unreachable",
            )));
        }
        Ok(())
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        self.journal.push(format!("start {}", id));
        if self.fail_start {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "daemon unreachable",
            )));
        }
        Ok(())
    }
}

/// Store that rejects writes and deletes for some keys.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: Memory,
    pub broken_keys: Vec<String>,
}

impl FlakyStore {
    pub fn breaking(keys: &[&str]) -> Self {
        Self {
            inner: Memory::new(),
            broken_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.broken_keys.iter().any(|k| k == key) {
            return Err(Error::ConfigWriteFailed {
                key: key.to_string(),
                reason: "etcd answered 500 Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigStore for FlakyStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.write(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.delete(key)
    }
}

/// SSO client that fails for chosen group fullnames.
#[derive(Default)]
pub struct FakeSso {
    pub journal: Journal,
    /// Apps whose group creation fails; matched on the fullname suffix.
    pub failing_apps: Vec<String>,
    pub created: RefCell<Vec<SsoGroup>>,
}

impl FakeSso {
    pub fn failing_for(journal: Journal, apps: &[&str]) -> Self {
        Self {
            journal,
            failing_apps: apps.iter().map(|a| a.to_string()).collect(),
            created: RefCell::default(),
        }
    }
}

impl SsoClient for FakeSso {
    fn create_group(&self, _token: &AuthToken, group: &SsoGroup) -> Result<()> {
        self.journal.push(format!("create {}", group.fullname));
        if self
            .failing_apps
            .iter()
            .any(|app| group.fullname.ends_with(&format!(": {}", app)))
        {
            return Err(Error::GroupCreateFailed {
                group: group.name.clone(),
                reason: "409 Conflict: group exists".to_string(),
            });
        }
        self.created.borrow_mut().push(group.clone());
        Ok(())
    }
}

/// Directory that cannot be reached.
pub struct DownDirectory;

impl AppDirectory for DownDirectory {
    fn list_apps(&self, _token: &AuthToken) -> Result<Vec<App>> {
        Err(Error::DirectoryUnavailable(
            "connection refused".to_string(),
        ))
    }
}
