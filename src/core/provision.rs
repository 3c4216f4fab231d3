//! SSO group provisioning.
//!
//! Every app gets one SSO group whose name is derived from the app name
//! alone, so a rerun after a partial failure targets the same groups instead
//! of creating duplicates. Apps are processed one at a time; a failure is
//! recorded and the pass moves on.

use md5::{Digest, Md5};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::GroupConfig;
use crate::core::constants;
use crate::core::directory::AppDirectory;
use crate::core::pause::Sleeper;
use crate::core::sso::SsoClient;
use crate::core::types::{App, AuthToken, SsoGroup};
use crate::core::validation;
use crate::error::Result;

/// Derive the SSO group name for `app`.
///
/// `group_prefix` followed by the first 30 hex digits of
/// `md5(name_prefix + app)`. Depends on nothing but its inputs.
pub fn group_name(group_prefix: &str, name_prefix: &str, app: &str) -> String {
    let digest = Md5::digest(format!("{}{}", name_prefix, app).as_bytes());
    let hex = format!("{:x}", digest);
    format!("{}{}", group_prefix, &hex[..constants::GROUP_HASH_LEN])
}

/// Prefixes used to turn app names into groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNaming {
    group_prefix: String,
    name_prefix: String,
    fullname_prefix: String,
}

impl GroupNaming {
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `group_prefix` would produce names
    /// SSO rejects.
    pub fn new(
        group_prefix: impl Into<String>,
        name_prefix: impl Into<String>,
        fullname_prefix: impl Into<String>,
    ) -> Result<Self> {
        let group_prefix = group_prefix.into();
        validation::validate_group_prefix(&group_prefix)?;
        Ok(Self {
            group_prefix,
            name_prefix: name_prefix.into(),
            fullname_prefix: fullname_prefix.into(),
        })
    }

    /// Build naming from config, deriving unset prefixes from the domain.
    ///
    /// `domain` is only called when a prefix needs it.
    pub fn from_config<F>(config: &GroupConfig, domain: F) -> Result<Self>
    where
        F: FnOnce() -> Result<String>,
    {
        let (name_prefix, fullname_prefix) =
            match (&config.name_prefix, &config.fullname_prefix) {
                (Some(name), Some(fullname)) => (name.clone(), fullname.clone()),
                (name, fullname) => {
                    let domain = domain()?;
                    (
                        name.clone()
                            .unwrap_or_else(|| format!("ConsoleApp{}", domain)),
                        fullname
                            .clone()
                            .unwrap_or_else(|| format!("Console APP in {}: ", domain)),
                    )
                }
            };

        Self::new(config.prefix.clone(), name_prefix, fullname_prefix)
    }

    pub fn group_for(&self, app: &App) -> SsoGroup {
        SsoGroup {
            name: group_name(&self.group_prefix, &self.name_prefix, &app.name),
            fullname: format!("{}{}", self.fullname_prefix, app.name),
        }
    }
}

/// What happened to one app.
#[derive(Debug)]
pub struct GroupOutcome {
    pub app: App,
    pub group: SsoGroup,
    pub result: Result<()>,
}

/// Per-app outcomes of a provisioning pass, in input order.
#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub outcomes: Vec<GroupOutcome>,
}

impl ProvisionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Creates SSO groups for apps.
pub struct GroupProvisioner<C, P> {
    sso: C,
    sleeper: P,
    naming: GroupNaming,
    delay: Duration,
}

impl<C, P> GroupProvisioner<C, P>
where
    C: SsoClient,
    P: Sleeper,
{
    /// `delay` separates two consecutive group creations.
    pub fn new(sso: C, sleeper: P, naming: GroupNaming, delay: Duration) -> Self {
        Self {
            sso,
            sleeper,
            naming,
            delay,
        }
    }

    /// List apps from `directory`, then provision them.
    ///
    /// # Errors
    ///
    /// Returns `Error::DirectoryUnavailable` if the app list cannot be
    /// obtained; nothing is created in that case. Per-app failures are in
    /// the report, never an `Err`.
    pub fn run<D>(&self, token: &AuthToken, directory: &D) -> Result<ProvisionReport>
    where
        D: AppDirectory + ?Sized,
    {
        let apps = directory.list_apps(token)?;
        info!(apps = apps.len(), "provisioning sso groups");
        Ok(self.provision(token, &apps))
    }

    /// Create one group per app, continuing past failures.
    pub fn provision(&self, token: &AuthToken, apps: &[App]) -> ProvisionReport {
        let mut report = ProvisionReport::default();

        for (i, app) in apps.iter().enumerate() {
            if i > 0 {
                self.sleeper.sleep(self.delay);
            }

            let group = self.naming.group_for(app);
            debug!(app = %app.name, group = %group.name, "creating sso group");

            let result = self.sso.create_group(token, &group);
            match &result {
                Ok(()) => info!(app = %app.name, group = %group.name, "sso group created"),
                Err(e) => warn!(app = %app.name, error = %e, "sso group not created"),
            }

            report.outcomes.push(GroupOutcome {
                app: app.clone(),
                group,
                result,
            });
        }

        report
    }
}
