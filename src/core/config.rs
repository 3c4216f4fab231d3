//! Runtime settings.
//!
//! Settings start from built-in defaults, are overlaid with an optional TOML
//! file, then with environment variables. The core never reads the
//! environment itself: everything it needs is passed in through `Settings`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::validation;
use crate::error::{Error, Result};

/// Environment variables read by [`Settings::apply_env`].
pub mod env {
    pub const ETCD_HOST: &str = "CONSOLE_ETCD_HOST";
    pub const GROUP_NAME_PREFIX: &str = "SSO_GROUP_NAME_PREFIX";
    pub const GROUP_FULLNAME_PREFIX: &str = "SSO_GROUP_FULLNAME_PREFIX";
    pub const DOCKER_HOST: &str = "LAIN_AUTH_DOCKER_HOST";
    pub const DOCKER_BIN: &str = "LAIN_AUTH_DOCKER_BIN";
    pub const CONFIG: &str = "LAIN_AUTH_CONFIG";
}

/// Settings for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub etcd: EtcdConfig,
    pub docker: DockerConfig,
    pub sso: SsoConfig,
    pub groups: GroupConfig,
    pub console: ConsoleConfig,
    /// Per-request HTTP timeout, in seconds.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtcdConfig {
    /// `host[:port]` of the etcd v2 API.
    pub authority: String,
    /// Prefix prepended to every key on the etcd side.
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker CLI binary.
    pub binary: String,
    /// Value passed to `docker -H`.
    pub host: String,
    /// Name filter matching the registry container.
    pub registry_container: String,
    /// Pause between stop and start, in seconds.
    pub restart_pause_secs: u64,
    /// Limit on a single docker CLI call, in seconds.
    pub command_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsoConfig {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Skip TLS certificate checks against the SSO server.
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Leading characters of every group name.
    pub prefix: String,
    /// Hashed together with the app name. Defaults to `ConsoleApp<domain>`.
    pub name_prefix: Option<String>,
    /// Prepended to the app name. Defaults to `Console APP in <domain>: `.
    pub fullname_prefix: Option<String>,
    /// Apps provisioned when the live list is not requested.
    pub default_apps: Vec<String>,
    /// Pause between two group creations, in seconds.
    pub delay_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Console API base url. Defaults to `http://console.<domain>`.
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            etcd: EtcdConfig::default(),
            docker: DockerConfig::default(),
            sso: SsoConfig::default(),
            groups: GroupConfig::default(),
            console: ConsoleConfig::default(),
            request_timeout_secs: constants::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for EtcdConfig {
    fn default() -> Self {
        Self {
            authority: constants::ETCD_AUTHORITY.to_string(),
            namespace: constants::ETCD_NAMESPACE.to_string(),
        }
    }
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
            host: constants::DOCKER_HOST.to_string(),
            registry_container: constants::REGISTRY_CONTAINER.to_string(),
            restart_pause_secs: constants::RESTART_PAUSE_SECS,
            command_timeout_secs: constants::DOCKER_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            url: constants::SSO_URL.to_string(),
            client_id: constants::SSO_CLIENT_ID.to_string(),
            client_secret: constants::SSO_CLIENT_SECRET.to_string(),
            redirect_uri: constants::SSO_REDIRECT_URI.to_string(),
            accept_invalid_certs: false,
        }
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            prefix: constants::GROUP_PREFIX.to_string(),
            name_prefix: None,
            fullname_prefix: None,
            default_apps: constants::DEFAULT_APPS.iter().map(|s| s.to_string()).collect(),
            delay_secs: constants::PROVISION_DELAY_SECS,
        }
    }
}

impl Settings {
    /// Load settings for the running process.
    ///
    /// The file is `explicit` if given, else `$LAIN_AUTH_CONFIG`, else
    /// `<config dir>/lain-auth/config.toml` when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read, if the
    /// TOML is malformed, or if the result fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(env::CONFIG).map(PathBuf::from);
        let path = explicit.map(Path::to_path_buf).or(from_env);

        let mut settings = match path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        settings.apply_env(|name| std::env::var(name).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE))
    }

    /// Read settings from a TOML file. Missing sections keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading settings");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay values from the environment.
    ///
    /// `lookup` returns the value of a variable, or `None` when unset. Empty
    /// values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get(env::ETCD_HOST) {
            self.etcd.authority = v;
        }
        if let Some(v) = get(env::GROUP_NAME_PREFIX) {
            self.groups.name_prefix = Some(v);
        }
        if let Some(v) = get(env::GROUP_FULLNAME_PREFIX) {
            self.groups.fullname_prefix = Some(v);
        }
        if let Some(v) = get(env::DOCKER_HOST) {
            self.docker.host = v;
        }
        if let Some(v) = get(env::DOCKER_BIN) {
            self.docker.binary = v;
        }
    }

    /// Check the settings are usable before any external call is made.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        validation::parse_authority(&self.etcd.authority)?;
        validation::validate_group_prefix(&self.groups.prefix)?;
        validation::validate_url("sso url", &self.sso.url)?;

        if let Some(url) = &self.console.base_url {
            validation::validate_url("console base_url", url)?;
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.docker.command_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "docker command_timeout_secs must be positive".to_string(),
            ));
        }
        if self.docker.registry_container.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "registry container filter cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn provision_delay(&self) -> Duration {
        Duration::from_secs(self.groups.delay_secs)
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_secs(self.docker.restart_pause_secs)
    }

    pub fn docker_timeout(&self) -> Duration {
        Duration::from_secs(self.docker.command_timeout_secs)
    }
}
