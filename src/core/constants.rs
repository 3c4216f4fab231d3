//! Constants used throughout lain-auth.
//!
//! Centralizes store keys, container names and default values.

/// Store key holding the console auth settings.
pub const CONSOLE_AUTH_KEY: &str = "/config/auth/console";

/// Store key holding the registry auth settings.
pub const REGISTRY_AUTH_KEY: &str = "/config/auth/registry";

/// Store key holding the cluster domain.
pub const DOMAIN_KEY: &str = "/config/domain";

/// Namespace all store keys live under on the etcd side.
pub const ETCD_NAMESPACE: &str = "/lain";

/// Default etcd authority when `CONSOLE_ETCD_HOST` is unset.
pub const ETCD_AUTHORITY: &str = "etcd.lain:4001";

/// Port used when the etcd authority carries no port.
pub const ETCD_DEFAULT_PORT: u16 = 4001;

/// Docker daemon the registry container runs on.
pub const DOCKER_HOST: &str = ":2376";

/// Name filter matching the registry container.
pub const REGISTRY_CONTAINER: &str = "registry.web.web";

/// Service name registry tokens are issued for.
pub const REGISTRY_SERVICE: &str = "lain.local";

/// Prefix of every SSO group name. Must start with a letter.
pub const GROUP_PREFIX: &str = "ca";

/// Number of hex characters of the digest kept in a group name.
pub const GROUP_HASH_LEN: usize = 30;

/// Apps provisioned when the live app list is not requested.
pub const DEFAULT_APPS: &[&str] = &["console", "registry", "tinydns", "webrouter", "lvault"];

/// Seconds between two SSO group creations.
pub const PROVISION_DELAY_SECS: u64 = 3;

/// Seconds between stopping and starting the registry.
pub const RESTART_PAUSE_SECS: u64 = 3;

/// Seconds a single docker CLI call may take before it is killed.
pub const DOCKER_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Timeout for a single HTTP request.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default CLI values for `open`.
pub const CONSOLE_AUTH_TYPE: &str = "lain-sso";
pub const SSO_URL: &str = "http://sso.lain.local";
pub const REGISTRY_REALM: &str = "http://console.lain.local/api/v1/authorize/registry/";
pub const REGISTRY_ISSUER: &str = "auth server";

/// Default SSO client registration used by `init`.
pub const SSO_CLIENT_ID: &str = "3";
pub const SSO_CLIENT_SECRET: &str = "lain-cli_admin";
pub const SSO_REDIRECT_URI: &str = "https://example.com/";

/// Config file name under the user config directory.
pub const CONFIG_DIR: &str = "lain-auth";
pub const CONFIG_FILE: &str = "config.toml";
