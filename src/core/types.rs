//! Domain types shared by the controller, the provisioner and the clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use crate::core::constants;

/// One of the two auth-gated subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScope {
    Console,
    Registry,
}

impl AuthScope {
    /// Every scope, in the order `all` runs them.
    pub const ALL: [AuthScope; 2] = [AuthScope::Console, AuthScope::Registry];

    /// Store key owned by this scope.
    pub fn key(self) -> &'static str {
        match self {
            AuthScope::Console => constants::CONSOLE_AUTH_KEY,
            AuthScope::Registry => constants::REGISTRY_AUTH_KEY,
        }
    }

    /// Whether a change only takes effect after the service restarts.
    pub fn needs_restart(self) -> bool {
        matches!(self, AuthScope::Registry)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthScope::Console => "console",
            AuthScope::Registry => "registry",
        }
    }
}

impl fmt::Display for AuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which scopes a command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSelector {
    One(AuthScope),
    All,
}

impl ScopeSelector {
    /// Selected scopes, console always before registry.
    pub fn scopes(self) -> Vec<AuthScope> {
        match self {
            ScopeSelector::One(scope) => vec![scope],
            ScopeSelector::All => AuthScope::ALL.to_vec(),
        }
    }
}

impl fmt::Display for ScopeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeSelector::One(scope) => fmt::Display::fmt(scope, f),
            ScopeSelector::All => f.write_str("all"),
        }
    }
}

/// Console auth payload stored at `/config/auth/console`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Registry auth payload stored at `/config/auth/registry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    pub realm: String,
    pub issuer: String,
    pub service: String,
}

/// Scope-specific settings written on `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSettings {
    Console(ConsoleSettings),
    Registry(RegistrySettings),
}

impl ScopeSettings {
    /// Scope this payload belongs to.
    pub fn scope(&self) -> AuthScope {
        match self {
            ScopeSettings::Console(_) => AuthScope::Console,
            ScopeSettings::Registry(_) => AuthScope::Registry,
        }
    }

    /// JSON encoding written to the store.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            ScopeSettings::Console(s) => serde_json::to_string(s),
            ScopeSettings::Registry(s) => serde_json::to_string(s),
        }
    }

    /// Decode a stored payload for `scope`.
    pub fn from_json(scope: AuthScope, raw: &str) -> serde_json::Result<Self> {
        Ok(match scope {
            AuthScope::Console => ScopeSettings::Console(serde_json::from_str(raw)?),
            AuthScope::Registry => ScopeSettings::Registry(serde_json::from_str(raw)?),
        })
    }
}

/// Settings for every scope, as collected from the `open` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub console: ConsoleSettings,
    pub registry: RegistrySettings,
}

impl OpenRequest {
    /// Payload for a single scope.
    pub fn settings_for(&self, scope: AuthScope) -> ScopeSettings {
        match scope {
            AuthScope::Console => ScopeSettings::Console(self.console.clone()),
            AuthScope::Registry => ScopeSettings::Registry(self.registry.clone()),
        }
    }
}

/// A LAIN application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub name: String,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Group record created in SSO for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsoGroup {
    pub name: String,
    pub fullname: String,
}

/// Container id as printed by `docker ps -q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerId(pub String);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SSO bearer token. Lives for one command invocation and is wiped on drop.
#[derive(Clone)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}
