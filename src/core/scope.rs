//! Auth scope state machine.
//!
//! Each scope is either closed (its store key is absent) or open (the key
//! holds the scope's settings). `open` writes the key, `close` deletes it.
//! Both are idempotent in their end state. The registry only picks up a
//! change after a restart, which is attempted after the store change and
//! never undoes it.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::Settings;
use crate::core::container::{self, ContainerController};
use crate::core::pause::Sleeper;
use crate::core::store::ConfigStore;
use crate::core::types::{AuthScope, OpenRequest, ScopeSelector, ScopeSettings};
use crate::core::validation;
use crate::error::{Error, Result};

/// Observable state of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeState {
    Closed,
    Open(ScopeSettings),
}

/// The two transitions a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Close,
}

impl Action {
    /// Past tense, for reporting.
    pub fn done(self) -> &'static str {
        match self {
            Action::Open => "opened",
            Action::Close => "closed",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::Open => "open",
            Action::Close => "close",
        })
    }
}

/// Outcome of the restart that follows a registry change.
#[derive(Debug)]
pub enum Restart {
    NotNeeded,
    Done,
    /// The store change stands, but the service still runs the old config.
    Failed(Error),
}

/// A store change that was applied.
#[derive(Debug)]
pub struct ScopeChange {
    pub scope: AuthScope,
    pub action: Action,
    pub restart: Restart,
}

impl ScopeChange {
    pub fn restart_failed(&self) -> bool {
        matches!(self.restart, Restart::Failed(_))
    }
}

/// Per-scope results of an `open`/`close` over a selector, in run order.
#[derive(Debug)]
pub struct ToggleReport {
    pub action: Action,
    pub results: Vec<(AuthScope, Result<ScopeChange>)>,
}

impl ToggleReport {
    /// Scopes whose store change failed.
    pub fn failures(&self) -> impl Iterator<Item = (AuthScope, &Error)> {
        self.results
            .iter()
            .filter_map(|(scope, r)| r.as_ref().err().map(|e| (*scope, e)))
    }

    /// Applied changes whose restart failed.
    pub fn restart_failures(&self) -> impl Iterator<Item = &ScopeChange> {
        self.results
            .iter()
            .filter_map(|(_, r)| r.as_ref().ok())
            .filter(|c| c.restart_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.restart_failures().next().is_some()
    }
}

/// How the registry is bounced after a change.
#[derive(Debug, Clone)]
pub struct RestartPolicy {
    /// Container name filter.
    pub container: String,
    /// Pause between stop and start.
    pub pause: Duration,
}

impl RestartPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            container: settings.docker.registry_container.clone(),
            pause: settings.restart_pause(),
        }
    }
}

/// Drives the per-scope open/close transitions.
pub struct AuthScopeController<S, C, P> {
    store: S,
    containers: C,
    sleeper: P,
    restart: RestartPolicy,
}

impl<S, C, P> AuthScopeController<S, C, P>
where
    S: ConfigStore,
    C: ContainerController,
    P: Sleeper,
{
    pub fn new(store: S, containers: C, sleeper: P, restart: RestartPolicy) -> Self {
        Self {
            store,
            containers,
            sleeper,
            restart,
        }
    }

    /// Enable auth for `scope` with `settings`.
    ///
    /// Repeating `open` overwrites the stored settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `settings` belong to another scope or
    /// fail validation (nothing is written), or `Error::ConfigWriteFailed` if
    /// the store rejects the write. A failed restart is not an error; it is
    /// reported in the returned change.
    pub fn open(&self, scope: AuthScope, settings: &ScopeSettings) -> Result<ScopeChange> {
        info!(%scope, "opening auth");

        if settings.scope() != scope {
            return Err(Error::InvalidConfig(format!(
                "{} settings cannot open {} auth",
                settings.scope(),
                scope
            )));
        }
        validation::validate_settings(settings)?;

        let payload = settings.to_json()?;
        debug!(%scope, key = scope.key(), %payload, "writing auth settings");
        self.store.write(scope.key(), &payload)?;

        Ok(self.finish(scope, Action::Open))
    }

    /// Disable auth for `scope`. Closing a closed scope is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigWriteFailed` if the store rejects the delete.
    pub fn close(&self, scope: AuthScope) -> Result<ScopeChange> {
        info!(%scope, "closing auth");

        debug!(%scope, key = scope.key(), "deleting auth settings");
        self.store.delete(scope.key())?;

        Ok(self.finish(scope, Action::Close))
    }

    /// Read the current state of `scope` from the store.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigReadFailed` if the store cannot be read, or
    /// `Error::Json` if the stored payload does not match the scope.
    pub fn status(&self, scope: AuthScope) -> Result<ScopeState> {
        match self.store.read(scope.key())? {
            None => Ok(ScopeState::Closed),
            Some(raw) => Ok(ScopeState::Open(ScopeSettings::from_json(scope, &raw)?)),
        }
    }

    /// Open every selected scope, console first.
    ///
    /// A failing scope does not stop the next one.
    pub fn open_selected(&self, selector: ScopeSelector, request: &OpenRequest) -> ToggleReport {
        let results = selector
            .scopes()
            .into_iter()
            .map(|scope| (scope, self.open(scope, &request.settings_for(scope))))
            .collect();

        self.report(Action::Open, results)
    }

    /// Close every selected scope, console first.
    ///
    /// A failing scope does not stop the next one.
    pub fn close_selected(&self, selector: ScopeSelector) -> ToggleReport {
        let results = selector
            .scopes()
            .into_iter()
            .map(|scope| (scope, self.close(scope)))
            .collect();

        self.report(Action::Close, results)
    }

    fn report(&self, action: Action, results: Vec<(AuthScope, Result<ScopeChange>)>) -> ToggleReport {
        for (scope, result) in &results {
            if let Err(e) = result {
                warn!(%scope, %action, error = %e, "auth change failed");
            }
        }
        ToggleReport { action, results }
    }

    /// Run the side effects that follow a successful store change.
    fn finish(&self, scope: AuthScope, action: Action) -> ScopeChange {
        let restart = if scope.needs_restart() {
            match container::restart(
                &self.containers,
                &self.sleeper,
                &self.restart.container,
                self.restart.pause,
            ) {
                Ok(()) => Restart::Done,
                Err(e) => {
                    warn!(%scope, error = %e, "auth changed but service was not restarted");
                    Restart::Failed(e)
                }
            }
        } else {
            Restart::NotNeeded
        };

        info!(%scope, %action, "auth updated");
        ScopeChange {
            scope,
            action,
            restart,
        }
    }
}
