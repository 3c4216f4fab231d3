//! Status command - show which scopes have auth enabled.

use crate::cli::{output, scope_controller, Exit};
use crate::core::config::Settings;
use crate::core::scope::ScopeState;
use crate::core::types::{ScopeSelector, ScopeSettings};
use crate::error::Result;

/// Print the state of each selected scope.
pub fn execute(settings: &Settings, selector: ScopeSelector) -> Result<Exit> {
    let controller = scope_controller(settings)?;
    let mut exit = Exit::Success;

    for scope in selector.scopes() {
        match controller.status(scope) {
            Ok(ScopeState::Closed) => output::kv(scope.as_str(), "closed"),
            Ok(ScopeState::Open(stored)) => {
                output::kv(scope.as_str(), "open");
                match stored {
                    ScopeSettings::Console(s) => {
                        output::dimmed(&format!("    type {}  url {}", s.kind, s.url))
                    }
                    ScopeSettings::Registry(s) => output::dimmed(&format!(
                        "    realm {}  issuer {}  service {}",
                        s.realm, s.issuer, s.service
                    )),
                }
            }
            Err(e) => {
                output::error(&format!("{}: {}", output::name(scope.as_str()), e));
                exit = Exit::Failure;
            }
        }
    }

    Ok(exit)
}
