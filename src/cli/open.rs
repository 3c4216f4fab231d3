//! Open command - enable console and/or registry auth.

use tracing::info;

use crate::cli::{scope_controller, summarize, Exit, OpenArgs};
use crate::core::config::Settings;
use crate::core::types::{ConsoleSettings, OpenRequest, RegistrySettings, ScopeSelector};
use crate::error::Result;

/// Collect the settings of every scope from the flags.
///
/// The console auth url falls back to the configured SSO url.
pub fn request_from_args(settings: &Settings, args: &OpenArgs) -> OpenRequest {
    OpenRequest {
        console: ConsoleSettings {
            kind: args.kind.clone(),
            url: args.url.clone().unwrap_or_else(|| settings.sso.url.clone()),
        },
        registry: RegistrySettings {
            realm: args.realm.clone(),
            issuer: args.issuer.clone(),
            service: args.service.clone(),
        },
    }
}

/// Enable auth for the selected scopes.
pub fn execute(settings: &Settings, args: OpenArgs) -> Result<Exit> {
    let selector = ScopeSelector::from(args.scope);
    let request = request_from_args(settings, &args);

    info!(%selector, "ready to open auth");
    let controller = scope_controller(settings)?;
    let report = controller.open_selected(selector, &request);

    Ok(summarize(&report))
}
