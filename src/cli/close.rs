//! Close command - disable console and/or registry auth.

use tracing::info;

use crate::cli::{scope_controller, summarize, Exit};
use crate::core::config::Settings;
use crate::core::types::ScopeSelector;
use crate::error::Result;

/// Disable auth for the selected scopes.
pub fn execute(settings: &Settings, selector: ScopeSelector) -> Result<Exit> {
    info!(%selector, "ready to close auth");
    let controller = scope_controller(settings)?;
    let report = controller.close_selected(selector);

    Ok(summarize(&report))
}
