//! Service container control.
//!
//! Registry auth changes only take effect once the registry process restarts,
//! so the controller needs a way to bounce the registry container.

use std::time::Duration;
use tracing::{info, warn};

use crate::core::pause::Sleeper;
use crate::core::types::ContainerId;
use crate::error::{Error, Result};

mod docker;

pub use docker::DockerCli;

/// Stop and start named containers.
pub trait ContainerController {
    /// Find the container whose name matches `filter`.
    ///
    /// Returns `Ok(None)` when nothing matches.
    fn find_container(&self, filter: &str) -> Result<Option<ContainerId>>;

    fn stop(&self, id: &ContainerId) -> Result<()>;

    fn start(&self, id: &ContainerId) -> Result<()>;
}

impl<C: ContainerController + ?Sized> ContainerController for &C {
    fn find_container(&self, filter: &str) -> Result<Option<ContainerId>> {
        (**self).find_container(filter)
    }

    fn stop(&self, id: &ContainerId) -> Result<()> {
        (**self).stop(id)
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        (**self).start(id)
    }
}

/// Restart the container matching `filter`: stop, pause, start.
///
/// # Errors
///
/// Every failure, including no matching container, is reported as
/// `Error::RestartFailed` so callers can treat it as a warning.
pub fn restart<C, S>(controller: &C, sleeper: &S, filter: &str, pause: Duration) -> Result<()>
where
    C: ContainerController + ?Sized,
    S: Sleeper + ?Sized,
{
    info!(container = filter, "restarting");

    let failed = |reason: String| Error::RestartFailed {
        container: filter.to_string(),
        reason,
    };

    let id = controller
        .find_container(filter)
        .map_err(|e| failed(e.to_string()))?
        .ok_or_else(|| failed("no running container matches".to_string()))?;

    info!(container = filter, id = %id, "found container");

    controller.stop(&id).map_err(|e| failed(e.to_string()))?;
    sleeper.sleep(pause);
    controller.start(&id).map_err(|e| {
        warn!(container = filter, id = %id, "container stopped but did not start");
        failed(e.to_string())
    })?;

    info!(container = filter, id = %id, "restarted");
    Ok(())
}
