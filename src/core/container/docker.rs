//! Docker CLI container controller.
//!
//! Drives the `docker` binary against a remote daemon:
//!
//! ```text
//! docker -H :2376 ps -qf name=registry.web.web
//! docker -H :2376 stop -t 10 <id>
//! docker -H :2376 start <id>
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::ContainerController;
use crate::core::constants;
use crate::core::types::ContainerId;
use crate::error::{Error, Result};

/// Seconds docker waits for a graceful stop before killing the container.
const STOP_TIMEOUT_SECS: u32 = 10;

/// Interval between two checks on a running docker command.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Container controller shelling out to the docker CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
    host: String,
    timeout: Duration,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            host: host.into(),
            timeout: Duration::from_secs(constants::DOCKER_COMMAND_TIMEOUT_SECS),
        }
    }

    /// Limit on a single docker invocation. The command is killed past it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the docker binary on PATH.
    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|_| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} CLI not found", self.binary),
            ))
        })
    }

    /// Run docker with `args` and return its trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let binary = self.locate()?;
        let command = args.first().copied().unwrap_or_default();
        trace!(binary = %binary.display(), host = %self.host, ?args, "running docker");

        let mut child = Command::new(binary)
            .arg("-H")
            .arg(&self.host)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_bounded(&mut child, self.timeout)? {
            Some(status) => status,
            None => {
                // Readers are left behind: a grandchild may still hold the pipes.
                warn!(command, timeout = ?self.timeout, "docker command timed out, killed");
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!(
                        "docker {} timed out after {}s",
                        command,
                        self.timeout.as_secs()
                    ),
                )));
            }
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);

        if !status.success() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("docker {} failed: {}", command, stderr.trim()),
            )));
        }

        Ok(stdout.trim().to_string())
    }
}

/// Read a child pipe to the end on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Wait for `child` up to `timeout`. On expiry the child is killed, reaped,
/// and `None` is returned.
fn wait_bounded(child: &mut Child, timeout: Duration) -> Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl ContainerController for DockerCli {
    fn find_container(&self, filter: &str) -> Result<Option<ContainerId>> {
        let name_filter = format!("name={}", filter);
        let stdout = self.run(&["ps", "-qf", &name_filter])?;

        let mut ids = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = ids.next().map(|id| ContainerId(id.to_string()));
        let extra = ids.count();
        if extra > 0 {
            warn!(filter, extra, "several containers match, using the first");
        }

        debug!(filter, found = first.is_some(), "looked up container");
        Ok(first)
    }

    fn stop(&self, id: &ContainerId) -> Result<()> {
        let timeout = STOP_TIMEOUT_SECS.to_string();
        self.run(&["stop", "-t", &timeout, &id.0])?;
        debug!(id = %id, "stopped");
        Ok(())
    }

    fn start(&self, id: &ContainerId) -> Result<()> {
        self.run(&["start", &id.0])?;
        debug!(id = %id, "started");
        Ok(())
    }
}
