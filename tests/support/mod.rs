//! Test support utilities for lain-auth integration tests.
//!
//! Provides in-process fakes for the external collaborators, an HTTP stub
//! server, and an isolated environment for running the binary.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fakes;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fakes::*;
#[allow(unused_imports)]
pub use stub::HttpStub;

use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment for running the `lain-auth` binary.
///
/// Each test gets its own temporary home and settings file. No
/// process-global state is mutated; child processes get their environment
/// through `.env()`.
pub struct Test {
    /// Temporary home directory
    pub home: TempDir,
    /// Settings file passed via `LAIN_AUTH_CONFIG`
    pub config: PathBuf,
}

impl Test {
    /// Create an environment whose settings point etcd and SSO at `stub`.
    ///
    /// Pauses are zeroed and docker points at a binary that does not exist,
    /// so every registry restart fails.
    pub fn new(stub: &HttpStub) -> Self {
        Self::with_extra_settings(stub, "")
    }

    /// Like [`Test::new`], with `extra` TOML appended to the settings file.
    pub fn with_extra_settings(stub: &HttpStub, extra: &str) -> Self {
        Self::with_settings(&format!(
            r#"
request_timeout_secs = 5

[etcd]
authority = "{authority}"

[sso]
url = "{uri}"

[docker]
binary = "/nonexistent/lain-auth-test/docker"
restart_pause_secs = 0

[groups]
delay_secs = 0

{extra}
"#,
            authority = stub.authority(),
            uri = stub.uri(),
            extra = extra,
        ))
    }

    /// Create an environment with the given settings file contents.
    pub fn with_settings(contents: &str) -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        let config = home.path().join("config.toml");
        std::fs::write(&config, contents).expect("failed to write settings");
        Self { home, config }
    }
}
