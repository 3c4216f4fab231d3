//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables the binary reads that must not leak in from the host.
const HOST_VARS: &[&str] = &[
    "CONSOLE_ETCD_HOST",
    "SSO_GROUP_NAME_PREFIX",
    "SSO_GROUP_FULLNAME_PREFIX",
    "LAIN_AUTH_DOCKER_HOST",
    "LAIN_AUTH_DOCKER_BIN",
    "LAIN_AUTH_LOG",
    "LAIN_SSO_PASSWORD",
];

impl Test {
    /// Create a lain-auth command isolated from the host environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("lain-auth").expect("failed to find lain-auth binary");
        for var in HOST_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path());
        cmd.env("LAIN_AUTH_CONFIG", &self.config);
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Shortcut for `lain-auth open --scope <scope>`.
    pub fn open(&self, scope: &str) -> Output {
        self.cmd()
            .args(["open", "--scope", scope])
            .output()
            .expect("failed to run lain-auth open")
    }

    /// Shortcut for `lain-auth close --scope <scope>`.
    pub fn close(&self, scope: &str) -> Output {
        self.cmd()
            .args(["close", "--scope", scope])
            .output()
            .expect("failed to run lain-auth close")
    }

    /// Shortcut for `lain-auth status --scope <scope>`.
    pub fn status(&self, scope: &str) -> Output {
        self.cmd()
            .args(["status", "--scope", scope])
            .output()
            .expect("failed to run lain-auth status")
    }

    /// Shortcut for a non-interactive `lain-auth init`.
    pub fn init(&self, extra: &[&str]) -> Output {
        self.cmd()
            .args(["init", "--username", "admin@lain.local"])
            .args(extra)
            .env("LAIN_SSO_PASSWORD", "hunter2")
            .output()
            .expect("failed to run lain-auth init")
    }
}
