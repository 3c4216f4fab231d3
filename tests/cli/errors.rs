//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let stub = HttpStub::start();
    let t = Test::new(&stub);

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("close"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_flag() {
    let stub = HttpStub::start();
    let t = Test::new(&stub);

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lain-auth"));
}

#[test]
fn test_unknown_scope_rejected() {
    let stub = HttpStub::start();
    let t = Test::new(&stub);

    t.cmd()
        .args(["open", "--scope", "gitlab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    assert!(stub.requests().is_empty());
}

#[test]
fn test_broken_settings_file() {
    let t = Test::with_settings("[etcd\nauthority = ");

    let output = t.status("all");
    assert_exit(&output, 1);
    assert_stderr_contains(&output, "toml parse error");
    assert_stdout_contains(&output, "fix the settings file");
}

#[test]
fn test_invalid_etcd_authority() {
    let t = Test::with_settings("[etcd]\nauthority = \"etcd.lain:http\"\n");

    let output = t.close("console");
    assert_exit(&output, 1);
    assert_stderr_contains(&output, "invalid etcd authority");
}

#[test]
fn test_env_overrides_settings_file() {
    let stub = HttpStub::start();
    let t = Test::with_settings("[etcd]\nauthority = \"etcd.lain:http\"\n");

    // the broken authority from the file is replaced before validation
    let output = t
        .cmd()
        .args(["status", "--scope", "console"])
        .env("CONSOLE_ETCD_HOST", stub.authority())
        .output()
        .unwrap();

    assert_exit(&output, 0);
    assert_stdout_contains(&output, "console  closed");
}

#[test]
fn test_unreachable_etcd_fails_scope() {
    let t = Test::with_settings(
        "request_timeout_secs = 2\n[etcd]\nauthority = \"127.0.0.1:1\"\n",
    );

    let output = t.open("console");
    assert_exit(&output, 1);
    assert_stderr_contains(&output, "console auth open failed");
}
