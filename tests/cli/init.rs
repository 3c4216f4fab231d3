//! Tests for the init command.

use crate::support::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const DOMAIN_PATH: &str = "/v2/keys/lain/config/domain";

fn mount_login(stub: &HttpStub) {
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("password=hunter2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "t0ken",
                "token_type": "bearer"
            })))
            .expect(1),
    );
}

fn mount_domain(stub: &HttpStub, times: u64) {
    stub.mount(
        Mock::given(method("GET"))
            .and(path(DOMAIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "action": "get",
                "node": {"key": "/lain/config/domain", "value": "lain.local"}
            })))
            .expect(times),
    );
}

fn group_posts(stub: &HttpStub) -> Vec<serde_json::Value> {
    stub.requests()
        .iter()
        .filter(|r| r.url.path() == "/api/groups/")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[test]
fn test_init_creates_default_groups() {
    let stub = HttpStub::start();
    mount_login(&stub);
    mount_domain(&stub, 1);
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(ResponseTemplate::new(201))
            .expect(5),
    );
    let t = Test::new(&stub);

    let output = t.init(&[]);

    assert_exit(&output, 0);
    for app in ["console", "registry", "tinydns", "webrouter", "lvault"] {
        assert_stdout_contains(&output, &format!("created sso group for app {}", app));
    }

    let fullnames: Vec<String> = group_posts(&stub)
        .iter()
        .map(|g| g["fullname"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        fullnames,
        vec![
            "Console APP in lain.local: console",
            "Console APP in lain.local: registry",
            "Console APP in lain.local: tinydns",
            "Console APP in lain.local: webrouter",
            "Console APP in lain.local: lvault",
        ]
    );
    for group in group_posts(&stub) {
        let name = group["name"].as_str().unwrap();
        assert!(name.starts_with("ca"));
        assert_eq!(name.len(), 32);
    }
    stub.verify();
}

#[test]
fn test_init_prefixes_from_env_skip_domain() {
    let stub = HttpStub::start();
    mount_login(&stub);
    mount_domain(&stub, 0);
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(5),
    );
    let t = Test::new(&stub);

    let output = t
        .cmd()
        .args(["init", "--username", "admin@lain.local"])
        .env("LAIN_SSO_PASSWORD", "hunter2")
        .env("SSO_GROUP_NAME_PREFIX", "ConsoleAppexample.com")
        .env("SSO_GROUP_FULLNAME_PREFIX", "Apps of example.com: ")
        .output()
        .unwrap();

    assert_exit(&output, 0);
    assert_eq!(
        group_posts(&stub)[0]["fullname"],
        json!("Apps of example.com: console")
    );
    stub.verify();
}

#[test]
fn test_init_login_failure_creates_nothing() {
    let stub = HttpStub::start();
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant")),
    );
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0),
    );
    let t = Test::new(&stub);

    let output = t.init(&[]);

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "login failed");
    assert_stdout_contains(&output, "check the SSO client id");
    stub.verify();
}

#[test]
fn test_init_continues_past_failed_group() {
    let stub = HttpStub::start();
    mount_login(&stub);
    mount_domain(&stub, 1);
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .and(body_string_contains(": tinydns"))
            .respond_with(ResponseTemplate::new(409).set_body_string("group exists"))
            .expect(1),
    );
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(4),
    );
    let t = Test::new(&stub);

    let output = t.init(&[]);

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "sso group for app tinydns not created");
    assert_stderr_contains(&output, "group exists");
    assert_stdout_contains(&output, "created sso group for app lvault");
    stub.verify();
}

#[test]
fn test_init_check_all_uses_console_apps() {
    let stub = HttpStub::start();
    mount_login(&stub);
    mount_domain(&stub, 1);
    stub.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/repos/"))
            .and(header("access-token", "t0ken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "repos": [{"appname": "hello"}, {"appname": "console"}]
            })))
            .expect(1),
    );
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(2),
    );
    let t = Test::with_extra_settings(
        &stub,
        &format!("[console]\nbase_url = \"{}\"\n", stub.uri()),
    );

    let output = t.init(&["--check-all"]);

    assert_exit(&output, 0);
    assert_stdout_contains(&output, "created sso group for app hello");
    let fullnames: Vec<String> = group_posts(&stub)
        .iter()
        .map(|g| g["fullname"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        fullnames,
        vec![
            "Console APP in lain.local: hello",
            "Console APP in lain.local: console",
        ]
    );
    stub.verify();
}

#[test]
fn test_init_check_all_console_down_creates_nothing() {
    let stub = HttpStub::start();
    mount_login(&stub);
    mount_domain(&stub, 1);
    stub.mount(
        Mock::given(method("POST"))
            .and(path("/api/groups/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0),
    );
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let t = Test::with_extra_settings(
        &stub,
        &format!("[console]\nbase_url = \"http://{}\"\n", closed),
    );

    let output = t.init(&["--check-all"]);

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "app directory unavailable");
    assert_stdout_contains(&output, "run without --check-all");
    stub.verify();
}

#[test]
fn test_init_rejects_bad_sso_url() {
    let stub = HttpStub::start();
    let t = Test::new(&stub);

    let output = t.init(&["--sso-url", "ftp://sso.lain.local"]);

    assert_exit(&output, 1);
    assert_stderr_contains(&output, "invalid config");
    assert!(stub.requests().is_empty());
}
