use assert_cmd::Command;
use predicates::prelude::*;

fn cmd(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("designer-ext").unwrap();
    cmd.env("DESIGNER_EXT_DATA_DIR", data_dir)
        .env("DESIGNER_EXT_API_URL", "http://127.0.0.1:9")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("designer-ext").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage site custom code"));
}

#[test]
fn test_cli_apply_help() {
    let mut cmd = Command::cargo_bin("designer-ext").unwrap();
    cmd.arg("apply").arg("--help").assert().success().stdout(predicate::str::contains("location"));
}

#[test]
fn test_cli_login_without_token_prints_authorize_url() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/auth/authorize?state=webflow_designer"));
}

#[test]
fn test_cli_status_requires_session() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["status", "--script", "s1", "--site", "site-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_cli_network_commands_require_api_url() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .env_remove("DESIGNER_EXT_API_URL")
        .args(["login", "--id-token", "tok"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DESIGNER_EXT_API_URL"));
}

#[test]
fn test_cli_local_session_commands_work_without_api_url() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .env_remove("DESIGNER_EXT_API_URL")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("loggedOut"));
    cmd(dir.path())
        .env_remove("DESIGNER_EXT_API_URL")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_cli_inspect_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    std::fs::write(
        &snapshot,
        r#"{
            "id": "root",
            "type": "Section",
            "styles": [{ "name": "hero", "properties": { "padding": "2rem" } }],
            "children": [
                { "id": "title", "type": "Heading", "tag": "h1", "textContent": "Hello" },
                { "id": "cta", "type": "Link", "tag": "a" }
            ]
        }"#,
    )
    .unwrap();

    cmd(dir.path())
        .arg("inspect")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"textContent\": \"Hello\""))
        .stdout(predicate::str::contains("\"padding\": \"2rem\""));
}

#[test]
fn test_cli_inspect_selects_nested_element() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    std::fs::write(
        &snapshot,
        r#"{ "id": "root", "type": "Body", "children": [{ "id": "nav", "type": "Navbar" }] }"#,
    )
    .unwrap();

    cmd(dir.path())
        .arg("inspect")
        .arg(&snapshot)
        .args(["--element", "nav"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"nav\""))
        .stdout(predicate::str::contains("root").not());

    cmd(dir.path())
        .arg("inspect")
        .arg(&snapshot)
        .args(["--element", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in snapshot"));
}
