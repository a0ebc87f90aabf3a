#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::process::Command;

fn console() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_leasing-console"));
    cmd.env_remove("RUST_LOG")
        .env_remove("CONSOLE__API__BASE_URL")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    let output = console().arg("--help").output().expect("failed to run binary");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["login", "logout", "switch-scope", "nav", "route"] {
        assert!(stdout.contains(cmd), "help is missing '{cmd}': {stdout}");
    }
}

#[test]
fn print_config_shows_defaults() {
    let output = console()
        .arg("--print-config")
        .output()
        .expect("failed to run binary");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration:"));
    assert!(stdout.contains("http://localhost:8000/api/"));
}

#[test]
fn missing_config_file_is_an_error() {
    let output = console()
        .args(["--config", "/definitely/not/here.yaml", "route", "/"])
        .output()
        .expect("failed to run binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("config file does not exist"));
}

#[test]
fn protected_route_without_session_redirects_to_login() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");

    let output = console()
        .arg("--session-file")
        .arg(&session)
        .args(["route", "/tenants"])
        .output()
        .expect("failed to run binary");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/tenants -> redirect to /login"), "{stdout}");
}

#[test]
fn whoami_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let output = console()
        .arg("--session-file")
        .arg(dir.path().join("session.json"))
        .arg("whoami")
        .output()
        .expect("failed to run binary");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Not signed in"));
}
