//! Integration tests for the CLI surface: help, version, skip gating, vars.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

const SKIP_MESSAGE: &str = "Skipping: MEGAPORT_ACCESS_KEY and MEGAPORT_SECRET_KEY must be set";

/// Binary with a clean, isolated environment.
fn harness(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pnc-harness"));
    cmd.env("NO_COLOR", "1")
        .env("PNC_CONFIG", config_dir.path().join("config.yaml"))
        .env_remove("MEGAPORT_ACCESS_KEY")
        .env_remove("MEGAPORT_SECRET_KEY")
        .env_remove("PNC_LOG");
    cmd
}

fn config_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let dir = config_dir();
    harness(&dir).assert().code(2).stderr(predicate::str::contains(
        "Plan-time validation harness",
    ));
}

#[test]
fn test_cli_help_flag_lists_commands() {
    let dir = config_dir();
    harness(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("stage"))
        .stdout(predicate::str::contains("vars"));
}

#[test]
fn test_version_command_shows_version() {
    let dir = config_dir();
    harness(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pnc-harness 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let dir = config_dir();
    let output = harness(&dir)
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_exits_two() {
    let dir = config_dir();
    harness(&dir).arg("apply").assert().code(2);
}

// --- Credential gating ---

#[test]
fn test_plan_without_credentials_skips_and_exits_zero() {
    let dir = config_dir();
    harness(&dir)
        .args(["plan", "--root", "/definitely/not/a/module"])
        .assert()
        .success()
        .stdout(predicate::str::contains(SKIP_MESSAGE));
}

#[test]
fn test_plan_with_only_secret_key_still_skips() {
    let dir = config_dir();
    harness(&dir)
        .env("MEGAPORT_SECRET_KEY", "sk-test")
        .args(["plan", "--terraform-bin", "pnc-definitely-not-terraform"])
        .assert()
        .success()
        .stdout(predicate::str::contains(SKIP_MESSAGE));
}

#[test]
fn test_plan_with_empty_access_key_skips() {
    let dir = config_dir();
    harness(&dir)
        .env("MEGAPORT_ACCESS_KEY", "")
        .env("MEGAPORT_SECRET_KEY", "sk-test")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains(SKIP_MESSAGE));
}

#[test]
fn test_plan_skips_with_conventional_no_color_values() {
    let dir = config_dir();
    for value in ["1", "yes", ""] {
        harness(&dir)
            .env("NO_COLOR", value)
            .arg("plan")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(SKIP_MESSAGE));
    }
    harness(&dir)
        .args(["plan", "--no-color"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains(SKIP_MESSAGE));
}

#[test]
fn test_plan_skip_json_lists_missing() {
    let dir = config_dir();
    let output = harness(&dir)
        .env("MEGAPORT_ACCESS_KEY", "ak-test")
        .args(["plan", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["outcome"], "skipped");
    assert_eq!(v["missing"], serde_json::json!(["MEGAPORT_SECRET_KEY"]));
}

#[test]
fn test_plan_with_unusable_binary_fails_with_json_error() {
    let dir = config_dir();
    let module = tempfile::tempdir().expect("tempdir");
    let output = harness(&dir)
        .env("MEGAPORT_ACCESS_KEY", "ak-test")
        .env("MEGAPORT_SECRET_KEY", "sk-test")
        .arg("plan")
        .arg("--root")
        .arg(module.path())
        .args(["--terraform-bin", "pnc-definitely-not-terraform", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "INTERNAL");
    assert!(
        v["message"]
            .as_str()
            .is_some_and(|m| m.contains("pnc-definitely-not-terraform"))
    );
}

// --- vars ---

#[test]
fn test_vars_prints_request_with_redacted_password() {
    let dir = config_dir();
    let output = harness(&dir)
        .args(["vars", "--name-prefix", "abc123"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["name_prefix"], "abc123");
    assert_eq!(v["do_region"], "sfo");
    assert_eq!(v["mp_contract_term_months"], 1);
    assert_eq!(v["do_vpc_ids"], serde_json::json!(["test123"]));
    assert_ne!(v["bgp_password"], "test123");
}

#[test]
fn test_vars_show_sensitive_reveals_password() {
    let dir = config_dir();
    let output = harness(&dir)
        .args(["vars", "--name-prefix", "abc123", "--show-sensitive"])
        .output()
        .expect("run");
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["bgp_password"], "test123");
}

#[test]
fn test_vars_generates_six_char_prefix() {
    let dir = config_dir();
    let output = harness(&dir).arg("vars").output().expect("run");
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let prefix = v["name_prefix"].as_str().expect("string prefix");
    assert_eq!(prefix.len(), 6);
    assert!(prefix.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_vars_invalid_config_input_is_invalid_request() {
    let dir = config_dir();
    std::fs::write(
        dir.path().join("config.yaml"),
        "inputs:\n  do_peer_router_ip: nope\n",
    )
    .expect("write config");
    let output = harness(&dir)
        .args(["vars", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(v["code"], "INVALID_REQUEST");
}
