//! Smoke tests for the swagtest CLI
//!
//! Runs the binary against the simulated backend, so no browser or network
//! is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the swagtest binary with a clean environment
fn swagtest() -> Command {
    let mut cmd = Command::cargo_bin("swagtest").expect("swagtest binary should exist");
    for key in [
        "CI",
        "SWAGTEST_CONFIG",
        "SWAGTEST_BASE_URL",
        "SWAGTEST_WORKERS",
        "SWAGTEST_RETRIES",
        "SWAGTEST_BACKEND",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    swagtest()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.1"));
}

#[test]
fn test_help_flag() {
    swagtest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Swag Labs"))
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_shows_help() {
    swagtest().assert().failure();
}

#[test]
fn test_test_subcommand_help() {
    swagtest()
        .args(["test", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run tests"))
        .stdout(predicate::str::contains("--retries"));
}

// ============================================================================
// list / config
// ============================================================================

#[test]
fn test_list_shows_registered_tests() {
    swagtest()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulated login::valid_login_reaches_inventory"))
        .stdout(predicate::str::contains("checkout::complete_purchase"));
}

#[test]
fn test_list_json_with_filter() {
    let output = swagtest()
        .args(["list", "--json", "--filter", "cart::"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r["suite"] == "cart"));
}

#[test]
fn test_unmatched_filter_fails() {
    swagtest()
        .args(["list", "--filter", "no_such_test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no registered test matches"));
}

#[test]
fn test_config_shows_resolved_values() {
    swagtest()
        .args(["config", "--workers", "3", "--base-url", "http://localhost:8080"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8080"))
        .stdout(predicate::str::contains("effective: retries=0 workers=3"));
}

#[test]
fn test_ci_environment_applies_profile() {
    swagtest()
        .arg("config")
        .env("CI", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("effective: retries=2 workers=1"));
}

#[test]
fn test_config_file_is_read() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("swagtest.yaml");
    fs::write(&path, "retries: 3\nworkers: 2\n").unwrap();
    swagtest()
        .args(["--config", path.to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("effective: retries=3 workers=2"));
}

#[test]
fn test_unknown_config_key_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("swagtest.yaml");
    fs::write(&path, "retires: 3\n").unwrap();
    swagtest()
        .args(["--config", path.to_str().unwrap(), "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config file"))
        .stderr(predicate::str::contains("retires"));
}

#[test]
fn test_zero_workers_rejected() {
    swagtest()
        .args(["test", "--workers", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be at least 1"));
}

// ============================================================================
// test
// ============================================================================

#[test]
fn test_login_suite_passes_on_simulator() {
    let temp = TempDir::new().unwrap();
    swagtest()
        .args(["--color", "never", "test", "--filter", "login::", "--output-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS [simulated] login::valid_login_reaches_inventory"))
        .stdout(predicate::str::contains("PASSED"));

    let report = fs::read_to_string(temp.path().join("report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert!(report["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .all(|o| o["status"] == "passed"));
    assert!(temp.path().join("junit.xml").exists());
}

#[test]
fn test_quiet_run_prints_nothing_on_success() {
    let temp = TempDir::new().unwrap();
    swagtest()
        .args(["-q", "test", "--filter", "cart::remove_from_cart_page", "--output-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
