//! Smoke tests for the storeprobe CLI
//!
//! These exercise the binary without launching a browser.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the storeprobe binary
fn storeprobe() -> Command {
    let mut cmd = Command::cargo_bin("storeprobe").expect("storeprobe binary should exist");
    cmd.env_remove("STOREPROBE_BASE_URL")
        .env_remove("STOREPROBE_HEADLESS")
        .env_remove("CHROMIUM_PATH")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    storeprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    storeprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    storeprobe().assert().failure();
}

#[test]
fn test_run_help_lists_flags() {
    storeprobe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--known-defects"))
        .stdout(predicate::str::contains("--headed"))
        .stdout(predicate::str::contains("--strict"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_all() {
    storeprobe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("login::invalid_credentials"))
        .stdout(predicate::str::contains("cart::remove_product"))
        .stdout(predicate::str::contains("known-defect").not());
}

#[test]
fn test_list_known_defects() {
    storeprobe()
        .args(["list", "--known-defects", "--suite", "contact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("contact::empty_message_rejected"))
        .stdout(predicate::str::contains("BUG:"))
        .stdout(predicate::str::contains("login::").not());
}

#[test]
fn test_list_unknown_suite() {
    storeprobe()
        .args(["list", "--suite", "checkout"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown suite(s): checkout"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_defaults() {
    storeprobe()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: https://automationexercise.com"))
        .stdout(predicate::str::contains("headless: true"));
}

#[test]
fn test_config_file_and_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    fs::write(&path, "base_url: https://staging.shop.test\nstrict: true\n").unwrap();

    storeprobe()
        .args(["config", "--config"])
        .arg(&path)
        .env("STOREPROBE_HEADLESS", "false")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: https://staging.shop.test"))
        .stdout(predicate::str::contains("strict: true"))
        .stdout(predicate::str::contains("headless: false"));
}

#[test]
fn test_config_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    fs::write(&path, "base_url: https://staging.shop.test\n").unwrap();

    storeprobe()
        .args(["config", "-c"])
        .arg(&path)
        .env("STOREPROBE_BASE_URL", "http://localhost:8080")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://localhost:8080"));
}

#[test]
fn test_config_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    fs::write(&path, "base_url: ftp://shop.test\n").unwrap();

    storeprobe()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base_url must be an http(s) URL"));
}

// ============================================================================
// run (argument validation only; never reaches a browser)
// ============================================================================

#[test]
fn test_run_rejects_unknown_suite() {
    storeprobe()
        .args(["run", "--suite", "wishlist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown suite(s): wishlist"));
}

#[test]
fn test_run_rejects_bad_base_url() {
    storeprobe()
        .args(["run", "--base-url", "shop.test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base_url"));
}
