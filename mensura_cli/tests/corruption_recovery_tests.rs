//! Corruption recovery tests for the mensura binary.
//!
//! These tests verify the system can handle:
//! - Corrupted log lines
//! - Missing data directories
//! - Corrupted configuration

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PASSWORD: &str = "test-secret";

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mensura"));
    cmd.env("APP_PASSWORD", PASSWORD)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--password")
        .arg(PASSWORD);
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_log_lines_skipped() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("data")).unwrap();

    fs::write(
        dir.join("data/mesures.jsonl"),
        "{\"id\":1,\"date\":\"2024-01-01\",\"weight\":80.0,\"waist\":90.0,\"chest\":100.0}\n\
         { invalid json }\n\
         {\"id\":2,\"date\":\"2024-01-08\",\"weight\":79.0,\"waist\":89.0,\"chest\":99.0}\n",
    )
    .unwrap();

    cli(dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01"))
        .stdout(predicate::str::contains("2024-01-08"))
        .stderr(predicate::str::contains("Failed to parse measurement at line 2"));

    // The next id continues after the highest valid one
    cli(dir)
        .args(["add", "--date", "2024-01-15", "--weight", "78"])
        .args(["--waist", "88", "--chest", "98"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Measurement #3"));
}

#[test]
fn test_partial_trailing_line() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    fs::create_dir_all(dir.join("data")).unwrap();

    // A write interrupted mid-line
    fs::write(
        dir.join("data/mesures.jsonl"),
        "{\"id\":1,\"date\":\"2024-01-01\",\"weight\":80.0,\"waist\":90.0,\"chest\":100.0}\n{\"id\":2,\"da",
    )
    .unwrap();

    cli(dir)
        .args(["report", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"record_count\": 1"));
}

#[test]
fn test_missing_data_dir_created_on_add() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    assert!(!dir.join("data").exists());

    cli(dir)
        .args(["add", "--weight", "70", "--waist", "80", "--chest", "95"])
        .assert()
        .success();

    assert!(dir.join("data/mesures.jsonl").exists());
}

#[test]
fn test_corrupted_config_file() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();
    let config_path = dir.join("config/mensura/config.toml");
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "[trends\nrolling_window_days = ").unwrap();

    cli(dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Toml"));
}
