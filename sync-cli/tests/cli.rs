//! Binary-level tests for the itemsync CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn itemsync(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("itemsync").unwrap();
    cmd.arg("--mock").arg("--data-dir").arg(data_dir);
    cmd
}

#[test]
fn list_shows_seed_items() {
    let dir = tempdir().unwrap();
    itemsync(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[Motivation]"))
        .stdout(predicate::str::contains("3 item(s)"));
}

#[test]
fn add_then_list_by_category() {
    let dir = tempdir().unwrap();
    itemsync(dir.path())
        .args(["add", "Ship small changes", "--category", "Craft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed to remote"));

    itemsync(dir.path())
        .args(["list", "--category", "Craft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship small changes"))
        .stdout(predicate::str::contains("1 item(s)"));
}

#[test]
fn sync_reports_banner() {
    let dir = tempdir().unwrap();
    itemsync(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced with server."));

    itemsync(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Items:      8"))
        .stdout(predicate::str::contains("None pending"));
}

#[test]
fn resolve_rejects_malformed_choice() {
    let dir = tempdir().unwrap();
    itemsync(dir.path())
        .args(["resolve", "--keep", "abc=mine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid choice"));
}

#[test]
fn bad_config_is_reported() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("itemsync.toml"), "[storage]\nbackend = 3\n").unwrap();
    itemsync(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}
