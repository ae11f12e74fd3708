// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for `zl replay`

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn zl() -> Command {
    let mut cmd = Command::cargo_bin("zl").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn simulate_into(wal: &std::path::Path) {
    zl().args(["simulate", "--views", "2", "--rounds", "4", "--wal"])
        .arg(wal)
        .assert()
        .success();
}

#[test]
fn test_replay_rebuilds_simulated_zone() {
    let temp = TempDir::new().unwrap();
    let wal = temp.path().join("zone.wal");
    let zone = temp.path().join("zone.txt");
    zl().args(["simulate", "--views", "2", "--rounds", "4", "--wal"])
        .arg(&wal)
        .arg("--zone-out")
        .arg(&zone)
        .assert()
        .success();

    let output = zl()
        .args(["replay", "--ttl", "3600", "--wal"])
        .arg(&wal)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        std::fs::read_to_string(&zone).unwrap()
    );
}

#[test]
fn test_replay_without_ttl_omits_directive() {
    let temp = TempDir::new().unwrap();
    let wal = temp.path().join("zone.wal");
    simulate_into(&wal);

    zl().args(["replay", "--wal"])
        .arg(&wal)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$ORIGIN example.org.\n"))
        .stdout(predicate::str::contains("$TTL").not());
}

#[test]
fn test_replay_stops_at_corrupt_tail() {
    let temp = TempDir::new().unwrap();
    let wal = temp.path().join("zone.wal");
    simulate_into(&wal);
    let clean = zl().args(["replay", "--wal"]).arg(&wal).output().unwrap();

    let mut content = std::fs::read_to_string(&wal).unwrap();
    content.push_str("{\"sequence\": 99, \"trunc");
    std::fs::write(&wal, content).unwrap();

    let torn = zl().args(["replay", "--wal"]).arg(&wal).output().unwrap();
    assert!(torn.status.success());
    assert_eq!(torn.stdout, clean.stdout);
}

#[test]
fn test_replay_missing_wal_fails() {
    let temp = TempDir::new().unwrap();
    zl().args(["replay", "--wal"])
        .arg(temp.path().join("missing.wal"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("WAL not found"));
}

#[test]
fn test_replay_json_lists_records() {
    let temp = TempDir::new().unwrap();
    let wal = temp.path().join("zone.wal");
    let simulated = zl()
        .args(["simulate", "--views", "2", "--rounds", "4", "-o", "json", "--wal"])
        .arg(&wal)
        .output()
        .unwrap();
    assert!(simulated.status.success());
    let simulated: serde_json::Value = serde_json::from_slice(&simulated.stdout).unwrap();

    let output = zl()
        .args(["replay", "-o", "json", "--wal"])
        .arg(&wal)
        .output()
        .unwrap();
    assert!(output.status.success());
    let replayed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(replayed["origin"], "example.org.");
    assert_eq!(replayed["entries"], simulated["wal_entries"]);
    let records = replayed["records"].as_array().unwrap();
    assert_eq!(records.len() as u64, simulated["records"].as_u64().unwrap());
    assert_eq!(records[0]["owner"], "example.org.");
    assert!(replayed.get("zone_text").is_none());
}
