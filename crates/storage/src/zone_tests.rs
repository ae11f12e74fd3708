// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::record::Record;
use crate::wal::WalConfig;

fn zone() -> Zone {
    Zone::new("example.org.", CommitLogConfig::default())
}

#[test]
fn log_is_created_lazily() {
    let zone = zone();
    assert!(!zone.is_active());
    assert!(zone.stats().is_none());

    let _replica = zone.subscribe("r1").unwrap();
    assert!(zone.is_active());
    assert_eq!(zone.stats().map(|s| s.views), Some(1));
}

#[test]
fn close_of_unused_zone_is_noop() {
    let mut zone = zone();
    assert!(zone.close().unwrap().is_none());
    assert!(!zone.is_active());
}

#[test]
fn close_refused_while_replicas_live() {
    let mut zone = zone();
    let replica = zone.subscribe("r1").unwrap();

    let err = zone.close().unwrap_err();
    assert!(matches!(err, ZoneError::InUse(1)));
    assert!(zone.is_active());

    drop(replica);
    assert!(zone.close().is_ok());
    assert!(!zone.is_active());
}

#[test]
fn close_returns_bound_wal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zone.wal");
    let mut zone = zone();
    assert!(zone.bind_wal(Wal::open(&path, WalConfig::default()).unwrap()).is_none());

    let mut replica = zone.subscribe("r1").unwrap();
    replica.add(Record::new("www", 300, "A", "192.0.2.1"));
    replica.sync().unwrap();
    replica.close().unwrap();

    let wal = zone.close().unwrap().unwrap();
    assert_eq!(wal.sequence(), 1);
    assert_eq!(Wal::replay(&path).unwrap().len(), 1);
}

#[test]
fn rebind_wal_replays_unapplied_increments() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.wal");
    let second = dir.path().join("second.wal");
    let zone = zone();
    zone.bind_wal(Wal::open(&first, WalConfig::default()).unwrap());

    let mut writer = zone.subscribe("writer").unwrap();
    let mut reader = zone.subscribe("reader").unwrap();
    writer.add(Record::new("www", 300, "A", "192.0.2.1"));
    writer.sync().unwrap();

    let previous = zone
        .rebind_wal(Wal::open(&second, WalConfig::default()).unwrap(), &reader)
        .unwrap();
    assert_eq!(previous.map(|wal| wal.sequence()), Some(1));
    assert_eq!(Wal::replay(&second).unwrap().len(), 1);

    reader.add(Record::new("ftp", 300, "A", "192.0.2.2"));
    reader.sync().unwrap();
    assert_eq!(Wal::replay(&first).unwrap().len(), 1);
    assert_eq!(Wal::replay(&second).unwrap().len(), 2);
}

#[test]
fn zone_config_limits_replicas() {
    let zone = Zone::new("example.org.", CommitLogConfig::default().with_max_views(1));
    let _r1 = zone.subscribe("r1").unwrap();
    let err = zone.subscribe("r2").unwrap_err();
    assert!(matches!(err, CommitLogError::TooManyViews { limit: 1 }));
}

#[test]
fn origin_is_kept() {
    assert_eq!(zone().origin(), "example.org.");
}
