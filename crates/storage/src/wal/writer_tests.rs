// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::record::Record;
use tempfile::TempDir;
use zl_core::Coordinator;

fn temp_wal_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zone.wal");
    (dir, path)
}

fn config() -> WalConfig {
    WalConfig::default().with_writer_id("test-writer")
}

fn delta(owner: &str) -> ZoneDelta {
    let mut delta = ZoneDelta::new();
    delta.add(Record::new(owner, 300, "A", "192.0.2.1"));
    delta
}

#[test]
fn append_then_replay() {
    let (_dir, path) = temp_wal_path();
    {
        let mut wal = Wal::open(&path, config()).unwrap();
        assert_eq!(wal.append(IncrementId(0), &delta("a")).unwrap(), 0);
        assert_eq!(wal.append(IncrementId(1), &delta("b")).unwrap(), 1);
    }

    let entries = Wal::replay(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].increment, IncrementId(0));
    assert_eq!(entries[1].changes, delta("b"));
    assert!(entries.iter().all(|e| e.writer_id == "test-writer"));
}

#[test]
fn sequence_continues_across_reopen() {
    let (_dir, path) = temp_wal_path();
    {
        let mut wal = Wal::open(&path, config()).unwrap();
        assert_eq!(wal.sequence(), 0);
        wal.append(IncrementId(0), &delta("a")).unwrap();
        assert_eq!(wal.sequence(), 1);
    }

    let mut wal = Wal::open(&path, config()).unwrap();
    assert_eq!(wal.sequence(), 1);
    assert_eq!(wal.append(IncrementId(0), &delta("b")).unwrap(), 1);
}

#[test]
fn replay_of_missing_file_is_empty() {
    let entries = Wal::replay(Path::new("/nonexistent/path/zone.wal")).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn open_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/zone.wal");
    let wal = Wal::open(&path, config()).unwrap();
    assert_eq!(wal.path(), path);
    assert!(path.exists());
}

#[test]
fn reopen_truncates_torn_tail() {
    let (_dir, path) = temp_wal_path();
    {
        let mut wal = Wal::open(&path, config()).unwrap();
        wal.append(IncrementId(0), &delta("a")).unwrap();
    }
    let good_len = std::fs::metadata(&path).unwrap().len();
    {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"sequence\":1,\"timest").unwrap();
    }

    let mut wal = Wal::open(&path, config()).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), good_len);
    assert_eq!(wal.sequence(), 1);
    wal.append(IncrementId(1), &delta("b")).unwrap();

    let entries = Wal::replay(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].changes, delta("b"));
}

#[test]
fn unsynced_appends_are_still_readable() {
    let (_dir, path) = temp_wal_path();
    let mut wal = Wal::open(&path, config().with_sync_on_append(false)).unwrap();
    wal.append(IncrementId(0), &delta("a")).unwrap();
    assert_eq!(Wal::replay(&path).unwrap().len(), 1);
}

#[test]
fn default_config_generates_distinct_writer_ids() {
    let a = WalConfig::default();
    let b = WalConfig::default();
    assert_ne!(a.writer_id, b.writer_id);
    assert!(a.sync_on_append);
}

#[test]
fn coordinator_persists_through_wal_sink() {
    let (_dir, path) = temp_wal_path();
    let log: Coordinator<ZoneDelta, &str, Wal> = Coordinator::default();
    log.bind_sink(persist_increment, Wal::open(&path, config()).unwrap());

    let mut sub = log.subscribe("primary").unwrap();
    sub.buffer.add(Record::new("www", 300, "A", "192.0.2.1"));
    let exchange = log.pop_and_push(sub.id, None, Some(&mut sub.buffer)).unwrap();
    assert!(exchange.published);

    let wal = log.destroy_all().unwrap();
    assert_eq!(wal.sequence(), 1);

    let entries = Wal::replay(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].increment, exchange.increment.unwrap().id());
    assert_eq!(entries[0].changes.len(), 1);
}
