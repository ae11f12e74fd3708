// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::record::{Record, ZoneDelta};
use tempfile::TempDir;
use zl_core::IncrementId;

fn temp_wal_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zone.wal");
    (dir, path)
}

fn entry(sequence: u64) -> WalEntry {
    let mut delta = ZoneDelta::new();
    delta.add(Record::new(format!("h{sequence}"), 60, "A", "192.0.2.1"));
    WalEntry::new_with_timestamp(sequence, 1_000 + sequence, "w", IncrementId(sequence), delta)
}

fn lines(entries: &[WalEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}\n", e.to_line().unwrap()))
        .collect()
}

#[test]
fn reader_reads_all_entries() {
    let (_dir, path) = temp_wal_path();
    let written: Vec<WalEntry> = (0..5).map(entry).collect();
    std::fs::write(&path, lines(&written)).unwrap();

    let reader = WalReader::open(&path).unwrap();
    let read: Vec<WalEntry> = reader.entries().unwrap().map(Result::unwrap).collect();
    assert_eq!(read, written);
    let last = reader.valid_entries().unwrap().pop().map(|e| e.sequence);
    assert_eq!(last, Some(4));
}

#[test]
fn open_missing_file_fails() {
    let (_dir, path) = temp_wal_path();
    assert!(matches!(WalReader::open(&path), Err(WalReadError::Io(_))));
}

#[test]
fn open_or_empty_reads_missing_file_as_empty() {
    let (_dir, path) = temp_wal_path();
    let reader = WalReader::open_or_empty(&path);
    assert_eq!(reader.entries().unwrap().count(), 0);
    assert!(reader.valid_entries().unwrap().is_empty());
}

#[test]
fn reader_skips_empty_lines() {
    let (_dir, path) = temp_wal_path();
    let content = format!(
        "{}\n\n{}\n\n",
        entry(0).to_line().unwrap(),
        entry(1).to_line().unwrap()
    );
    std::fs::write(&path, content).unwrap();

    let reader = WalReader::open(&path).unwrap();
    assert_eq!(reader.valid_entries().unwrap().len(), 2);
}

#[test]
fn reader_stops_at_truncated_line() {
    let (_dir, path) = temp_wal_path();
    let mut content = lines(&[entry(0), entry(1)]);
    let partial = entry(2).to_line().unwrap();
    content.push_str(&partial[..partial.len() / 2]);
    std::fs::write(&path, content).unwrap();

    let reader = WalReader::open(&path).unwrap();
    let results: Vec<_> = reader.entries().unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(WalReadError::Corrupted { line: 3, .. })));
}

#[test]
fn reader_stops_at_checksum_mismatch() {
    let (_dir, path) = temp_wal_path();
    let mut bad = entry(1);
    bad.checksum = bad.checksum.wrapping_add(1);
    std::fs::write(&path, lines(&[entry(0), bad, entry(2)])).unwrap();

    let reader = WalReader::open(&path).unwrap();
    let results: Vec<_> = reader.entries().unwrap().collect();
    assert_eq!(results.len(), 2);
    assert!(matches!(results[1], Err(WalReadError::ChecksumMismatch { line: 2 })));
    assert_eq!(reader.valid_entries().unwrap(), vec![entry(0)]);
}

#[test]
fn valid_entries_ends_at_corruption() {
    let (_dir, path) = temp_wal_path();
    let content = format!("{}not json\n{}", lines(&[entry(0)]), lines(&[entry(1)]));
    std::fs::write(&path, content).unwrap();

    let entries = WalReader::open(&path).unwrap().valid_entries().unwrap();
    assert_eq!(entries, vec![entry(0)]);
}

#[test]
fn last_valid_position_points_past_last_good_line() {
    let (_dir, path) = temp_wal_path();
    let good = lines(&[entry(0), entry(1)]);
    std::fs::write(&path, format!("{good}{{torn")).unwrap();

    let reader = WalReader::open(&path).unwrap();
    let mut iter = reader.entries().unwrap();
    for _ in iter.by_ref() {}
    assert_eq!(iter.last_valid_position(), good.len() as u64);
}
