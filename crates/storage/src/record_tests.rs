// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    lower = { "aaaa", "AAAA" },
    mixed = { "Mx", "MX" },
    upper = { "NSEC", "NSEC" },
)]
fn record_type_is_uppercased(given: &str, expected: &str) {
    let record = Record::new("www", 300, given, "rdata");
    assert_eq!(record.rtype, expected);
}

#[test]
fn record_displays_as_zone_line() {
    let record = Record::new("www", 300, "A", "192.0.2.1");
    assert_eq!(record.to_string(), "www\t300\tIN\tA\t192.0.2.1");
}

#[test]
fn change_exposes_record() {
    let record = Record::new("mail", 60, "MX", "10 mx1");
    assert_eq!(RecordChange::Add(record.clone()).record(), &record);
    assert_eq!(RecordChange::Remove(record.clone()).record(), &record);
}

#[test]
fn change_serializes_with_op_tag() {
    let change = RecordChange::Remove(Record::new("www", 300, "A", "192.0.2.1"));
    let json = serde_json::to_value(&change).unwrap();
    assert_eq!(json["op"], "remove");
    assert_eq!(json["record"]["owner"], "www");
    assert_eq!(json["record"]["rtype"], "A");
}

#[test]
fn delta_serializes_as_plain_array() {
    let mut delta = ZoneDelta::new();
    delta.add(Record::new("www", 300, "A", "192.0.2.1"));
    let json = serde_json::to_value(&delta).unwrap();
    assert!(json.is_array());
    assert_eq!(json.as_array().map(Vec::len), Some(1));
}

#[test]
fn delta_keeps_change_order() {
    let a = Record::new("a", 1, "A", "192.0.2.1");
    let b = Record::new("b", 1, "A", "192.0.2.2");
    let mut delta = ZoneDelta::new();
    delta.add(a.clone());
    delta.remove(b.clone());
    delta.add(b.clone());

    assert_eq!(delta.len(), 3);
    assert_eq!(
        delta.changes(),
        &[
            RecordChange::Add(a),
            RecordChange::Remove(b.clone()),
            RecordChange::Add(b),
        ]
    );
}

#[test]
fn empty_change_set_is_empty_delta() {
    let delta = <ZoneDelta as ChangeSet>::empty();
    assert!(delta.is_empty());
    assert_eq!(delta, ZoneDelta::new());
}

#[test]
fn delta_collects_from_iterator() {
    let delta: ZoneDelta = (0..3)
        .map(|n| RecordChange::Add(Record::new(format!("h{n}"), 60, "A", "192.0.2.1")))
        .collect();
    assert_eq!(delta.len(), 3);
    assert_eq!(delta.changes()[2].record().owner, "h2");
}
