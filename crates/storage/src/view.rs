// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized zone built by applying increments in commit order

use crate::record::{Record, RecordChange, ZoneDelta};
use std::collections::BTreeMap;

/// rdata → ttl for one owner and type
type RecordSet = BTreeMap<String, u32>;

/// Records of a zone, keyed by owner then type
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ZoneView {
    owners: BTreeMap<String, BTreeMap<String, RecordSet>>,
}

impl ZoneView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every change of an increment, in order
    pub fn apply(&mut self, delta: &ZoneDelta) {
        for change in delta.changes() {
            self.apply_change(change);
        }
    }

    pub fn apply_change(&mut self, change: &RecordChange) {
        match change {
            RecordChange::Add(record) => {
                self.owners
                    .entry(record.owner.clone())
                    .or_default()
                    .entry(record.rtype.clone())
                    .or_default()
                    .insert(record.rdata.clone(), record.ttl);
            }

            RecordChange::Remove(record) => {
                let Some(types) = self.owners.get_mut(&record.owner) else {
                    return;
                };
                if let Some(set) = types.get_mut(&record.rtype) {
                    set.remove(&record.rdata);
                    if set.is_empty() {
                        types.remove(&record.rtype);
                    }
                }
                if types.is_empty() {
                    self.owners.remove(&record.owner);
                }
            }
        }
    }

    /// Whether a record with this owner, type and rdata is present
    pub fn contains(&self, record: &Record) -> bool {
        self.owners
            .get(&record.owner)
            .and_then(|types| types.get(&record.rtype))
            .is_some_and(|set| set.contains_key(&record.rdata))
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.owners
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owners.keys().map(String::as_str)
    }

    /// Records of one owner, ordered by type then rdata
    pub fn records_of<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = Record> + 'a {
        self.owners.get(owner).into_iter().flat_map(move |types| {
            types.iter().flat_map(move |(rtype, set)| {
                set.iter().map(move |(rdata, ttl)| Record {
                    owner: owner.to_string(),
                    ttl: *ttl,
                    rtype: rtype.clone(),
                    rdata: rdata.clone(),
                })
            })
        })
    }

    /// Every record, ordered by owner, type, rdata
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.owners.keys().flat_map(move |owner| self.records_of(owner))
    }

    /// Changes that turn `self` into `other`.
    ///
    /// Removals come first, then additions; a TTL difference shows up as an
    /// addition of the new TTL.
    pub fn diff(&self, other: &ZoneView) -> ZoneDelta {
        let removed = self
            .records()
            .filter(|record| !other.contains(record))
            .map(RecordChange::Remove);
        let added = other
            .records()
            .filter(|record| self.ttl_of(record) != Some(record.ttl))
            .map(RecordChange::Add);
        removed.chain(added).collect()
    }

    fn ttl_of(&self, record: &Record) -> Option<u32> {
        self.owners
            .get(&record.owner)?
            .get(&record.rtype)?
            .get(&record.rdata)
            .copied()
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
