// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zone records and the change-sets that carry them between views

use serde::{Deserialize, Serialize};
use zl_core::ChangeSet;

/// A single resource record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Record {
    pub owner: String,
    pub ttl: u32,
    pub rtype: String,
    pub rdata: String,
}

impl Record {
    pub fn new(
        owner: impl Into<String>,
        ttl: u32,
        rtype: impl Into<String>,
        rdata: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            ttl,
            rtype: rtype.into().to_ascii_uppercase(),
            rdata: rdata.into(),
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\tIN\t{}\t{}",
            self.owner, self.ttl, self.rtype, self.rdata
        )
    }
}

/// One change to a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "record", rename_all = "snake_case")]
pub enum RecordChange {
    /// Add a record, or update its TTL if present
    Add(Record),
    /// Remove a record; the TTL is ignored when matching
    Remove(Record),
}

impl RecordChange {
    pub fn record(&self) -> &Record {
        match self {
            RecordChange::Add(record) | RecordChange::Remove(record) => record,
        }
    }
}

/// Ordered batch of record changes, published as one increment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneDelta {
    changes: Vec<RecordChange>,
}

impl ZoneDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: RecordChange) {
        self.changes.push(change);
    }

    pub fn add(&mut self, record: Record) {
        self.push(RecordChange::Add(record));
    }

    pub fn remove(&mut self, record: Record) {
        self.push(RecordChange::Remove(record));
    }

    pub fn changes(&self) -> &[RecordChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl FromIterator<RecordChange> for ZoneDelta {
    fn from_iter<I: IntoIterator<Item = RecordChange>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl ChangeSet for ZoneDelta {
    fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
