// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL entry with checksum verification

use crate::record::ZoneDelta;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use zl_core::IncrementId;

/// One persisted increment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Position in this file, starting at 0
    pub sequence: u64,
    /// Microseconds since Unix epoch
    pub timestamp_micros: u64,
    pub writer_id: String,
    /// Id the coordinator assigned to the increment
    pub increment: IncrementId,
    pub changes: ZoneDelta,
    /// CRC32 of the serialized increment id and changes
    pub checksum: u32,
}

impl WalEntry {
    pub fn new(sequence: u64, writer_id: &str, increment: IncrementId, changes: ZoneDelta) -> Self {
        let timestamp_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        Self::new_with_timestamp(sequence, timestamp_micros, writer_id, increment, changes)
    }

    pub fn new_with_timestamp(
        sequence: u64,
        timestamp_micros: u64,
        writer_id: &str,
        increment: IncrementId,
        changes: ZoneDelta,
    ) -> Self {
        let checksum = Self::calculate_checksum(increment, &changes);
        Self {
            sequence,
            timestamp_micros,
            writer_id: writer_id.to_string(),
            increment,
            changes,
            checksum,
        }
    }

    fn calculate_checksum(increment: IncrementId, changes: &ZoneDelta) -> u32 {
        // Records are plain strings and integers, so serialization cannot fail
        let json = serde_json::to_string(&(increment, changes)).unwrap_or_default();
        crc32fast::hash(json.as_bytes())
    }

    /// Whether the checksum matches the payload
    pub fn verify(&self) -> bool {
        self.checksum == Self::calculate_checksum(self.increment, &self.changes)
    }

    /// Serialize to one line of JSON, without the trailing newline
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
