// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append side of the WAL, bound to a coordinator as its persistence sink

use super::entry::WalEntry;
use super::reader::{WalReadError, WalReader};
use super::{WalConfig, WalError};
use crate::record::ZoneDelta;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use zl_core::{Increment, IncrementId, SinkError};

/// Durable append-only log of increments
pub struct Wal {
    path: PathBuf,
    file: File,
    next_sequence: u64,
    config: WalConfig,
}

impl std::fmt::Debug for Wal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wal")
            .field("path", &self.path)
            .field("next_sequence", &self.next_sequence)
            .field("writer_id", &self.config.writer_id)
            .finish()
    }
}

impl Wal {
    /// Open or create a WAL file.
    ///
    /// An existing file is scanned for its last valid entry. A corrupted or
    /// torn tail is truncated so new appends stay readable.
    pub fn open(path: &Path, config: WalConfig) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let next_sequence = if path.exists() {
            Self::recover(path)?
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!(path = %path.display(), next_sequence, "opened WAL");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            next_sequence,
            config,
        })
    }

    /// Find the next sequence and cut off anything past the last valid entry
    fn recover(path: &Path) -> Result<u64, WalError> {
        let mut entries = WalReader::open_or_empty(path).entries()?;
        let mut next_sequence = 0;
        for result in entries.by_ref() {
            match result {
                Ok(entry) => next_sequence = entry.sequence + 1,
                Err(WalReadError::Io(e)) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "truncating corrupt WAL tail");
                    break;
                }
            }
        }

        let valid = entries.last_valid_position();
        let file = OpenOptions::new().write(true).open(path)?;
        if file.metadata()?.len() > valid {
            file.set_len(valid)?;
            file.sync_all()?;
        }
        Ok(next_sequence)
    }

    /// Append one increment; returns its sequence number.
    ///
    /// With `sync_on_append` the entry is on disk before this returns.
    pub fn append(&mut self, increment: IncrementId, changes: &ZoneDelta) -> Result<u64, WalError> {
        let sequence = self.next_sequence;
        let entry = WalEntry::new(sequence, &self.config.writer_id, increment, changes.clone());
        let mut line = entry.to_line()?;
        line.push('\n');

        self.file.write_all(line.as_bytes())?;
        if self.config.sync_on_append {
            self.file.sync_all()?;
        }

        self.next_sequence += 1;
        tracing::debug!(sequence, %increment, changes = changes.len(), "appended to WAL");
        Ok(sequence)
    }

    /// Sequence the next append will get
    pub fn sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer_id(&self) -> &str {
        &self.config.writer_id
    }

    /// Read every valid entry of the WAL at `path`.
    ///
    /// A missing file yields no entries. Reading stops at the first
    /// corrupted or truncated line.
    pub fn replay(path: &Path) -> Result<Vec<WalEntry>, WalError> {
        Ok(WalReader::open_or_empty(path).valid_entries()?)
    }
}

/// Sink callback binding a [`Wal`] to a zone coordinator
pub fn persist_increment(increment: &Increment<ZoneDelta>, wal: &mut Wal) -> Result<(), SinkError> {
    wal.append(increment.id(), increment.changes())?;
    Ok(())
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
