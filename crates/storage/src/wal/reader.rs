// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL reader with corruption detection
//!
//! An unparsable line or a checksum mismatch marks the end of the usable
//! log. Everything after it is ignored.

use super::entry::WalEntry;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when reading WAL entries
#[derive(Debug, Error)]
pub enum WalReadError {
    #[error("corrupted entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads entries from a WAL file
pub struct WalReader {
    path: PathBuf,
}

impl WalReader {
    /// Open an existing WAL file
    pub fn open(path: &Path) -> Result<Self, WalReadError> {
        if !path.exists() {
            return Err(WalReadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("WAL not found: {}", path.display()),
            )));
        }
        Ok(Self::open_or_empty(path))
    }

    /// Open a WAL that may not exist yet; a missing file reads as empty
    pub fn open_or_empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Iterate over entries, yielding an error at the first bad line
    pub fn entries(&self) -> Result<WalEntryIter, WalReadError> {
        WalEntryIter::new(&self.path)
    }

    /// Every valid entry up to the first bad line.
    ///
    /// Corruption is logged and ends the read; only IO failures are errors.
    pub fn valid_entries(&self) -> Result<Vec<WalEntry>, WalReadError> {
        let mut entries = Vec::new();
        for result in self.entries()? {
            match result {
                Ok(entry) => entries.push(entry),
                Err(WalReadError::Io(e)) => return Err(WalReadError::Io(e)),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        valid = entries.len(),
                        error = %e,
                        "WAL truncated at corrupt entry"
                    );
                    break;
                }
            }
        }
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Iterator over WAL entries with byte position tracking
pub struct WalEntryIter {
    reader: Option<BufReader<File>>,
    line_number: u64,
    position: u64,
    last_valid_position: u64,
}

impl WalEntryIter {
    fn new(path: &Path) -> Result<Self, WalReadError> {
        let reader = match File::open(path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            reader,
            line_number: 0,
            position: 0,
            last_valid_position: 0,
        })
    }

    /// Byte offset just past the last valid entry read so far
    pub fn last_valid_position(&self) -> u64 {
        self.last_valid_position
    }
}

impl Iterator for WalEntryIter {
    type Item = Result<WalEntry, WalReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        loop {
            let mut line = String::new();
            let bytes_read = match reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    self.reader = None;
                    return Some(Err(WalReadError::Corrupted {
                        line: self.line_number + 1,
                        reason: e.to_string(),
                    }));
                }
                Err(e) => {
                    self.reader = None;
                    return Some(Err(WalReadError::Io(e)));
                }
            };
            self.line_number += 1;
            self.position += bytes_read as u64;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            // A final line without its newline is a torn append
            if !line.ends_with('\n') {
                self.reader = None;
                return Some(Err(WalReadError::Corrupted {
                    line: self.line_number,
                    reason: "missing line terminator".to_string(),
                }));
            }

            let entry = match WalEntry::from_line(trimmed) {
                Ok(entry) => entry,
                Err(e) => {
                    self.reader = None;
                    return Some(Err(WalReadError::Corrupted {
                        line: self.line_number,
                        reason: e.to_string(),
                    }));
                }
            };

            if !entry.verify() {
                self.reader = None;
                return Some(Err(WalReadError::ChecksumMismatch {
                    line: self.line_number,
                }));
            }

            self.last_valid_position = self.position;
            return Some(Ok(entry));
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
