// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of published increments
//!
//! ```text
//! Coordinator ─persist_increment─► Wal ─► disk (zone.wal)
//!                                            ↓
//!                                  WalReader ─► replay ─► ZoneView
//! ```
//!
//! - One JSON line per increment, CRC32 over the payload
//! - `fsync` after every append unless disabled in [`WalConfig`]
//! - Readers stop at the first truncated or corrupted line
//! - Reopening truncates a corrupted tail and continues the sequence

pub mod entry;
pub mod reader;
pub mod writer;

pub use entry::WalEntry;
pub use reader::{WalEntryIter, WalReadError, WalReader};
pub use writer::{persist_increment, Wal};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("read error: {0}")]
    Read(#[from] WalReadError),
}

/// Writer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalConfig {
    /// Stamped on every entry this writer appends
    pub writer_id: String,
    /// `fsync` before `append` returns
    pub sync_on_append: bool,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            writer_id: uuid::Uuid::new_v4().to_string(),
            sync_on_append: true,
        }
    }
}

impl WalConfig {
    pub fn with_writer_id(mut self, writer_id: impl Into<String>) -> Self {
        self.writer_id = writer_id.into();
        self
    }

    pub fn with_sync_on_append(mut self, sync: bool) -> Self {
        self.sync_on_append = sync;
        self
    }
}
