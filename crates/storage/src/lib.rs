// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zl-storage: DNS zones on top of the zl-core commit log
//!
//! This crate provides:
//! - Record change-sets carried by commit log increments
//! - Replicas that drain the log into a materialized zone and publish
//! - A checksummed JSONL write-ahead log bound as the persistence sink
//! - Zone text output and view comparison

pub mod record;
pub mod replica;
pub mod view;
pub mod wal;
pub mod zone;
pub mod zonefile;

pub use record::{Record, RecordChange, ZoneDelta};
pub use replica::{Replica, SyncReport, ZoneLog};
pub use view::ZoneView;
pub use wal::{persist_increment, Wal, WalConfig, WalEntry, WalError, WalReadError, WalReader};
pub use zone::{Zone, ZoneError};
pub use zonefile::write_zone;
