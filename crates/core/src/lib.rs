// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zl-core: multi-view commit log
//!
//! This crate provides:
//! - An append-only chain of increments shared by many views
//! - Per-view cursors that name link slots, so retirement can redirect them
//! - A coordinator serializing pop, retire and publish behind one lock
//! - Optional forwarding of every published increment to a persistence sink

pub mod chain;
pub mod config;
pub mod coordinator;
pub mod cursor;
pub mod error;
pub mod increment;

pub use chain::Chain;
pub use config::{CommitLogConfig, ConfigError};
pub use coordinator::{CommitLogStats, Coordinator, Exchange, PersistFn, Subscription};
pub use cursor::{Cursor, CursorTable, SlotRef, ViewId};
pub use error::{CommitLogError, SinkError};
pub use increment::{ChangeSet, Increment, IncrementId, SharedIncrement};
