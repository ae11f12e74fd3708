// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the commit log

use crate::cursor::ViewId;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors returned by coordinator operations
#[derive(Debug, Error)]
pub enum CommitLogError {
    #[error("unknown view: {0}")]
    UnknownView(ViewId),
    #[error("view limit reached ({limit} views)")]
    TooManyViews { limit: usize },
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Error reported by a persistence sink
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;
