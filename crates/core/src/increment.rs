// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Changelog increments and the change-set contract they carry

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifies an increment for the lifetime of its coordinator.
///
/// Ids are handed out in append order and never reused, so a stale id can
/// never alias a newer increment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IncrementId(pub u64);

impl std::fmt::Display for IncrementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inc-{}", self.0)
    }
}

/// A batch of changes carried by one increment.
///
/// The engine never inspects the contents. It only needs to hand out fresh
/// authoring buffers; disposal is `Drop`.
pub trait ChangeSet: Send + Sync + 'static {
    /// Create an empty change-set for a view to author into
    fn empty() -> Self;
}

impl<T: Send + Sync + 'static> ChangeSet for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
}

/// One entry in the shared changelog
#[derive(Debug)]
pub struct Increment<C> {
    id: IncrementId,
    changes: C,
}

impl<C> Increment<C> {
    pub(crate) fn new(id: IncrementId, changes: C) -> Self {
        Self { id, changes }
    }

    pub fn id(&self) -> IncrementId {
        self.id
    }

    pub fn changes(&self) -> &C {
        &self.changes
    }
}

/// Increments are shared read-only between the chain and every view that
/// popped them.
pub type SharedIncrement<C> = Arc<Increment<C>>;
