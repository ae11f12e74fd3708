// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A subscribed view of a zone
//!
//! A replica stages local changes, then [`Replica::sync`] drains the shared
//! log into its [`ZoneView`] and publishes the staged batch once nothing is
//! left to pop. Every replica applies the same increments in the same order.

use crate::record::{Record, RecordChange, ZoneDelta};
use crate::view::ZoneView;
use crate::wal::Wal;
use serde::Serialize;
use std::sync::Arc;
use zl_core::{CommitLogError, Coordinator, SharedIncrement, ViewId};

/// Coordinator shared by the replicas of one zone; views are identified by
/// name and increments persist to a [`Wal`]
pub type ZoneLog = Coordinator<ZoneDelta, String, Wal>;

/// What one [`Replica::sync`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Increments applied to the view, own publish included
    pub applied: usize,
    /// The staged batch was published
    pub published: bool,
    /// Increments this replica's acknowledgements retired
    pub retired: usize,
}

pub struct Replica {
    id: ViewId,
    name: String,
    log: Arc<ZoneLog>,
    view: ZoneView,
    staged: ZoneDelta,
    last: Option<SharedIncrement<ZoneDelta>>,
    closed: bool,
}

impl Replica {
    /// Subscribe a new replica. Its first sync replays every live increment.
    pub fn subscribe(log: Arc<ZoneLog>, name: impl Into<String>) -> Result<Self, CommitLogError> {
        let name = name.into();
        let subscription = log.subscribe(name.clone())?;
        Ok(Self {
            id: subscription.id,
            name,
            log,
            view: ZoneView::new(),
            staged: subscription.buffer,
            last: None,
            closed: false,
        })
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> &ZoneView {
        &self.view
    }

    /// Changes waiting for the next publish
    pub fn staged(&self) -> &ZoneDelta {
        &self.staged
    }

    pub fn stage(&mut self, change: RecordChange) {
        self.staged.push(change);
    }

    pub fn add(&mut self, record: Record) {
        self.staged.add(record);
    }

    pub fn remove(&mut self, record: Record) {
        self.staged.remove(record);
    }

    /// Increments published by others that this replica has not applied yet
    pub fn pending(&self) -> Result<usize, CommitLogError> {
        self.log.pending(self.id)
    }

    /// Drain the log into the view, publishing staged changes on the way.
    ///
    /// Each call acknowledges the increment the previous call returned, so
    /// on return nothing is held and retirement is never blocked by this
    /// replica between syncs. Staged changes are published only after the
    /// backlog is applied; they are applied locally in commit order like
    /// everyone else's.
    pub fn sync(&mut self) -> Result<SyncReport, CommitLogError> {
        let mut report = SyncReport::default();
        loop {
            let publish = if self.staged.is_empty() {
                None
            } else {
                Some(&mut self.staged)
            };
            let exchange = self.log.pop_and_push(self.id, self.last.take(), publish)?;
            if exchange.retired {
                report.retired += 1;
            }
            let Some(increment) = exchange.increment else {
                break;
            };
            self.view.apply(increment.changes());
            report.applied += 1;
            report.published |= exchange.published;
            self.last = Some(increment);
        }
        tracing::debug!(
            replica = %self.name,
            applied = report.applied,
            published = report.published,
            retired = report.retired,
            "replica synced"
        );
        Ok(report)
    }

    /// Unsubscribe, returning the materialized view.
    ///
    /// Staged changes that were never synced are discarded.
    pub fn close(mut self) -> Result<ZoneView, CommitLogError> {
        self.closed = true;
        self.last = None;
        self.log.unsubscribe(self.id)?;
        Ok(std::mem::take(&mut self.view))
    }
}

/// Dropping a replica unsubscribes it without draining. If it was the last
/// view waiting on the oldest increment, that increment and everything
/// published after it stay live until the zone is closed; call
/// [`Replica::sync`] before dropping a replica that others keep publishing
/// past.
impl Drop for Replica {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.log.unsubscribe(self.id) {
            tracing::warn!(replica = %self.name, error = %e, "failed to unsubscribe dropped replica");
        }
    }
}

impl std::fmt::Debug for Replica {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replica")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("records", &self.view.len())
            .field("staged", &self.staged.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "replica_tests.rs"]
mod tests;
