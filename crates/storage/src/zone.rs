// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zone context owning the commit log its replicas share

use crate::replica::{Replica, ZoneLog};
use crate::wal::{persist_increment, Wal};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use zl_core::{CommitLogConfig, CommitLogError, CommitLogStats};

/// Errors from zone lifecycle operations
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("zone still in use by {0} replica(s)")]
    InUse(usize),
    #[error(transparent)]
    CommitLog(#[from] CommitLogError),
}

/// A zone and the coordinator its replicas share.
///
/// The coordinator is created on the first [`Zone::subscribe`] or
/// [`Zone::bind_wal`].
pub struct Zone {
    origin: String,
    config: CommitLogConfig,
    log: OnceLock<Arc<ZoneLog>>,
}

impl Zone {
    pub fn new(origin: impl Into<String>, config: CommitLogConfig) -> Self {
        Self {
            origin: origin.into(),
            config,
            log: OnceLock::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn log(&self) -> &Arc<ZoneLog> {
        self.log.get_or_init(|| {
            tracing::info!(origin = %self.origin, max_views = self.config.max_views, "zone log created");
            Arc::new(ZoneLog::new(self.config.clone()))
        })
    }

    /// Whether the coordinator exists yet
    pub fn is_active(&self) -> bool {
        self.log.get().is_some()
    }

    pub fn subscribe(&self, name: impl Into<String>) -> Result<Replica, CommitLogError> {
        Replica::subscribe(Arc::clone(self.log()), name)
    }

    /// Persist future publishes to `wal`, returning the WAL it replaces
    pub fn bind_wal(&self, wal: Wal) -> Option<Wal> {
        tracing::info!(
            zone = %self.origin,
            path = %wal.path().display(),
            writer = wal.writer_id(),
            "binding WAL"
        );
        self.log().bind_sink(persist_increment, wal)
    }

    /// Switch to `wal` after writing it every increment `replica` has not
    /// applied yet
    pub fn rebind_wal(&self, wal: Wal, replica: &Replica) -> Result<Option<Wal>, CommitLogError> {
        self.log()
            .rebind_with_replay(persist_increment, wal, replica.id())
    }

    /// Counters of the coordinator, if it exists
    pub fn stats(&self) -> Option<CommitLogStats> {
        self.log.get().map(|log| log.stats())
    }

    /// Destroy the coordinator and hand back its WAL.
    ///
    /// Refused while replicas still hold the coordinator. A later subscribe
    /// starts a fresh log.
    pub fn close(&mut self) -> Result<Option<Wal>, ZoneError> {
        let Some(log) = self.log.take() else {
            return Ok(None);
        };
        match Arc::try_unwrap(log) {
            Ok(log) => {
                tracing::info!(origin = %self.origin, "zone closed");
                Ok(log.destroy_all())
            }
            Err(log) => {
                let replicas = Arc::strong_count(&log) - 1;
                let _ = self.log.set(log);
                Err(ZoneError::InUse(replicas))
            }
        }
    }
}

impl std::fmt::Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zone")
            .field("origin", &self.origin)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod tests;
