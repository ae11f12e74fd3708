// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commit log coordinator
//!
//! Owns the chain, the cursor table and the persistence binding behind one
//! mutex. Views drive everything through [`Coordinator::pop_and_push`]:
//!
//! ```text
//! view ──(consumed, publish)──► lock ─► pop ─► retire? ─► push? ─► unlock ─► dispose
//! ```
//!
//! Chain and cursor mutation happen under the lock. Retired increments are
//! dropped after it is released.

use crate::chain::Chain;
use crate::config::CommitLogConfig;
use crate::cursor::{CursorTable, SlotRef, ViewId};
use crate::error::{CommitLogError, SinkError};
use crate::increment::{ChangeSet, Increment, SharedIncrement};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Persistence callback, invoked once per appended increment with the bound
/// store handle. Runs under the coordinator lock and must not block
/// indefinitely.
pub type PersistFn<C, H> = fn(&Increment<C>, &mut H) -> Result<(), SinkError>;

struct Binding<C, H> {
    persist: PersistFn<C, H>,
    handle: H,
}

struct Inner<C, V, H> {
    chain: Chain<C>,
    cursors: CursorTable<V>,
    binding: Option<Binding<C, H>>,
    appended: u64,
    retired: u64,
    sink_failures: u64,
}

/// A newly subscribed view
#[derive(Debug)]
pub struct Subscription<C> {
    pub id: ViewId,
    /// Empty authoring buffer for the view's first publish
    pub buffer: C,
}

/// Outcome of one [`Coordinator::pop_and_push`] call
#[derive(Debug)]
pub struct Exchange<C> {
    /// The increment the view should apply next, if any
    pub increment: Option<SharedIncrement<C>>,
    /// More increments are pending after this one
    pub has_more: bool,
    /// `increment` is the caller's own publish
    pub published: bool,
    /// The consumed increment was retired from the chain
    pub retired: bool,
}

/// Point-in-time counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitLogStats {
    pub live_increments: usize,
    pub views: usize,
    pub appended: u64,
    pub retired: u64,
    pub sink_failures: u64,
}

/// Orders, retires and optionally persists increments for a set of views.
///
/// `C` is the change-set type, `V` the opaque view identity stored per
/// cursor, `H` the persistence store handle.
pub struct Coordinator<C, V, H = ()> {
    config: CommitLogConfig,
    inner: Mutex<Inner<C, V, H>>,
}

impl<C: ChangeSet, V, H> Default for Coordinator<C, V, H> {
    fn default() -> Self {
        Self::new(CommitLogConfig::default())
    }
}

impl<C: ChangeSet, V, H> Coordinator<C, V, H> {
    pub fn new(config: CommitLogConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                chain: Chain::new(),
                cursors: CursorTable::new(),
                binding: None,
                appended: 0,
                retired: 0,
                sink_failures: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C, V, H>> {
        self.inner.lock().unwrap_or_else(|e| lock_failed(e))
    }

    /// Register a view.
    ///
    /// The cursor starts at the chain's head slot, so the view replays every
    /// increment still live in the chain before anything new.
    pub fn subscribe(&self, view: V) -> Result<Subscription<C>, CommitLogError> {
        let (id, backlog) = {
            let mut inner = self.lock();
            if inner.cursors.len() >= self.config.max_views {
                return Err(CommitLogError::TooManyViews {
                    limit: self.config.max_views,
                });
            }
            let id = inner.cursors.insert(view)?;
            (id, inner.chain.len())
        };
        tracing::info!(view = %id, backlog, "view subscribed");
        Ok(Subscription {
            id,
            buffer: C::empty(),
        })
    }

    /// Tombstone a view's cursor, returning its identity.
    ///
    /// Nothing is retired here. If this view was the last one still waiting
    /// at the head slot while every other view has already acknowledged the
    /// head, the head stays live and blocks retirement of everything behind
    /// it until the coordinator is destroyed. Drain a view before
    /// unsubscribing it.
    pub fn unsubscribe(&self, id: ViewId) -> Result<V, CommitLogError> {
        let view = self
            .lock()
            .cursors
            .remove(id)
            .ok_or(CommitLogError::UnknownView(id))?;
        tracing::info!(view = %id, "view unsubscribed");
        Ok(view)
    }

    /// Pop the view's next increment, acknowledge `consumed`, and publish
    /// `publish` once the view's backlog is drained.
    ///
    /// When the publish happens the authoring buffer is swapped for a fresh
    /// empty one and the published increment comes back as the result; the
    /// publishing view never pops its own increment again. Otherwise
    /// `publish` is left untouched.
    ///
    /// `consumed` retires the chain head only when it is the head and no
    /// other view still waits on the head slot. Anything else is a no-op.
    pub fn pop_and_push(
        &self,
        id: ViewId,
        consumed: Option<SharedIncrement<C>>,
        publish: Option<&mut C>,
    ) -> Result<Exchange<C>, CommitLogError> {
        let mut disposed = None;
        let exchange = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            let slot = inner
                .cursors
                .get(id)
                .ok_or(CommitLogError::UnknownView(id))?
                .slot;

            // Room for a publish is reserved before anything moves, so an
            // allocation failure leaves the chain and cursors untouched
            if publish.is_some() {
                inner.chain.reserve()?;
            }

            let popped = inner.chain.resolve(slot);
            let mut has_more = false;
            if let Some(popped) = popped {
                set_slot(&mut inner.cursors, id, SlotRef::After(popped));
                has_more = inner.chain.next_of(popped).is_some();
            }

            let mut retired = false;
            if let Some(consumed) = &consumed {
                let head = inner.chain.head();
                if head == Some(consumed.id()) && !inner.cursors.any_at(SlotRef::ChainHead) {
                    // The head's next-slot dies with it; whoever waits there
                    // now waits on the head slot, which will hold the same
                    // successor.
                    let moved = inner
                        .cursors
                        .redirect(SlotRef::After(consumed.id()), SlotRef::ChainHead);
                    disposed = inner.chain.retire_head();
                    inner.retired += 1;
                    retired = true;
                    tracing::debug!(increment = %consumed.id(), redirected = moved, "head retired");
                }
            }

            match (popped, publish) {
                (None, Some(buffer)) => {
                    let increment = inner.chain.create(std::mem::replace(buffer, C::empty()));
                    if let Some(binding) = inner.binding.as_mut() {
                        if let Err(e) = (binding.persist)(&increment, &mut binding.handle) {
                            inner.sink_failures += 1;
                            tracing::error!(increment = %increment.id(), error = %e, "failed to persist increment");
                        }
                    }
                    inner.chain.append(increment.clone());
                    inner.appended += 1;

                    // The view's cursor sat at the end of the chain, so its
                    // slot now names the increment it just published.
                    let own = current_slot(&inner.cursors, id);
                    debug_assert_eq!(inner.chain.resolve(own), Some(increment.id()));
                    set_slot(&mut inner.cursors, id, SlotRef::After(increment.id()));
                    tracing::debug!(view = %id, increment = %increment.id(), "increment published");

                    Exchange {
                        increment: Some(increment),
                        has_more: false,
                        published: true,
                        retired,
                    }
                }
                (popped, _) => {
                    let increment = popped.and_then(|popped| inner.chain.get(popped).cloned());
                    if let Some(increment) = &increment {
                        tracing::debug!(view = %id, increment = %increment.id(), has_more, "increment popped");
                    }
                    Exchange {
                        increment,
                        has_more,
                        published: false,
                        retired,
                    }
                }
            }
        };
        drop(disposed);
        Ok(exchange)
    }

    /// Bind a persistence sink for future publishes, returning the handle
    /// it replaces
    pub fn bind_sink(&self, persist: PersistFn<C, H>, handle: H) -> Option<H> {
        let previous = self
            .lock()
            .binding
            .replace(Binding { persist, handle })
            .map(|binding| binding.handle);
        tracing::info!(replaced = previous.is_some(), "persistence sink bound");
        previous
    }

    /// Bind a new sink after forwarding it every increment the view has not
    /// popped yet, oldest first. Returns the previously bound handle.
    pub fn rebind_with_replay(
        &self,
        persist: PersistFn<C, H>,
        mut handle: H,
        id: ViewId,
    ) -> Result<Option<H>, CommitLogError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let slot = inner
            .cursors
            .get(id)
            .ok_or(CommitLogError::UnknownView(id))?
            .slot;

        let mut replayed = 0usize;
        for increment in inner.chain.iter_from(slot) {
            if let Err(e) = persist(increment, &mut handle) {
                inner.sink_failures += 1;
                tracing::error!(increment = %increment.id(), error = %e, "failed to replay increment");
            }
            replayed += 1;
        }
        let previous = inner
            .binding
            .replace(Binding { persist, handle })
            .map(|binding| binding.handle);
        drop(guard);

        tracing::info!(view = %id, replayed, "persistence sink rebound");
        Ok(previous)
    }

    /// Number of increments the view has not popped yet
    pub fn pending(&self, id: ViewId) -> Result<usize, CommitLogError> {
        let inner = self.lock();
        let slot = inner
            .cursors
            .get(id)
            .ok_or(CommitLogError::UnknownView(id))?
            .slot;
        Ok(inner.chain.iter_from(slot).count())
    }

    pub fn stats(&self) -> CommitLogStats {
        let inner = self.lock();
        CommitLogStats {
            live_increments: inner.chain.len(),
            views: inner.cursors.len(),
            appended: inner.appended,
            retired: inner.retired,
            sink_failures: inner.sink_failures,
        }
    }

    /// Whether the chain's links are intact
    pub fn is_consistent(&self) -> bool {
        self.lock().chain.is_consistent()
    }

    /// Tear down the coordinator, disposing every live increment. The bound
    /// store handle, if any, is handed back rather than dropped.
    pub fn destroy_all(self) -> Option<H> {
        let mut inner = self.inner.into_inner().unwrap_or_else(|e| lock_failed(e));
        let disposed = inner.chain.drain();
        tracing::info!(
            disposed = disposed.len(),
            views = inner.cursors.len(),
            "commit log destroyed"
        );
        inner.binding.take().map(|binding| binding.handle)
    }
}

impl<C: ChangeSet, V: Clone, H> Coordinator<C, V, H> {
    /// Identity stored for a view
    pub fn view(&self, id: ViewId) -> Option<V> {
        self.lock().cursors.get(id).map(|cursor| cursor.view.clone())
    }
}

fn current_slot<V>(cursors: &CursorTable<V>, id: ViewId) -> SlotRef {
    cursors
        .get(id)
        .map_or(SlotRef::ChainHead, |cursor| cursor.slot)
}

fn set_slot<V>(cursors: &mut CursorTable<V>, id: ViewId, slot: SlotRef) {
    if let Some(cursor) = cursors.get_mut(id) {
        cursor.slot = slot;
    }
}

/// A poisoned lock means a thread died mid-mutation; the chain and cursors
/// can no longer be trusted.
fn lock_failed<T>(_: PoisonError<T>) -> ! {
    tracing::error!("commit log lock poisoned, aborting");
    std::process::abort()
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
