// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-view cursors into the chain
//!
//! A cursor does not point at an increment. It names the link slot that will
//! hold the view's next increment: either the chain's head slot or the
//! next-slot of a specific increment. Advancing or redirecting a cursor is a
//! single assignment wherever it sits in the chain.

use crate::increment::IncrementId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, TryReserveError};

/// Handle identifying a subscribed view.
///
/// The generation changes every time a slot is tombstoned, so an id kept
/// past `unsubscribe` never reaches the view that reuses its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId {
    index: usize,
    generation: u32,
}

impl ViewId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Position in the cursor table
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.generation {
            0 => write!(f, "view-{}", self.index),
            generation => write!(f, "view-{}.{}", self.index, generation),
        }
    }
}

/// A link slot in the chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotRef {
    /// The chain's head slot
    ChainHead,
    /// The next-slot owned by the given increment
    After(IncrementId),
}

/// A view's progress marker
#[derive(Debug, Clone)]
pub struct Cursor<V> {
    pub view: V,
    pub slot: SlotRef,
}

#[derive(Debug)]
struct Slot<V> {
    generation: u32,
    cursor: Option<Cursor<V>>,
}

/// Cursor slots indexed by view id.
///
/// Unsubscribed slots become tombstones that every scan skips. Tombstones
/// are reused lowest-index first, so churn never grows the table.
#[derive(Debug)]
pub struct CursorTable<V> {
    slots: Vec<Slot<V>>,
    free: BTreeSet<usize>,
}

impl<V> Default for CursorTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CursorTable<V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: BTreeSet::new(),
        }
    }

    /// Add a cursor at the chain's head slot
    pub fn insert(&mut self, view: V) -> Result<ViewId, TryReserveError> {
        let cursor = Cursor {
            view,
            slot: SlotRef::ChainHead,
        };
        if let Some(index) = self.free.first().copied() {
            if let Some(slot) = self.slots.get_mut(index) {
                self.free.remove(&index);
                slot.cursor = Some(cursor);
                return Ok(ViewId::new(index, slot.generation));
            }
        }
        self.slots.try_reserve(1)?;
        self.slots.push(Slot {
            generation: 0,
            cursor: Some(cursor),
        });
        Ok(ViewId::new(self.slots.len() - 1, 0))
    }

    /// Tombstone a slot, returning the view it held
    pub fn remove(&mut self, id: ViewId) -> Option<V> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let cursor = slot.cursor.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.insert(id.index);
        Some(cursor.view)
    }

    pub fn get(&self, id: ViewId) -> Option<&Cursor<V>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.cursor.as_ref())
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut Cursor<V>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.cursor.as_mut())
    }

    /// Number of live (non-tombstoned) cursors
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity of the table, tombstones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViewId, &Cursor<V>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.cursor
                .as_ref()
                .map(|cursor| (ViewId::new(index, slot.generation), cursor))
        })
    }

    /// Whether any live cursor names the given slot
    pub fn any_at(&self, slot: SlotRef) -> bool {
        self.iter().any(|(_, cursor)| cursor.slot == slot)
    }

    /// Point every cursor naming `from` at `to`, returning how many moved
    pub fn redirect(&mut self, from: SlotRef, to: SlotRef) -> usize {
        let mut moved = 0;
        for cursor in self.slots.iter_mut().filter_map(|slot| slot.cursor.as_mut()) {
            if cursor.slot == from {
                cursor.slot = to;
                moved += 1;
            }
        }
        moved
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
