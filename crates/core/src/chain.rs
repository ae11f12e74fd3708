// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only chain of increments
//!
//! Increments live in an id-addressed arena. Each node owns the id of its
//! successor, so the chain is a singly linked list whose links are plain ids:
//!
//! ```text
//! head ──► inc-3 ──next──► inc-4 ──next──► inc-5 ◄── tail
//! ```
//!
//! Appending links after the tail and retiring advances the head, both O(1).

use crate::cursor::SlotRef;
use crate::increment::{Increment, IncrementId, SharedIncrement};
use std::collections::HashMap;
use std::collections::TryReserveError;
use std::sync::Arc;

#[derive(Debug)]
struct Node<C> {
    increment: SharedIncrement<C>,
    next: Option<IncrementId>,
}

/// The shared, strictly ordered sequence of live increments
#[derive(Debug)]
pub struct Chain<C> {
    nodes: HashMap<IncrementId, Node<C>>,
    head: Option<IncrementId>,
    tail: Option<IncrementId>,
    next_id: u64,
}

impl<C> Default for Chain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Chain<C> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            head: None,
            tail: None,
            next_id: 0,
        }
    }

    pub fn head(&self) -> Option<IncrementId> {
        self.head
    }

    pub fn tail(&self) -> Option<IncrementId> {
        self.tail
    }

    /// Number of live increments
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: IncrementId) -> Option<&SharedIncrement<C>> {
        self.nodes.get(&id).map(|node| &node.increment)
    }

    /// Successor of a live increment
    pub fn next_of(&self, id: IncrementId) -> Option<IncrementId> {
        self.nodes.get(&id).and_then(|node| node.next)
    }

    /// The increment currently stored in a link slot
    pub fn resolve(&self, slot: SlotRef) -> Option<IncrementId> {
        match slot {
            SlotRef::ChainHead => self.head,
            SlotRef::After(id) => self.next_of(id),
        }
    }

    /// Reserve arena room for one more increment.
    ///
    /// Allocation failure leaves the chain untouched.
    pub fn reserve(&mut self) -> Result<(), TryReserveError> {
        self.nodes.try_reserve(1)
    }

    /// Allocate a new, not yet linked increment with the next id
    pub fn create(&mut self, changes: C) -> SharedIncrement<C> {
        let id = IncrementId(self.next_id);
        self.next_id += 1;
        Arc::new(Increment::new(id, changes))
    }

    /// Link an increment after the current tail
    pub fn append(&mut self, increment: SharedIncrement<C>) {
        let id = increment.id();
        match self.tail.and_then(|tail| self.nodes.get_mut(&tail)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.nodes.insert(
            id,
            Node {
                increment,
                next: None,
            },
        );
    }

    /// Unlink the head and hand it back for disposal.
    ///
    /// The caller must already have redirected every cursor that named the
    /// head's next-slot.
    pub fn retire_head(&mut self) -> Option<SharedIncrement<C>> {
        let head = self.head?;
        let node = self.nodes.remove(&head)?;
        if self.tail == Some(head) {
            self.tail = None;
        }
        self.head = node.next;
        Some(node.increment)
    }

    /// Walk the increments reachable from a link slot, in chain order
    pub fn iter_from(&self, slot: SlotRef) -> Iter<'_, C> {
        Iter {
            chain: self,
            next: self.resolve(slot),
        }
    }

    /// Unlink every increment, oldest first
    pub fn drain(&mut self) -> Vec<SharedIncrement<C>> {
        let mut drained = Vec::with_capacity(self.nodes.len());
        while let Some(increment) = self.retire_head() {
            drained.push(increment);
        }
        drained
    }

    /// Check the link invariants: following `next` from the head reaches the
    /// tail in exactly `len - 1` steps and visits every live node.
    pub fn is_consistent(&self) -> bool {
        let mut steps = 0;
        let mut current = self.head;
        let mut last = None;
        while let Some(id) = current {
            if steps >= self.nodes.len() {
                return false;
            }
            last = Some(id);
            current = self.next_of(id);
            steps += 1;
        }
        steps == self.nodes.len() && last == self.tail
    }
}

/// Iterator over a suffix of the chain
pub struct Iter<'a, C> {
    chain: &'a Chain<C>,
    next: Option<IncrementId>,
}

impl<'a, C> Iterator for Iter<'a, C> {
    type Item = &'a SharedIncrement<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.chain.nodes.get(&id)?;
        self.next = node.next;
        Some(&node.increment)
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
