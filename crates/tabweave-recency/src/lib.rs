#![forbid(unsafe_code)]

//! Recency tracking: identifiers in most-recently-used order.
//!
//! [`RecencyTracker`] keeps an unbounded set of identifiers ordered from most
//! to least recently touched. It never evicts; it only orders.
//!
//! # Layout
//!
//! A singly linked list stored in a slab (`slots`), head = most recent, plus
//! a hash index from each identifier to the slot of its *predecessor*
//! (`None` when the identifier is the head). Knowing the predecessor lets
//! `remove` and `replace` splice the list without walking it:
//!
//! ```text
//!  index:  a -> None      b -> Some(0)     c -> Some(1)
//!  slots:  [0: a | next 1] -> [1: b | next 2] -> [2: c | next -]
//! ```
//!
//! Removing `b` relinks slot 0 to slot 2 and rewrites `c`'s predecessor to
//! slot 0. Freed slots go on a free list and are reused.
//!
//! # Usage
//!
//! ```
//! use tabweave_recency::RecencyTracker;
//!
//! let mut mru = RecencyTracker::new();
//! mru.touch(1);
//! mru.touch(2);
//! mru.touch(3);
//! mru.remove(&2);
//! assert_eq!(mru.to_ordered_list(), vec![3, 1]);
//! ```
//!
//! Mutations are not synchronized; embed the tracker behind one owner (an
//! event loop or a mutex) when events arrive concurrently.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// Most-recently-used ordering over opaque identifiers.
pub struct RecencyTracker<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    /// Identifier -> slot of the node pointing at it (`None` = head).
    predecessors: FxHashMap<T, Option<usize>>,
    len: usize,
}

/// Persistable form of a tracker: identifiers, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecencySnapshot<T> {
    pub ids: Vec<T>,
}

impl<T> Default for RecencyTracker<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            predecessors: FxHashMap::default(),
            len: 0,
        }
    }
}

impl<T> RecencyTracker<T>
where
    T: Hash + Eq + Clone,
{
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty tracker with room for `capacity` identifiers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            predecessors: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            len: 0,
        }
    }

    /// Rebuild from a persisted snapshot by replaying `touch` from the least
    /// recent identifier to the most recent one.
    #[must_use]
    pub fn restore(snapshot: RecencySnapshot<T>) -> Self {
        let mut tracker = Self::with_capacity(snapshot.ids.len());
        for id in snapshot.ids.into_iter().rev() {
            tracker.touch(id);
        }
        tracker
    }

    /// Move `id` to the most recent position, inserting it when absent.
    pub fn touch(&mut self, id: T) {
        self.unlink(&id);
        self.push_front(id);
        tracing::trace!(message = "recency.touch", len = self.len);
    }

    /// Forget `id`. Returns false (and does nothing) when it is not tracked.
    pub fn remove(&mut self, id: &T) -> bool {
        let removed = self.unlink(id);
        if removed {
            tracing::trace!(message = "recency.remove", len = self.len);
        }
        removed
    }

    /// Put `new` in the position `old` occupies. No-op when `old` is not
    /// tracked.
    ///
    /// An existing entry for `new` elsewhere in the order is left in place;
    /// callers must not replace into an identifier that is already tracked.
    /// Debug builds panic when they do.
    pub fn replace(&mut self, old: &T, new: T) -> bool {
        let Some(predecessor) = self.predecessors.remove(old) else {
            return false;
        };
        debug_assert!(
            !self.predecessors.contains_key(&new),
            "replace target is already tracked"
        );
        let Some(slot) = self.successor(predecessor) else {
            return false;
        };
        if let Some(node) = self.slots[slot].as_mut() {
            node.value = new.clone();
        }
        self.predecessors.insert(new, predecessor);
        tracing::trace!(message = "recency.replace", len = self.len);
        true
    }

    /// Identifiers from most to least recently touched.
    #[must_use]
    pub fn to_ordered_list(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Iterate from most to least recently touched.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// The `n`-th most recent identifier (`0` = most recent).
    #[must_use]
    pub fn nth(&self, n: usize) -> Option<&T> {
        self.iter().nth(n)
    }

    /// The most recently touched identifier.
    #[must_use]
    pub fn most_recent(&self) -> Option<&T> {
        let head = self.head?;
        self.slots[head].as_ref().map(|node| &node.value)
    }

    /// Whether `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: &T) -> bool {
        self.predecessors.contains_key(id)
    }

    /// Number of tracked identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.predecessors.clear();
        self.head = None;
        self.len = 0;
    }

    /// Persistable copy of the current order.
    #[must_use]
    pub fn snapshot(&self) -> RecencySnapshot<T> {
        RecencySnapshot {
            ids: self.to_ordered_list(),
        }
    }

    // ── Internal helpers ──────────────────────────────────────────

    /// Slot holding the node that follows `predecessor`.
    fn successor(&self, predecessor: Option<usize>) -> Option<usize> {
        match predecessor {
            None => self.head,
            Some(slot) => self.slots[slot].as_ref()?.next,
        }
    }

    fn unlink(&mut self, id: &T) -> bool {
        let Some(predecessor) = self.predecessors.remove(id) else {
            return false;
        };
        let Some(slot) = self.successor(predecessor) else {
            return false;
        };
        let Some(node) = self.slots[slot].take() else {
            return false;
        };

        match predecessor {
            None => self.head = node.next,
            Some(prev) => {
                if let Some(prev_node) = self.slots[prev].as_mut() {
                    prev_node.next = node.next;
                }
            }
        }
        if let Some(next) = node.next
            && let Some(next_node) = self.slots[next].as_ref()
            && let Some(entry) = self.predecessors.get_mut(&next_node.value)
        {
            *entry = predecessor;
        }

        self.free.push(slot);
        self.len -= 1;
        true
    }

    fn push_front(&mut self, id: T) {
        let node = Node {
            value: id.clone(),
            next: self.head,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        if let Some(old_head) = self.head
            && let Some(old_node) = self.slots[old_head].as_ref()
            && let Some(entry) = self.predecessors.get_mut(&old_node.value)
        {
            *entry = Some(slot);
        }
        self.head = Some(slot);
        self.predecessors.insert(id, None);
        self.len += 1;
    }
}

impl<T> FromIterator<T> for RecencyTracker<T>
where
    T: Hash + Eq + Clone,
{
    /// Collect identifiers listed most recent first.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::restore(RecencySnapshot {
            ids: iter.into_iter().collect(),
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for RecencyTracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(node) = self.slots[slot].as_ref() else {
                break;
            };
            list.entry(&node.value);
            cursor = node.next;
        }
        list.finish()
    }
}

/// Iterator over a [`RecencyTracker`], most recent first.
pub struct Iter<'a, T> {
    slots: &'a [Option<Node<T>>],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slots[self.cursor?].as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a RecencyTracker<T>
where
    T: Hash + Eq + Clone,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
