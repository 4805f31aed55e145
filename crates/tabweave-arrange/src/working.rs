#![forbid(unsafe_code)]

//! Scratch arrangement shared by the move and reorder engines.
//!
//! The snapshot's items are split into the pinned and unpinned partitions,
//! edited in place, joined, renumbered, verified and diffed against the input.

use std::ops::Range;

use tabweave_core::{ArrangeError, Direction, GroupId, Item, ItemId, Plan, Snapshot, chunk_ranges};

use crate::config::ArrangeConfig;

pub(crate) struct Working<'a> {
    snapshot: &'a Snapshot,
    pinned: Vec<Item>,
    unpinned: Vec<Item>,
}

impl<'a> Working<'a> {
    pub(crate) fn new(snapshot: &'a Snapshot) -> Self {
        let split = snapshot.pinned_count();
        Self {
            snapshot,
            pinned: snapshot.items[..split].to_vec(),
            unpinned: snapshot.items[split..].to_vec(),
        }
    }

    /// Run `edit` on both partitions, each viewed so that `direction` points
    /// toward the end of the slice.
    pub(crate) fn edit_partitions(
        &mut self,
        direction: Direction,
        mut edit: impl FnMut(&mut Vec<Item>, &Snapshot),
    ) {
        let snapshot = self.snapshot;
        for part in [&mut self.pinned, &mut self.unpinned] {
            oriented(part, direction, |part| edit(part, snapshot));
        }
    }

    /// Join, renumber and verify; the active item is carried over.
    pub(crate) fn finish(self, config: &ArrangeConfig) -> Result<Snapshot, ArrangeError> {
        let mut items = self.pinned;
        items.extend(self.unpinned);
        for (order, item) in items.iter_mut().enumerate() {
            item.order = order;
        }
        let after = Snapshot {
            items,
            groups: self.snapshot.groups.clone(),
            active: self.snapshot.active,
        };
        verify(&after, config)?;
        Ok(after)
    }

    /// [`finish`](Self::finish), then diff against the input snapshot.
    pub(crate) fn into_plan(self, config: &ArrangeConfig) -> Result<Plan, ArrangeError> {
        let before = self.snapshot;
        let after = self.finish(config)?;
        Ok(Plan::diff(before, &after))
    }
}

/// Re-check a computed arrangement when `verify_plans` is on.
pub(crate) fn verify(after: &Snapshot, config: &ArrangeConfig) -> Result<(), ArrangeError> {
    if !config.verify_plans {
        return Ok(());
    }
    match after.structural_report().issues.into_iter().next() {
        None => Ok(()),
        Some(issue) => {
            tracing::error!(
                message = "arrange.verify_failed",
                code = issue.code.as_str(),
                detail = %issue.message
            );
            Err(ArrangeError::PlanBrokeInvariant(issue))
        }
    }
}

/// Apply `f` with the slice reversed for backward directions.
pub(crate) fn oriented<T>(items: &mut Vec<T>, direction: Direction, f: impl FnOnce(&mut Vec<T>)) {
    if direction == Direction::Backward {
        items.reverse();
        f(items);
        items.reverse();
    } else {
        f(items);
    }
}

/// Visible and highlighted: the items moves and reorders act on.
pub(crate) fn is_moving(snapshot: &Snapshot, item: &Item) -> bool {
    item.highlighted && !snapshot.is_hidden(item)
}

/// Maximal runs of adjacent moving items sharing one group key.
pub(crate) fn units(snapshot: &Snapshot, part: &[Item]) -> Vec<(Option<GroupId>, Range<usize>)> {
    chunk_ranges(part, |item| is_moving(snapshot, item).then_some(item.group))
        .into_iter()
        .filter_map(|(key, range)| key.map(|group| (group, range)))
        .collect()
}

/// Position of the first visible item at or after `from`.
pub(crate) fn next_visible(snapshot: &Snapshot, part: &[Item], from: usize) -> Option<usize> {
    (from..part.len()).find(|&at| !snapshot.is_hidden(&part[at]))
}

/// Ids of `items`, in order.
pub(crate) fn ids(items: &[Item]) -> Vec<ItemId> {
    items.iter().map(|item| item.id).collect()
}
