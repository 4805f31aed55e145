#![forbid(unsafe_code)]

//! Reverse or sort the selection in place, one moving unit at a time.
//!
//! Units never span a partition or a group boundary, so permuting inside a
//! unit keeps pins and groups intact.

use tabweave_core::{ArrangeError, Direction, Item, Plan, Snapshot};

use crate::Arranger;
use crate::working::{Working, units};

impl Arranger {
    /// Reverse each run of adjacent highlighted visible items.
    pub fn reverse_selection(&self, snapshot: &Snapshot) -> Result<Plan, ArrangeError> {
        self.reorder(snapshot, "arrange.reverse_selection", |unit| unit.reverse())
    }

    /// Stable-sort each run of adjacent highlighted visible items by `key`.
    pub fn sort_selection<K, F>(&self, snapshot: &Snapshot, key: F) -> Result<Plan, ArrangeError>
    where
        K: Ord,
        F: Fn(&Item) -> K,
    {
        self.reorder(snapshot, "arrange.sort_selection", |unit| unit.sort_by_key(|item| key(item)))
    }

    fn reorder(
        &self,
        snapshot: &Snapshot,
        operation: &'static str,
        mut permute: impl FnMut(&mut [Item]),
    ) -> Result<Plan, ArrangeError> {
        let _span = tracing::debug_span!("arrange.reorder", operation).entered();
        self.admit(snapshot)?;
        let mut working = Working::new(snapshot);
        working.edit_partitions(Direction::Forward, |part, snapshot| {
            for (_, unit) in units(snapshot, part) {
                permute(&mut part[unit]);
            }
        });
        let plan = working.into_plan(&self.config)?;
        tracing::debug!(message = operation, items = snapshot.len(), changes = plan.len());
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabweave_core::{Group, GroupId, ItemId};

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw)
    }

    fn order(snapshot: &Snapshot) -> Vec<u64> {
        snapshot.items.iter().map(|item| item.id.get()).collect()
    }

    fn snapshot() -> Snapshot {
        let g = GroupId::new(1);
        Snapshot::from_sequence(
            [
                Item::new(id(1)).pinned().highlighted(),
                Item::new(id(2)).pinned().highlighted(),
                Item::new(id(5)).highlighted(),
                Item::new(id(3)).highlighted(),
                Item::new(id(9)).in_group(g).highlighted(),
                Item::new(id(4)).in_group(g).highlighted(),
                Item::new(id(8)).in_group(g),
            ],
            [Group::new(g)],
            Some(id(5)),
        )
    }

    #[test]
    fn reverse_stays_inside_partitions_and_groups() {
        let snapshot = snapshot();
        let plan = Arranger::default()
            .reverse_selection(&snapshot)
            .expect("reverse");
        let after = plan.apply(&snapshot).expect("apply");
        assert_eq!(order(&after), vec![2, 1, 3, 5, 4, 9, 8]);
        assert!(after.invariant_report().is_clean());
    }

    #[test]
    fn sort_by_id() {
        let snapshot = snapshot();
        let plan = Arranger::default()
            .sort_selection(&snapshot, |item| item.id)
            .expect("sort");
        let after = plan.apply(&snapshot).expect("apply");
        assert_eq!(order(&after), vec![1, 2, 3, 5, 4, 9, 8]);
        assert!(plan.groups.is_empty());
    }
}
