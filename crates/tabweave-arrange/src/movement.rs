#![forbid(unsafe_code)]

//! Directional moves: one visible step, or all the way to an edge.
//!
//! Both operate on the pinned and unpinned partitions separately, and compute
//! backward moves as forward moves over the reversed partition. Within a
//! partition the moving *units* are maximal runs of adjacent, visible,
//! highlighted items with one group key; a hidden item ends a unit.
//!
//! A single step handles units from the leading edge backward. Each unit looks
//! at its *target*, the next visible item, and [`decide`] picks one
//! [`StepAction`]. A unit whose target is missing or highlighted stays put
//! (moves never wrap).

use std::collections::BTreeSet;
use std::ops::Range;

use rustc_hash::FxHashMap;
use tabweave_core::{ArrangeError, Direction, GroupId, Item, Plan, Snapshot};

use crate::Arranger;
use crate::working::{Working, is_moving, next_visible, units};

/// What one unit does on a single step. Indices are partition positions in
/// forward orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepAction {
    /// Move past the target and any hidden items before it.
    Swap { target: usize },
    /// Move past the grouped target and join its group.
    FoldIntoGroup { target: usize, group: GroupId },
    /// Leave the group, then move past the ungrouped target.
    DetachThenSwap { target: usize },
    /// Leave the group without moving. The next step folds the unit into
    /// whatever follows, or it is already against the wall.
    Detach,
    /// The unit is its whole group: move the block past everything up to and
    /// including `past` (the end of the target's group, or the target).
    RelocateGroupBlock { past: usize },
}

impl StepAction {
    /// Group the unit belongs to afterwards, given the group it had.
    pub(crate) const fn joined(self, own: Option<GroupId>) -> Option<GroupId> {
        match self {
            Self::FoldIntoGroup { group, .. } => Some(group),
            Self::DetachThenSwap { .. } | Self::Detach => None,
            Self::Swap { .. } | Self::RelocateGroupBlock { .. } => own,
        }
    }

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Swap { .. } => "swap",
            Self::FoldIntoGroup { .. } => "fold_into_group",
            Self::DetachThenSwap { .. } => "detach_then_swap",
            Self::Detach => "detach",
            Self::RelocateGroupBlock { .. } => "relocate_group_block",
        }
    }
}

/// Member count of every group present in a partition.
pub(crate) fn group_sizes(part: &[Item]) -> FxHashMap<GroupId, usize> {
    let mut sizes = FxHashMap::default();
    for group in part.iter().filter_map(|item| item.group) {
        *sizes.entry(group).or_insert(0) += 1;
    }
    sizes
}

/// Pick the action for `unit` (all members share `group`). `sizes` holds the
/// partition's current group sizes. `None` means the unit is blocked.
pub(crate) fn decide(
    snapshot: &Snapshot,
    part: &[Item],
    sizes: &FxHashMap<GroupId, usize>,
    group: Option<GroupId>,
    unit: &Range<usize>,
) -> Option<StepAction> {
    // Every unit item is a member, so equal counts mean nothing is left out.
    let whole = group.is_some_and(|group| sizes.get(&group) == Some(&unit.len()));
    let partial = group.is_some() && !whole;

    let Some(target) = next_visible(snapshot, part, unit.end) else {
        // Against the wall a partial unit still unwraps from its group.
        return partial.then_some(StepAction::Detach);
    };
    if part[target].highlighted {
        return None;
    }

    let target_group = part[target].group;
    let action = match (group, target_group) {
        (None, None) => StepAction::Swap { target },
        (None, Some(joined)) => StepAction::FoldIntoGroup {
            target,
            group: joined,
        },
        (Some(_), _) if whole => {
            let mut past = target;
            if target_group.is_some() {
                while past + 1 < part.len() && part[past + 1].group == target_group {
                    past += 1;
                }
            }
            StepAction::RelocateGroupBlock { past }
        }
        (Some(own), Some(other)) if own == other => StepAction::Swap { target },
        (Some(_), None) => StepAction::DetachThenSwap { target },
        (Some(_), Some(_)) => StepAction::Detach,
    };
    Some(action)
}

/// Carry out `action` on `unit`.
pub(crate) fn apply(part: &mut [Item], unit: Range<usize>, action: StepAction) {
    let width = unit.len();
    match action {
        StepAction::Swap { target } => part[unit.start..=target].rotate_left(width),
        StepAction::FoldIntoGroup { target, group } => {
            regroup(&mut part[unit.clone()], Some(group));
            part[unit.start..=target].rotate_left(width);
        }
        StepAction::DetachThenSwap { target } => {
            regroup(&mut part[unit.clone()], None);
            part[unit.start..=target].rotate_left(width);
        }
        StepAction::Detach => regroup(&mut part[unit], None),
        StepAction::RelocateGroupBlock { past } => part[unit.start..=past].rotate_left(width),
    }
}

fn regroup(items: &mut [Item], group: Option<GroupId>) {
    for item in items {
        item.group = group;
    }
}

fn step_partition(part: &mut Vec<Item>, snapshot: &Snapshot) {
    let mut sizes = group_sizes(part);
    // Moves only touch positions at or after a unit's start, so ranges of
    // units further back stay valid.
    for (group, unit) in units(snapshot, part).into_iter().rev() {
        let Some(action) = decide(snapshot, part, &sizes, group, &unit) else {
            tracing::trace!(
                message = "arrange.unit_blocked",
                first = %part[unit.start].id,
                len = unit.len()
            );
            continue;
        };
        tracing::trace!(
            message = "arrange.unit_step",
            action = action.as_str(),
            first = %part[unit.start].id,
            len = unit.len()
        );
        let joined = action.joined(group);
        if joined != group {
            if let Some(left) = group.and_then(|left| sizes.get_mut(&left)) {
                *left -= unit.len();
            }
            if let Some(joined) = joined {
                *sizes.entry(joined).or_insert(0) += unit.len();
            }
        }
        apply(part, unit, action);
    }
}

fn edge_partition(part: &mut Vec<Item>, snapshot: &Snapshot) {
    let moving: Vec<bool> = part.iter().map(|item| is_moving(snapshot, item)).collect();
    if !moving.contains(&true) {
        return;
    }
    let touched: BTreeSet<GroupId> = part
        .iter()
        .zip(&moving)
        .filter(|(_, moving)| **moving)
        .filter_map(|(item, _)| item.group)
        .collect();

    // Members of each touched group: left behind, then moved.
    let mut blocks: FxHashMap<GroupId, (Vec<Item>, Vec<Item>)> = FxHashMap::default();
    for (item, moving_item) in part.iter().zip(&moving) {
        if let Some(group) = item.group.filter(|group| touched.contains(group)) {
            let (left, moved) = blocks.entry(group).or_default();
            if *moving_item {
                moved.push(*item);
            } else {
                left.push(*item);
            }
        }
    }

    let mut stay = Vec::with_capacity(part.len());
    let mut tail = Vec::new();
    for (item, moving_item) in part.iter().zip(&moving) {
        match item.group.filter(|group| touched.contains(group)) {
            // The whole block goes on its first member.
            Some(group) => {
                if let Some((left, moved)) = blocks.remove(&group) {
                    tail.extend(left);
                    tail.extend(moved);
                }
            }
            None if *moving_item => tail.push(*item),
            None => stay.push(*item),
        }
    }
    stay.extend(tail);
    *part = stay;
}

impl Arranger {
    /// Move the visible highlighted items one visible position in
    /// `direction`, keeping groups contiguous.
    ///
    /// Saturated units (nothing visible ahead, or a highlighted neighbor that
    /// could not move) stay put; a fully saturated selection yields an empty
    /// plan.
    pub fn move_one_step(
        &self,
        snapshot: &Snapshot,
        direction: Direction,
    ) -> Result<Plan, ArrangeError> {
        let _span = tracing::debug_span!("arrange.move_one_step", direction = direction.as_str())
            .entered();
        self.admit(snapshot)?;
        let mut working = Working::new(snapshot);
        working.edit_partitions(direction, step_partition);
        let plan = working.into_plan(&self.config)?;
        tracing::debug!(
            message = "arrange.move_one_step",
            direction = direction.as_str(),
            items = snapshot.len(),
            changes = plan.len()
        );
        Ok(plan)
    }

    /// Move the visible highlighted items of each partition to its end in
    /// `direction`, preserving their relative order.
    ///
    /// Groups with a moved member travel as one block, moved members on the
    /// edge side, so every item keeps its group.
    pub fn move_to_edge(
        &self,
        snapshot: &Snapshot,
        direction: Direction,
    ) -> Result<Plan, ArrangeError> {
        let _span =
            tracing::debug_span!("arrange.move_to_edge", direction = direction.as_str()).entered();
        self.admit(snapshot)?;
        let mut working = Working::new(snapshot);
        working.edit_partitions(direction, edge_partition);
        let plan = working.into_plan(&self.config)?;
        tracing::debug!(
            message = "arrange.move_to_edge",
            direction = direction.as_str(),
            items = snapshot.len(),
            changes = plan.len()
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabweave_core::{Group, ItemId};

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw)
    }

    fn gid(raw: u64) -> GroupId {
        GroupId::new(raw)
    }

    fn order(snapshot: &Snapshot) -> Vec<u64> {
        snapshot.items.iter().map(|item| item.id.get()).collect()
    }

    fn run(snapshot: &Snapshot, direction: Direction) -> Snapshot {
        let plan = Arranger::default()
            .move_one_step(snapshot, direction)
            .expect("move");
        plan.apply(snapshot).expect("apply")
    }

    #[test]
    fn decide_table() {
        let g = gid(1);
        let h = gid(2);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).highlighted(),
                Item::new(id(2)),
                Item::new(id(3)).in_group(g),
                Item::new(id(4)).in_group(g),
                Item::new(id(5)).in_group(h),
            ],
            [Group::new(g), Group::new(h)],
            Some(id(1)),
        );
        let part = &snapshot.items;
        let sizes = group_sizes(part);
        assert_eq!(
            decide(&snapshot, part, &sizes, None, &(0..1)),
            Some(StepAction::Swap { target: 1 })
        );
        assert_eq!(
            decide(&snapshot, part, &sizes, None, &(1..2)),
            Some(StepAction::FoldIntoGroup {
                target: 2,
                group: g
            })
        );
        assert_eq!(
            decide(&snapshot, part, &sizes, Some(g), &(2..3)),
            Some(StepAction::Swap { target: 3 })
        );
        assert_eq!(
            decide(&snapshot, part, &sizes, Some(g), &(3..4)),
            Some(StepAction::Detach)
        );
        assert_eq!(
            decide(&snapshot, part, &sizes, Some(g), &(2..4)),
            Some(StepAction::RelocateGroupBlock { past: 4 })
        );
        // Whole group at the wall: nothing to do.
        assert_eq!(decide(&snapshot, part, &sizes, Some(h), &(4..5)), None);
    }

    #[test]
    fn ungrouped_swap_forward_and_back() {
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)),
                Item::new(id(2)).highlighted(),
                Item::new(id(3)),
            ],
            [],
            Some(id(2)),
        );
        assert_eq!(order(&run(&snapshot, Direction::Forward)), vec![1, 3, 2]);
        assert_eq!(order(&run(&snapshot, Direction::Backward)), vec![2, 1, 3]);
    }

    #[test]
    fn ungrouped_item_folds_into_next_group() {
        let g = gid(1);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).highlighted(),
                Item::new(id(2)).in_group(g),
                Item::new(id(3)).in_group(g),
            ],
            [Group::new(g)],
            Some(id(1)),
        );
        let after = run(&snapshot, Direction::Forward);
        assert_eq!(order(&after), vec![2, 1, 3]);
        assert_eq!(after.item(id(1)).and_then(|item| item.group), Some(g));
    }

    #[test]
    fn partial_group_tail_detaches_then_swaps() {
        let g = gid(1);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).in_group(g),
                Item::new(id(2)).in_group(g).highlighted(),
                Item::new(id(3)),
            ],
            [Group::new(g)],
            Some(id(2)),
        );
        let after = run(&snapshot, Direction::Forward);
        assert_eq!(order(&after), vec![1, 3, 2]);
        assert_eq!(after.item(id(2)).and_then(|item| item.group), None);
    }

    #[test]
    fn partial_group_at_wall_unwraps() {
        let g = gid(1);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).in_group(g),
                Item::new(id(2)).in_group(g).highlighted(),
            ],
            [Group::new(g)],
            Some(id(2)),
        );
        let plan = Arranger::default()
            .move_one_step(&snapshot, Direction::Forward)
            .expect("move");
        assert!(plan.orders.is_empty());
        assert_eq!(plan.groups.get(&id(2)), Some(&None));
    }

    #[test]
    fn whole_group_jumps_next_group_block() {
        let g = gid(1);
        let h = gid(2);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).in_group(g).highlighted(),
                Item::new(id(2)).in_group(g).highlighted(),
                Item::new(id(3)).in_group(h),
                Item::new(id(4)).in_group(h),
                Item::new(id(5)),
            ],
            [Group::new(g), Group::new(h)],
            Some(id(1)),
        );
        let after = run(&snapshot, Direction::Forward);
        assert_eq!(order(&after), vec![3, 4, 1, 2, 5]);
        let after = run(&after, Direction::Forward);
        assert_eq!(order(&after), vec![3, 4, 5, 1, 2]);
        let after = run(&after, Direction::Backward);
        assert_eq!(order(&after), vec![3, 4, 1, 2, 5]);
    }

    #[test]
    fn swap_passes_collapsed_group() {
        let g = gid(1);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).highlighted(),
                Item::new(id(2)).in_group(g),
                Item::new(id(3)).in_group(g),
                Item::new(id(4)),
            ],
            [Group::collapsed(g)],
            Some(id(1)),
        );
        let after = run(&snapshot, Direction::Forward);
        assert_eq!(order(&after), vec![2, 3, 4, 1]);
    }

    #[test]
    fn pinned_partition_moves_independently() {
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).pinned(),
                Item::new(id(2)).pinned().highlighted(),
                Item::new(id(3)),
                Item::new(id(4)).highlighted(),
            ],
            [],
            Some(id(2)),
        );
        let after = run(&snapshot, Direction::Backward);
        assert_eq!(order(&after), vec![2, 1, 4, 3]);
        // Pinned item at its partition's end does not cross into unpinned.
        let plan = Arranger::default()
            .move_one_step(&snapshot, Direction::Forward)
            .expect("move");
        let after = plan.apply(&snapshot).expect("apply");
        assert_eq!(order(&after), vec![1, 2, 3, 4]);
    }

    #[test]
    fn blocked_neighbor_blocks_unit_behind_it() {
        let g = gid(1);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).highlighted(),
                Item::new(id(2)).highlighted().in_group(g),
            ],
            [Group::new(g)],
            Some(id(1)),
        );
        let plan = Arranger::default()
            .move_one_step(&snapshot, Direction::Forward)
            .expect("move");
        assert!(plan.is_empty());
    }

    #[test]
    fn edge_move_keeps_groups_whole() {
        let g = gid(1);
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)).highlighted(),
                Item::new(id(2)).in_group(g).highlighted(),
                Item::new(id(3)).in_group(g),
                Item::new(id(4)),
                Item::new(id(5)).highlighted(),
                Item::new(id(6)),
            ],
            [Group::new(g)],
            Some(id(1)),
        );
        let arranger = Arranger::default();
        let plan = arranger
            .move_to_edge(&snapshot, Direction::Forward)
            .expect("edge");
        let after = plan.apply(&snapshot).expect("apply");
        assert_eq!(order(&after), vec![4, 6, 1, 3, 2, 5]);
        assert_eq!(after.item(id(2)).and_then(|item| item.group), Some(g));

        let plan = arranger
            .move_to_edge(&snapshot, Direction::Backward)
            .expect("edge");
        let after = plan.apply(&snapshot).expect("apply");
        assert_eq!(order(&after), vec![1, 2, 3, 5, 4, 6]);
    }

    #[test]
    fn edge_move_at_edge_is_empty() {
        let snapshot = Snapshot::from_sequence(
            [
                Item::new(id(1)),
                Item::new(id(2)).highlighted(),
            ],
            [],
            Some(id(2)),
        );
        let plan = Arranger::default()
            .move_to_edge(&snapshot, Direction::Forward)
            .expect("edge");
        assert!(plan.is_empty());
    }
}
