#![forbid(unsafe_code)]

//! Cross-sequence move: the selection leaves one sequence for another.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use tabweave_core::{ArrangeError, Group, GroupId, Item, ItemId, Plan, Snapshot, TransferPlan};

use crate::Arranger;
use crate::working::{ids, is_moving, verify};

impl Arranger {
    /// Move the visible highlighted items of `source` into `target`.
    ///
    /// Groups whose members are all moving travel as blocks and keep their
    /// id; every other moving item arrives ungrouped. Pinned arrivals land
    /// after the target's pinned items, the rest at the end, both in source
    /// order. The source's new active item is the first visible item left
    /// after the first departure (else the last visible one), and it becomes
    /// the only highlighted item there.
    ///
    /// `target` must be structurally valid but may be empty or have no
    /// selection.
    pub fn move_to_sequence(
        &self,
        source: &Snapshot,
        target: &Snapshot,
    ) -> Result<TransferPlan, ArrangeError> {
        let _span = tracing::debug_span!("arrange.move_to_sequence").entered();
        self.admit(source)?;
        target.validate_structure()?;

        let departing: Vec<(usize, &Item)> = source
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| is_moving(source, item))
            .collect();
        self.check_len(target.len() + departing.len())?;

        // Per group: members, and how many of them are moving.
        let mut census: FxHashMap<GroupId, (usize, usize)> = FxHashMap::default();
        for item in &source.items {
            if let Some(group) = item.group {
                let (members, moving) = census.entry(group).or_default();
                *members += 1;
                *moving += usize::from(is_moving(source, item));
            }
        }
        let whole: BTreeSet<GroupId> = census
            .into_iter()
            .filter(|(_, (members, moving))| members == moving)
            .map(|(group, _)| group)
            .collect();

        let present: FxHashSet<ItemId> = target.items.iter().map(|item| item.id).collect();
        for (_, item) in &departing {
            if present.contains(&item.id) {
                tracing::warn!(message = "arrange.id_collision", item = %item.id);
                return Err(ArrangeError::IdCollision {
                    item: Some(item.id),
                    group: None,
                });
            }
        }
        for group in &whole {
            if target.groups.contains_key(group) {
                tracing::warn!(message = "arrange.id_collision", group = %group);
                return Err(ArrangeError::IdCollision {
                    item: None,
                    group: Some(*group),
                });
            }
        }

        let target_after = self.arrive(target, &departing, &whole, source);
        let source_after = depart(source, &departing, &whole);
        verify(&source_after, &self.config)?;
        verify(&target_after, &self.config)?;

        let arrived: BTreeSet<_> = departing.iter().map(|(_, item)| item.id).collect();
        let moved_items = ids(&target_after.items)
            .into_iter()
            .filter(|id| arrived.contains(id))
            .collect();
        let moved_groups = whole
            .iter()
            .filter_map(|group| source.group(*group).copied())
            .collect();

        let transfer = TransferPlan {
            source: Plan::diff(source, &source_after),
            target: Plan::diff(target, &target_after),
            moved_items,
            moved_groups,
        };
        tracing::debug!(
            message = "arrange.move_to_sequence",
            moved = transfer.moved_items.len(),
            groups = transfer.moved_groups.len(),
            source_changes = transfer.source.len(),
            target_changes = transfer.target.len()
        );
        Ok(transfer)
    }

    fn arrive(
        &self,
        target: &Snapshot,
        departing: &[(usize, &Item)],
        whole: &BTreeSet<GroupId>,
        source: &Snapshot,
    ) -> Snapshot {
        let highlight = self.config.highlight_arrivals;
        let arrivals: Vec<Item> = departing
            .iter()
            .map(|(_, item)| {
                let mut arrival = **item;
                arrival.group = arrival.group.filter(|group| whole.contains(group));
                arrival.pinned = arrival.pinned && self.config.conserve_pins;
                arrival.highlighted = highlight;
                arrival
            })
            .collect();

        let mut items: Vec<Item> = Vec::with_capacity(target.len() + arrivals.len());
        let split = target.pinned_count();
        items.extend_from_slice(&target.items[..split]);
        items.extend(arrivals.iter().filter(|item| item.pinned).copied());
        items.extend_from_slice(&target.items[split..]);
        items.extend(arrivals.iter().filter(|item| !item.pinned).copied());

        let mut active = target.active;
        if highlight && !arrivals.is_empty() {
            let arrived: FxHashSet<ItemId> = arrivals.iter().map(|arrival| arrival.id).collect();
            for item in &mut items {
                item.highlighted = arrived.contains(&item.id);
            }
            active = items.iter().find(|item| item.highlighted).map(|item| item.id);
        }
        for (order, item) in items.iter_mut().enumerate() {
            item.order = order;
        }

        let mut groups = target.groups.clone();
        for group in whole {
            let carried = source.group(*group).copied().unwrap_or(Group::new(*group));
            groups.insert(*group, carried);
        }
        Snapshot {
            items,
            groups,
            active,
        }
    }
}

/// What stays behind in the source.
fn depart(
    source: &Snapshot,
    departing: &[(usize, &Item)],
    whole: &BTreeSet<GroupId>,
) -> Snapshot {
    let first_departure = departing.first().map_or(0, |(at, _)| *at);
    let leaving: BTreeSet<_> = departing.iter().map(|(_, item)| item.id).collect();

    let remaining: Vec<(usize, Item)> = source
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| !leaving.contains(&item.id))
        .map(|(at, item)| (at, *item))
        .collect();

    let visible = |item: &Item| !source.is_hidden(item);
    let next_active = remaining
        .iter()
        .find(|(at, item)| *at > first_departure && visible(item))
        .or_else(|| remaining.iter().rev().find(|(_, item)| visible(item)))
        .map(|(_, item)| item.id);

    let items: Vec<Item> = remaining
        .into_iter()
        .enumerate()
        .map(|(order, (_, mut item))| {
            item.order = order;
            item.highlighted = Some(item.id) == next_active;
            item
        })
        .collect();

    let mut groups = source.groups.clone();
    for group in whole {
        groups.remove(group);
    }
    Snapshot {
        items,
        groups,
        active: next_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabweave_core::ItemId;

    fn id(raw: u64) -> ItemId {
        ItemId::new(raw)
    }

    fn gid(raw: u64) -> GroupId {
        GroupId::new(raw)
    }

    fn order(snapshot: &Snapshot) -> Vec<u64> {
        snapshot.items.iter().map(|item| item.id.get()).collect()
    }

    fn source() -> Snapshot {
        let g = gid(1);
        let h = gid(2);
        Snapshot::from_sequence(
            [
                Item::new(id(1)).pinned().highlighted(),
                Item::new(id(2)),
                Item::new(id(3)).in_group(g).highlighted(),
                Item::new(id(4)).in_group(g).highlighted(),
                Item::new(id(5)).in_group(h).highlighted(),
                Item::new(id(6)).in_group(h),
                Item::new(id(7)),
            ],
            [Group::new(g), Group::new(h)],
            Some(id(3)),
        )
    }

    fn target() -> Snapshot {
        Snapshot::from_sequence(
            [
                Item::new(id(10)).pinned(),
                Item::new(id(11)).highlighted(),
            ],
            [],
            Some(id(11)),
        )
    }

    #[test]
    fn whole_groups_travel_partial_groups_split() {
        let transfer = Arranger::default()
            .move_to_sequence(&source(), &target())
            .expect("transfer");
        assert_eq!(transfer.moved_items, vec![id(1), id(3), id(4), id(5)]);
        assert_eq!(transfer.moved_groups, vec![Group::new(gid(1))]);

        let (left, arrived) = transfer.apply(&source(), &target()).expect("apply");
        assert_eq!(order(&left), vec![2, 6, 7]);
        assert_eq!(order(&arrived), vec![10, 1, 11, 3, 4, 5]);
        assert!(arrived.item(id(1)).is_some_and(|item| item.pinned));
        assert_eq!(arrived.item(id(4)).and_then(|item| item.group), Some(gid(1)));
        assert_eq!(arrived.item(id(5)).and_then(|item| item.group), None);
        assert!(arrived.group(gid(1)).is_some());
        assert!(left.group(gid(1)).is_none());
        assert!(left.group(gid(2)).is_some());

        assert!(arrived.invariant_report().is_clean());
        assert!(left.invariant_report().is_clean());
        assert_eq!(arrived.active, Some(id(1)));
        assert_eq!(arrived.highlighted().len(), 4);
    }

    #[test]
    fn source_activates_first_visible_after_departure() {
        let transfer = Arranger::default()
            .move_to_sequence(&source(), &target())
            .expect("transfer");
        let (left, _) = transfer.apply(&source(), &target()).expect("apply");
        // First departure is item 1; item 2 is the first survivor after it.
        assert_eq!(left.active, Some(id(2)));
        assert_eq!(left.highlighted(), BTreeSet::from([id(2)]));
    }

    #[test]
    fn source_falls_back_to_last_visible() {
        let source = Snapshot::from_sequence(
            [
                Item::new(id(1)),
                Item::new(id(2)),
                Item::new(id(3)).highlighted(),
            ],
            [],
            Some(id(3)),
        );
        let transfer = Arranger::default()
            .move_to_sequence(&source, &Snapshot::default())
            .expect("transfer");
        let (left, arrived) = transfer
            .apply(&source, &Snapshot::default())
            .expect("apply");
        assert_eq!(left.active, Some(id(2)));
        assert_eq!(order(&arrived), vec![3]);
        assert_eq!(arrived.active, Some(id(3)));
    }

    #[test]
    fn pins_dropped_when_not_conserved() {
        let arranger = Arranger::new(crate::ArrangeConfig {
            conserve_pins: false,
            highlight_arrivals: false,
            ..crate::ArrangeConfig::default()
        });
        let transfer = arranger
            .move_to_sequence(&source(), &target())
            .expect("transfer");
        let (_, arrived) = transfer.apply(&source(), &target()).expect("apply");
        assert_eq!(order(&arrived), vec![10, 11, 1, 3, 4, 5]);
        assert!(arrived.item(id(1)).is_some_and(|item| !item.pinned));
        assert_eq!(arrived.active, Some(id(11)));
        assert_eq!(arrived.highlighted(), BTreeSet::from([id(11)]));
    }

    #[test]
    fn rejects_colliding_ids() {
        let target = Snapshot::from_sequence([Item::new(id(4))], [], None);
        assert_eq!(
            Arranger::default().move_to_sequence(&source(), &target),
            Err(ArrangeError::IdCollision {
                item: Some(id(4)),
                group: None
            })
        );

        let target = Snapshot::from_sequence(
            [Item::new(id(40)).in_group(gid(1))],
            [Group::new(gid(1))],
            None,
        );
        assert_eq!(
            Arranger::default().move_to_sequence(&source(), &target),
            Err(ArrangeError::IdCollision {
                item: None,
                group: Some(gid(1))
            })
        );
    }

    #[test]
    fn rejects_broken_target() {
        let target = Snapshot::new([Item::new(id(40)).at(3)], [], None);
        let err = Arranger::default()
            .move_to_sequence(&source(), &target)
            .expect_err("order gap");
        assert!(matches!(err, ArrangeError::InvariantViolation(_)));
    }
}
