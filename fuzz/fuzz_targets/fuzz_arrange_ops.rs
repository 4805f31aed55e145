#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tabweave_arrange::{ArrangeConfig, Arranger, RelatedBy};
use tabweave_core::{Direction, Group, GroupId, Item, ItemId, Snapshot};

#[derive(Debug, Arbitrary)]
enum Slot {
    Pinned { highlighted: bool },
    Loose { highlighted: bool },
    /// Joins the group opened by the previous `Grouped` slot when `join` is set.
    Grouped { highlighted: bool, join: bool, collapsed: bool },
}

#[derive(Debug, Arbitrary)]
enum Op {
    Step(bool),
    Edge(bool),
    Extend(bool),
    Face(bool),
    Cycle(bool),
    Related,
    Reverse,
    Sort,
    Transfer,
}

#[derive(Debug, Arbitrary)]
struct Input {
    slots: Vec<Slot>,
    active: u8,
    wrap: bool,
    ops: Vec<Op>,
}

fn direction(forward: bool) -> Direction {
    if forward {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

/// Turn fuzz slots into a valid snapshot, or `None` when nothing is visible.
fn build(slots: &[Slot], active: u8) -> Option<Snapshot> {
    let mut pinned = Vec::new();
    let mut rest = Vec::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut open: Option<GroupId> = None;

    for (raw, slot) in (1u64..).zip(slots.iter().take(48)) {
        let id = ItemId::new(raw);
        match slot {
            Slot::Pinned { highlighted } => {
                let item = Item::new(id).pinned();
                pinned.push(if *highlighted { item.highlighted() } else { item });
            }
            Slot::Loose { highlighted } => {
                open = None;
                let item = Item::new(id);
                rest.push(if *highlighted { item.highlighted() } else { item });
            }
            Slot::Grouped {
                highlighted,
                join,
                collapsed,
            } => {
                let group = match open {
                    Some(group) if *join => group,
                    _ => {
                        let group = GroupId::new(raw);
                        groups.push(if *collapsed {
                            Group::collapsed(group)
                        } else {
                            Group::new(group)
                        });
                        group
                    }
                };
                open = Some(group);
                let item = Item::new(id).in_group(group);
                rest.push(if *highlighted { item.highlighted() } else { item });
            }
        }
    }

    pinned.extend(rest);
    let mut snapshot = Snapshot::from_sequence(pinned, groups, None);
    let visible: Vec<usize> = (0..snapshot.len())
        .filter(|&at| !snapshot.is_hidden(&snapshot.items[at]))
        .collect();
    if visible.is_empty() {
        return None;
    }
    let at = visible[usize::from(active) % visible.len()];
    snapshot.items[at].highlighted = true;
    snapshot.active = Some(snapshot.items[at].id);
    Some(snapshot)
}

fuzz_target!(|input: Input| {
    let Some(mut snapshot) = build(&input.slots, input.active) else {
        return;
    };
    assert!(snapshot.invariant_report().is_clean(), "builder produced {snapshot:?}");

    let arranger = Arranger::new(ArrangeConfig {
        wrap_activation: input.wrap,
        ..ArrangeConfig::default()
    });
    let ids: Vec<ItemId> = snapshot.items.iter().map(|item| item.id).collect();

    for op in input.ops.iter().take(64) {
        let plan = match op {
            Op::Step(forward) => arranger.move_one_step(&snapshot, direction(*forward)),
            Op::Edge(forward) => arranger.move_to_edge(&snapshot, direction(*forward)),
            Op::Extend(forward) => arranger
                .extend_toward(&snapshot, direction(*forward))
                .map(|selection| selection.to_plan(&snapshot)),
            Op::Face(forward) => arranger
                .move_face(&snapshot, direction(*forward))
                .map(|selection| selection.to_plan(&snapshot)),
            Op::Cycle(forward) => arranger
                .cycle_active(&snapshot, direction(*forward))
                .map(|selection| selection.to_plan(&snapshot)),
            Op::Related => arranger
                .select_related_by(&snapshot, RelatedBy::WeakGroup)
                .map(|selection| selection.to_plan(&snapshot)),
            Op::Reverse => arranger.reverse_selection(&snapshot),
            Op::Sort => arranger.sort_selection(&snapshot, |item| item.id),
            Op::Transfer => {
                let transfer = arranger
                    .move_to_sequence(&snapshot, &Snapshot::default())
                    .expect("valid snapshot must transfer");
                let (left, arrived) = transfer
                    .apply(&snapshot, &Snapshot::default())
                    .expect("transfer applies");
                assert!(left.structural_report().is_clean(), "{left:?}");
                assert!(arrived.invariant_report().is_clean(), "{arrived:?}");
                assert_eq!(left.len() + arrived.len(), snapshot.len());
                continue;
            }
        };
        let plan = plan.expect("valid snapshot must be accepted");
        snapshot = plan.apply(&snapshot).expect("plan applies");
        assert!(snapshot.invariant_report().is_clean(), "{snapshot:?}");
        let mut now: Vec<ItemId> = snapshot.items.iter().map(|item| item.id).collect();
        now.sort();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(now, expected, "item set changed");
    }
});
