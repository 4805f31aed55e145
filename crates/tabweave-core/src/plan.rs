#![forbid(unsafe_code)]

//! Plans: the diff an engine hands back for the host store to apply.
//!
//! A [`Plan`] lists only values that change. [`Plan::apply`] is the reference
//! store semantics, so embedders without their own store (and the test
//! suites) can materialize the resulting snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ArrangeError;
use crate::model::{Group, GroupId, Item, ItemId, Snapshot};

/// Changed fields per item, plus an optional new active item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub orders: BTreeMap<ItemId, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<ItemId, Option<GroupId>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pins: BTreeMap<ItemId, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub highlights: BTreeMap<ItemId, bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<ItemId>,
}

impl Plan {
    /// True when applying the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
            && self.groups.is_empty()
            && self.pins.is_empty()
            && self.highlights.is_empty()
            && self.active.is_none()
    }

    /// Number of individual field assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
            + self.groups.len()
            + self.pins.len()
            + self.highlights.len()
            + usize::from(self.active.is_some())
    }

    /// Diff two arrangements of (mostly) the same items.
    ///
    /// Items only present in `after` get every field recorded. Items only
    /// present in `before` are ignored; a cross-sequence move reports them
    /// separately.
    #[must_use]
    pub fn diff(before: &Snapshot, after: &Snapshot) -> Self {
        let previous: BTreeMap<ItemId, &Item> =
            before.items.iter().map(|item| (item.id, item)).collect();
        let mut plan = Self::default();
        for item in &after.items {
            match previous.get(&item.id) {
                Some(old) => {
                    if old.order != item.order {
                        plan.orders.insert(item.id, item.order);
                    }
                    if old.group != item.group {
                        plan.groups.insert(item.id, item.group);
                    }
                    if old.pinned != item.pinned {
                        plan.pins.insert(item.id, item.pinned);
                    }
                    if old.highlighted != item.highlighted {
                        plan.highlights.insert(item.id, item.highlighted);
                    }
                }
                None => {
                    plan.orders.insert(item.id, item.order);
                    plan.groups.insert(item.id, item.group);
                    plan.pins.insert(item.id, item.pinned);
                    plan.highlights.insert(item.id, item.highlighted);
                }
            }
        }
        if after.active.is_some() && after.active != before.active {
            plan.active = after.active;
        }
        plan
    }

    /// Apply to a snapshot the way a store would; the result is re-sorted by
    /// order. Invariants of the result are not checked here.
    pub fn apply(&self, snapshot: &Snapshot) -> Result<Snapshot, ArrangeError> {
        let mut next = snapshot.clone();
        let mut index: BTreeMap<ItemId, usize> = BTreeMap::new();
        for (position, item) in next.items.iter().enumerate() {
            index.insert(item.id, position);
        }
        let slot = |item: &ItemId| {
            index
                .get(item)
                .copied()
                .ok_or(ArrangeError::UnknownItem { item: *item })
        };

        for (item, order) in &self.orders {
            let at = slot(item)?;
            next.items[at].order = *order;
        }
        for (item, group) in &self.groups {
            let at = slot(item)?;
            next.items[at].group = *group;
        }
        for (item, pinned) in &self.pins {
            let at = slot(item)?;
            next.items[at].pinned = *pinned;
        }
        for (item, highlighted) in &self.highlights {
            let at = slot(item)?;
            next.items[at].highlighted = *highlighted;
        }
        if let Some(active) = self.active {
            slot(&active)?;
            next.active = Some(active);
        }
        next.items.sort_by_key(|item| item.order);
        Ok(next)
    }
}

/// Result of moving items from one sequence into another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferPlan {
    /// Changes to the items that stay in the source.
    pub source: Plan,
    /// Changes to the target, with every field recorded for arrivals.
    pub target: Plan,
    /// Items leaving the source, in arrival order.
    pub moved_items: Vec<ItemId>,
    /// Groups travelling whole; they leave the source registry.
    pub moved_groups: Vec<Group>,
}

impl TransferPlan {
    /// True when nothing moves and nothing changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved_items.is_empty() && self.source.is_empty() && self.target.is_empty()
    }

    /// Reference application over both sequences.
    pub fn apply(
        &self,
        source: &Snapshot,
        target: &Snapshot,
    ) -> Result<(Snapshot, Snapshot), ArrangeError> {
        let moving: BTreeSet<ItemId> = self.moved_items.iter().copied().collect();
        let present: BTreeSet<ItemId> = source.items.iter().map(|item| item.id).collect();
        if let Some(item) = moving.iter().find(|item| !present.contains(item)) {
            return Err(ArrangeError::UnknownItem { item: *item });
        }

        let mut remaining = source.clone();
        remaining.items.retain(|item| !moving.contains(&item.id));
        for group in &self.moved_groups {
            remaining.groups.remove(&group.id);
        }
        if remaining
            .active
            .is_some_and(|active| moving.contains(&active))
        {
            remaining.active = None;
        }
        let remaining = self.source.apply(&remaining)?;

        let mut arrived = target.clone();
        arrived
            .items
            .extend(self.moved_items.iter().map(|id| Item::new(*id)));
        for group in &self.moved_groups {
            arrived.groups.insert(group.id, *group);
        }
        let arrived = self.target.apply(&arrived)?;

        Ok((remaining, arrived))
    }
}
