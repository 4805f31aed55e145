#![forbid(unsafe_code)]

//! Item, group and snapshot model.
//!
//! A [`Snapshot`] is an immutable view of one collection (one window): its
//! items ordered by `order`, the registry of groups those items belong to, and
//! the designated active item. Engines read snapshots and produce plans; they
//! never mutate a snapshot in place.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque item identifier assigned by the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw host identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Opaque group identifier assigned by the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u64);

impl GroupId {
    /// Wrap a raw host identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Direction of a move or selection step along the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward order 0.
    Backward,
    /// Toward order N-1.
    Forward,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Backward => Self::Forward,
            Self::Forward => Self::Backward,
        }
    }

    /// Stable lowercase name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
        }
    }
}

/// One entry of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Dense position, `0..N`.
    pub order: usize,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub group: Option<GroupId>,
}

impl Item {
    /// Unpinned, unhighlighted, ungrouped item at order 0.
    #[must_use]
    pub const fn new(id: ItemId) -> Self {
        Self {
            id,
            order: 0,
            pinned: false,
            highlighted: false,
            group: None,
        }
    }

    /// Set the order.
    #[must_use]
    pub const fn at(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Mark pinned.
    #[must_use]
    pub const fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Mark highlighted.
    #[must_use]
    pub const fn highlighted(mut self) -> Self {
        self.highlighted = true;
        self
    }

    /// Place in a group.
    #[must_use]
    pub const fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Derived weak-group key: pinned items share one pseudo-group, other
    /// items are keyed by their real group.
    #[must_use]
    pub const fn weak_group(&self) -> WeakGroup {
        if self.pinned {
            return WeakGroup::Pinned;
        }
        match self.group {
            Some(group) => WeakGroup::Group(group),
            None => WeakGroup::Ungrouped,
        }
    }
}

/// Weak-group key combining pinned state and real group membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakGroup {
    Pinned,
    Group(GroupId),
    Ungrouped,
}

/// A registered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub collapsed: bool,
}

impl Group {
    /// Expanded group.
    #[must_use]
    pub const fn new(id: GroupId) -> Self {
        Self {
            id,
            collapsed: false,
        }
    }

    /// Collapsed group; its members are hidden.
    #[must_use]
    pub const fn collapsed(id: GroupId) -> Self {
        Self {
            id,
            collapsed: true,
        }
    }
}

/// Immutable view of one sequence plus its group registry.
///
/// `items` is kept sorted by `order`. Use [`Snapshot::new`] or
/// [`Snapshot::from_sequence`] to build one; both establish that ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<Item>,
    #[serde(default)]
    pub groups: BTreeMap<GroupId, Group>,
    /// The operation reference point. Must be highlighted and visible.
    #[serde(default)]
    pub active: Option<ItemId>,
}

impl Snapshot {
    /// Build from items carrying their own `order`; items are sorted by it.
    #[must_use]
    pub fn new(
        items: impl IntoIterator<Item = Item>,
        groups: impl IntoIterator<Item = Group>,
        active: Option<ItemId>,
    ) -> Self {
        let mut items: Vec<Item> = items.into_iter().collect();
        items.sort_by_key(|item| item.order);
        Self {
            items,
            groups: groups.into_iter().map(|group| (group.id, group)).collect(),
            active,
        }
    }

    /// Build from items listed in sequence order; `order` is overwritten with
    /// the list position.
    #[must_use]
    pub fn from_sequence(
        items: impl IntoIterator<Item = Item>,
        groups: impl IntoIterator<Item = Group>,
        active: Option<ItemId>,
    ) -> Self {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(order, item)| item.at(order));
        Self::new(items, groups, active)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the sequence has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Position of an item in `items`.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Look up a group by id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// The active item, if set and present.
    #[must_use]
    pub fn active_item(&self) -> Option<&Item> {
        self.active.and_then(|id| self.item(id))
    }

    /// An item is hidden iff its group is collapsed.
    #[must_use]
    pub fn is_hidden(&self, item: &Item) -> bool {
        item.group
            .and_then(|group| self.groups.get(&group))
            .is_some_and(|group| group.collapsed)
    }

    /// Items not hidden by a collapsed group, in order.
    pub fn visible_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| !self.is_hidden(item))
    }

    /// Number of pinned items (they occupy orders `0..pinned_count`).
    #[must_use]
    pub fn pinned_count(&self) -> usize {
        self.items.iter().filter(|item| item.pinned).count()
    }

    /// Ids of all highlighted items.
    #[must_use]
    pub fn highlighted(&self) -> BTreeSet<ItemId> {
        self.items
            .iter()
            .filter(|item| item.highlighted)
            .map(|item| item.id)
            .collect()
    }

    /// Members of a group, in order.
    #[must_use]
    pub fn group_members(&self, group: GroupId) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.group == Some(group))
            .map(|item| item.id)
            .collect()
    }
}
