#![forbid(unsafe_code)]

//! Selection range engine: new highlight sets and active items.
//!
//! Every operation works over visible items only and leaves highlighted
//! hidden items alone. The active item is always part of the result, so a
//! valid snapshot always yields a non-empty selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tabweave_core::{ArrangeError, Direction, Item, ItemId, Plan, Snapshot, chunk_ranges};

use crate::Arranger;

/// A highlight set plus its active item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub highlighted: BTreeSet<ItemId>,
    pub active: ItemId,
}

impl Selection {
    /// Highlight and active changes needed to turn `snapshot` into this
    /// selection.
    #[must_use]
    pub fn to_plan(&self, snapshot: &Snapshot) -> Plan {
        let mut plan = Plan::default();
        for item in &snapshot.items {
            let wanted = self.highlighted.contains(&item.id);
            if wanted != item.highlighted {
                plan.highlights.insert(item.id, wanted);
            }
        }
        if snapshot.active != Some(self.active) {
            plan.active = Some(self.active);
        }
        plan
    }

    fn of(snapshot: &Snapshot, active: ItemId) -> Self {
        Self {
            highlighted: snapshot.highlighted(),
            active,
        }
    }
}

/// Built-in keys for [`Arranger::select_related_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedBy {
    /// Pinned items together; otherwise the real group (ungrouped items
    /// together).
    WeakGroup,
    /// Real group membership only.
    Group,
}

/// Visible items plus the active item's index among them.
fn visible_with_anchor(snapshot: &Snapshot) -> Result<(Vec<&Item>, ItemId, usize), ArrangeError> {
    let active = snapshot
        .active
        .ok_or(ArrangeError::EmptySelection { active: None })?;
    let visible: Vec<&Item> = snapshot.visible_items().collect();
    let anchor = visible
        .iter()
        .position(|item| item.id == active)
        .ok_or(ArrangeError::EmptySelection {
            active: Some(active),
        })?;
    Ok((visible, active, anchor))
}

/// One visible step in `direction`, or `None` at the edge.
fn step(at: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Forward => (at + 1 < len).then_some(at + 1),
        Direction::Backward => at.checked_sub(1),
    }
}

impl Arranger {
    /// Grow or shrink the highlighted run around the active item by one
    /// visible step.
    ///
    /// The run's focus is the edge away from the active item (the edge in
    /// `direction` when the active item sits inside the run); it steps in
    /// `direction` while the opposite edge stays fixed. A focus at the first
    /// or last visible position is saturated and nothing changes.
    pub fn extend_toward(
        &self,
        snapshot: &Snapshot,
        direction: Direction,
    ) -> Result<Selection, ArrangeError> {
        self.admit(snapshot)?;
        let (visible, active, anchor) = visible_with_anchor(snapshot)?;

        let mut lo = anchor;
        while lo > 0 && visible[lo - 1].highlighted {
            lo -= 1;
        }
        let mut hi = anchor;
        while hi + 1 < visible.len() && visible[hi + 1].highlighted {
            hi += 1;
        }

        let (focus, fixed) = if lo == hi {
            (anchor, anchor)
        } else if anchor == lo {
            (hi, lo)
        } else if anchor == hi {
            (lo, hi)
        } else {
            match direction {
                Direction::Forward => (hi, lo),
                Direction::Backward => (lo, hi),
            }
        };

        let mut selection = Selection::of(snapshot, active);
        let Some(stepped) = step(focus, visible.len(), direction) else {
            tracing::debug!(
                message = "arrange.extend_toward",
                direction = direction.as_str(),
                saturated = true
            );
            return Ok(selection);
        };

        for item in &visible[lo..=hi] {
            selection.highlighted.remove(&item.id);
        }
        for item in &visible[fixed.min(stepped)..=fixed.max(stepped)] {
            selection.highlighted.insert(item.id);
        }
        tracing::debug!(
            message = "arrange.extend_toward",
            direction = direction.as_str(),
            saturated = false,
            highlighted = selection.highlighted.len()
        );
        Ok(selection)
    }

    /// Highlight every visible item whose key matches the key of some
    /// highlighted visible item.
    pub fn select_related<K, F>(&self, snapshot: &Snapshot, key: F) -> Result<Selection, ArrangeError>
    where
        K: Ord,
        F: Fn(&Item) -> K,
    {
        self.admit(snapshot)?;
        let (visible, active, _) = visible_with_anchor(snapshot)?;

        let mut keys = BTreeSet::new();
        for (highlighted, range) in chunk_ranges(&visible, |item| item.highlighted) {
            if highlighted {
                keys.extend(visible[range].iter().map(|item| key(*item)));
            }
        }

        let mut selection = Selection::of(snapshot, active);
        for item in &visible {
            if keys.contains(&key(*item)) {
                selection.highlighted.insert(item.id);
            }
        }
        tracing::debug!(
            message = "arrange.select_related",
            keys = keys.len(),
            highlighted = selection.highlighted.len()
        );
        Ok(selection)
    }

    /// [`select_related`](Self::select_related) with a built-in key.
    pub fn select_related_by(
        &self,
        snapshot: &Snapshot,
        related: RelatedBy,
    ) -> Result<Selection, ArrangeError> {
        match related {
            RelatedBy::WeakGroup => self.select_related(snapshot, Item::weak_group),
            RelatedBy::Group => self.select_related(snapshot, |item| item.group),
        }
    }

    /// Walk the active designation in `direction` across adjacent highlighted
    /// visible items, stopping on the last one. The highlight set is
    /// unchanged.
    pub fn move_face(
        &self,
        snapshot: &Snapshot,
        direction: Direction,
    ) -> Result<Selection, ArrangeError> {
        self.admit(snapshot)?;
        let (visible, _, anchor) = visible_with_anchor(snapshot)?;
        let mut face = anchor;
        while let Some(next) = step(face, visible.len(), direction) {
            if !visible[next].highlighted {
                break;
            }
            face = next;
        }
        tracing::debug!(
            message = "arrange.move_face",
            direction = direction.as_str(),
            moved = face.abs_diff(anchor)
        );
        Ok(Selection::of(snapshot, visible[face].id))
    }

    /// Activate the next visible item in `direction`; it becomes the only
    /// highlighted item.
    ///
    /// Wraps around the ends when [`wrap_activation`](crate::ArrangeConfig::wrap_activation)
    /// is on; otherwise the edge is saturated and the selection is returned
    /// unchanged.
    pub fn cycle_active(
        &self,
        snapshot: &Snapshot,
        direction: Direction,
    ) -> Result<Selection, ArrangeError> {
        self.admit(snapshot)?;
        let (visible, active, anchor) = visible_with_anchor(snapshot)?;
        let (next, wrapped) = match step(anchor, visible.len(), direction) {
            Some(next) => (next, false),
            None if self.config.wrap_activation => match direction {
                Direction::Forward => (0, true),
                Direction::Backward => (visible.len() - 1, true),
            },
            None => {
                tracing::debug!(
                    message = "arrange.cycle_active",
                    direction = direction.as_str(),
                    saturated = true
                );
                return Ok(Selection::of(snapshot, active));
            }
        };
        let id = visible[next].id;
        tracing::debug!(
            message = "arrange.cycle_active",
            direction = direction.as_str(),
            saturated = false,
            wrapped
        );
        Ok(Selection {
            highlighted: BTreeSet::from([id]),
            active: id,
        })
    }
}
