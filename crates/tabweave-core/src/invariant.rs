#![forbid(unsafe_code)]

//! Structural invariant checks over a [`Snapshot`].
//!
//! The checks never repair anything. A snapshot that fails them is a caller
//! contract violation and engines refuse to operate on it.
//!
//! Checked rules:
//!
//! - item ids are unique;
//! - `order` values are exactly `0..N` and `items` is listed by order;
//! - every pinned item precedes every unpinned item;
//! - every group referenced by an item is registered, and pinned items are
//!   ungrouped;
//! - members of one group occupy a contiguous order range;
//! - (selection) at least one item is highlighted and the active item is
//!   present, highlighted and visible.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::chunk_ranges;
use crate::error::ArrangeError;
use crate::model::{GroupId, ItemId, Snapshot};

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantCode {
    DuplicateItem,
    OrderNotDense,
    PinnedAfterUnpinned,
    UnknownGroup,
    PinnedInGroup,
    GroupNotContiguous,
    NoHighlight,
    MissingActive,
    ActiveNotHighlighted,
    ActiveHidden,
}

impl InvariantCode {
    /// Findings about the highlight set rather than the arrangement.
    #[must_use]
    pub const fn is_selection(self) -> bool {
        matches!(
            self,
            Self::NoHighlight | Self::MissingActive | Self::ActiveNotHighlighted
        )
    }

    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateItem => "duplicate_item",
            Self::OrderNotDense => "order_not_dense",
            Self::PinnedAfterUnpinned => "pinned_after_unpinned",
            Self::UnknownGroup => "unknown_group",
            Self::PinnedInGroup => "pinned_in_group",
            Self::GroupNotContiguous => "group_not_contiguous",
            Self::NoHighlight => "no_highlight",
            Self::MissingActive => "missing_active",
            Self::ActiveNotHighlighted => "active_not_highlighted",
            Self::ActiveHidden => "active_hidden",
        }
    }
}

impl fmt::Display for InvariantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantIssue {
    pub code: InvariantCode,
    pub item: Option<ItemId>,
    pub group: Option<GroupId>,
    pub message: String,
}

impl fmt::Display for InvariantIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// All findings over one snapshot, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvariantReport {
    pub issues: Vec<InvariantIssue>,
}

impl InvariantReport {
    /// True when no finding was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when a finding with `code` exists.
    #[must_use]
    pub fn has(&self, code: InvariantCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    fn push(
        &mut self,
        code: InvariantCode,
        item: Option<ItemId>,
        group: Option<GroupId>,
        message: String,
    ) {
        self.issues.push(InvariantIssue {
            code,
            item,
            group,
            message,
        });
    }
}

impl Snapshot {
    /// Check density, pin precedence, group registry and contiguity.
    #[must_use]
    pub fn structural_report(&self) -> InvariantReport {
        let mut report = InvariantReport::default();

        let mut seen = BTreeSet::new();
        for item in &self.items {
            if !seen.insert(item.id) {
                report.push(
                    InvariantCode::DuplicateItem,
                    Some(item.id),
                    None,
                    format!("{} appears more than once", item.id),
                );
            }
        }

        for (position, item) in self.items.iter().enumerate() {
            if item.order != position {
                report.push(
                    InvariantCode::OrderNotDense,
                    Some(item.id),
                    None,
                    format!(
                        "{} has order {} at position {} (orders must be exactly 0..{})",
                        item.id,
                        item.order,
                        position,
                        self.items.len()
                    ),
                );
            }
        }

        if let Some(first_unpinned) = self.items.iter().find(|item| !item.pinned) {
            for item in &self.items {
                if item.pinned && item.order > first_unpinned.order {
                    report.push(
                        InvariantCode::PinnedAfterUnpinned,
                        Some(item.id),
                        None,
                        format!(
                            "pinned {} follows unpinned {}",
                            item.id, first_unpinned.id
                        ),
                    );
                }
            }
        }

        for item in &self.items {
            let Some(group) = item.group else {
                continue;
            };
            if !self.groups.contains_key(&group) {
                report.push(
                    InvariantCode::UnknownGroup,
                    Some(item.id),
                    Some(group),
                    format!("{} references unregistered {group}", item.id),
                );
            }
            if item.pinned {
                report.push(
                    InvariantCode::PinnedInGroup,
                    Some(item.id),
                    Some(group),
                    format!("pinned {} is a member of {group}", item.id),
                );
            }
        }

        let mut closed = BTreeSet::new();
        for (group, range) in chunk_ranges(&self.items, |item| item.group) {
            let Some(group) = group else {
                continue;
            };
            if !closed.insert(group) {
                let item = self.items[range.start].id;
                report.push(
                    InvariantCode::GroupNotContiguous,
                    Some(item),
                    Some(group),
                    format!("{group} resumes at {item} after other items"),
                );
            }
        }

        report
    }

    /// Structural checks plus the highlight/active rules.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let mut report = self.structural_report();

        if !self.items.iter().any(|item| item.highlighted) {
            report.push(
                InvariantCode::NoHighlight,
                None,
                None,
                "no item is highlighted".to_owned(),
            );
        }

        match self.active {
            None => report.push(
                InvariantCode::MissingActive,
                None,
                None,
                "no active item designated".to_owned(),
            ),
            Some(active) => match self.item(active) {
                None => report.push(
                    InvariantCode::MissingActive,
                    Some(active),
                    None,
                    format!("active {active} is not in the sequence"),
                ),
                Some(item) => {
                    if !item.highlighted {
                        report.push(
                            InvariantCode::ActiveNotHighlighted,
                            Some(active),
                            None,
                            format!("active {active} is not highlighted"),
                        );
                    }
                    if self.is_hidden(item) {
                        report.push(
                            InvariantCode::ActiveHidden,
                            Some(active),
                            item.group,
                            format!("active {active} sits in a collapsed group"),
                        );
                    }
                }
            },
        }

        report
    }

    /// Fail with the first structural finding, if any.
    pub fn validate_structure(&self) -> Result<(), ArrangeError> {
        match self.structural_report().issues.into_iter().next() {
            None => Ok(()),
            Some(issue) => {
                tracing::warn!(
                    message = "snapshot.rejected",
                    code = issue.code.as_str(),
                    detail = %issue.message
                );
                Err(ArrangeError::InvariantViolation(issue))
            }
        }
    }

    /// Fail with the first finding, structural ones first.
    ///
    /// Highlight-set findings surface as [`ArrangeError::EmptySelection`].
    pub fn validate(&self) -> Result<(), ArrangeError> {
        let report = self.invariant_report();
        let Some(issue) = report
            .issues
            .iter()
            .find(|issue| !issue.code.is_selection())
            .or_else(|| report.issues.first())
            .cloned()
        else {
            return Ok(());
        };
        tracing::warn!(
            message = "snapshot.rejected",
            code = issue.code.as_str(),
            detail = %issue.message
        );
        if issue.code.is_selection() {
            return Err(ArrangeError::EmptySelection {
                active: self.active,
            });
        }
        Err(ArrangeError::InvariantViolation(issue))
    }
}
