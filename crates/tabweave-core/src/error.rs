#![forbid(unsafe_code)]

//! Error type shared by the arrangement engines.

use std::fmt;

use crate::invariant::InvariantIssue;
use crate::model::{GroupId, ItemId};

/// Why an arrangement request was refused.
///
/// Saturated moves and recency lookups of untracked ids are not errors; they
/// produce empty plans or no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrangeError {
    /// The supplied snapshot broke a structural invariant.
    InvariantViolation(InvariantIssue),
    /// No highlighted item, or the active item is missing or unhighlighted.
    EmptySelection { active: Option<ItemId> },
    /// A plan or request named an item the snapshot does not contain.
    UnknownItem { item: ItemId },
    /// A cross-sequence move would duplicate an id in the target.
    IdCollision {
        item: Option<ItemId>,
        group: Option<GroupId>,
    },
    /// A computed arrangement failed verification. Engine defect.
    PlanBrokeInvariant(InvariantIssue),
    /// The sequence holds more items than the configured limit.
    TooLarge { len: usize, limit: usize },
}

impl fmt::Display for ArrangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvariantViolation(issue) => write!(f, "snapshot invariant violated: {issue}"),
            Self::EmptySelection { active: Some(active) } => {
                write!(f, "empty selection (active {active})")
            }
            Self::EmptySelection { active: None } => write!(f, "empty selection (no active item)"),
            Self::UnknownItem { item } => write!(f, "{item} is not in the sequence"),
            Self::IdCollision { item, group } => match (item, group) {
                (Some(item), _) => write!(f, "{item} already exists in the target sequence"),
                (None, Some(group)) => {
                    write!(f, "{group} already exists in the target sequence")
                }
                (None, None) => write!(f, "id collision in the target sequence"),
            },
            Self::PlanBrokeInvariant(issue) => {
                write!(f, "computed arrangement failed verification: {issue}")
            }
            Self::TooLarge { len, limit } => {
                write!(f, "sequence of {len} items exceeds the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for ArrangeError {}
