#![forbid(unsafe_code)]

//! Arrangement engines: selection ranges, directional moves, transfers and
//! per-run reorders over one [`Snapshot`].
//!
//! # Role in tabweave
//! Every entry point on [`Arranger`] validates its input snapshot, computes a
//! target arrangement on a scratch copy, re-checks it (when
//! [`ArrangeConfig::verify_plans`] is on) and returns the difference as a
//! [`Plan`](tabweave_core::Plan), [`TransferPlan`](tabweave_core::TransferPlan)
//! or [`Selection`]. Nothing is applied; the host
//! store owns the authoritative sequence.
//!
//! # Example
//!
//! ```
//! use tabweave_arrange::Arranger;
//! use tabweave_core::{Direction, Item, ItemId, Snapshot};
//!
//! let id = ItemId::new;
//! let snapshot = Snapshot::from_sequence(
//!     [Item::new(id(1)).highlighted(), Item::new(id(2)), Item::new(id(3))],
//!     [],
//!     Some(id(1)),
//! );
//! let plan = Arranger::default()
//!     .move_one_step(&snapshot, Direction::Forward)
//!     .expect("valid snapshot");
//! let after = plan.apply(&snapshot).expect("plan applies");
//! assert_eq!(after.position(id(1)), Some(1));
//! ```

pub mod config;
mod movement;
mod reorder;
mod selection;
mod transfer;
mod working;

pub use config::{ArrangeConfig, ConfigError};
pub use selection::{RelatedBy, Selection};

use tabweave_core::{ArrangeError, Snapshot};

/// Entry point for every arrangement operation.
///
/// Cheap to construct; holds only its [`ArrangeConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arranger {
    config: ArrangeConfig,
}

impl Arranger {
    /// Arranger with an explicit configuration.
    #[must_use]
    pub const fn new(config: ArrangeConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ArrangeConfig {
        &self.config
    }

    /// Size limit plus the full invariant check (I1 to I5).
    fn admit(&self, snapshot: &Snapshot) -> Result<(), ArrangeError> {
        self.check_len(snapshot.len())?;
        snapshot.validate()
    }

    fn check_len(&self, len: usize) -> Result<(), ArrangeError> {
        let limit = self.config.max_items;
        if len > limit {
            tracing::warn!(message = "snapshot.rejected", code = "too_large", len, limit);
            return Err(ArrangeError::TooLarge { len, limit });
        }
        Ok(())
    }
}
