#![forbid(unsafe_code)]

//! tabweave public facade crate.
//!
//! Re-exports the model, the arrangement engines and the recency tracker,
//! and offers a prelude plus one error type spanning all of them.
//!
//! ```
//! use tabweave::prelude::*;
//!
//! let id = ItemId::new;
//! let snapshot = Snapshot::from_sequence(
//!     [Item::new(id(1)), Item::new(id(2)).highlighted()],
//!     [],
//!     Some(id(2)),
//! );
//! let plan = Arranger::default().move_to_edge(&snapshot, Direction::Backward)?;
//! let after = plan.apply(&snapshot)?;
//! assert_eq!(after.position(id(2)), Some(0));
//!
//! let mut recent = RecencyTracker::new();
//! recent.touch(id(1));
//! recent.touch(id(2));
//! assert_eq!(recent.nth(1), Some(&id(1)));
//! # Ok::<(), tabweave::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tabweave_core::{
    ArrangeError, Direction, Group, GroupId, InvariantCode, InvariantIssue, InvariantReport, Item,
    ItemId, Plan, Run, Snapshot, TransferPlan, WeakGroup, chunk, chunk_ranges,
};

// --- Engine re-exports -----------------------------------------------------

pub use tabweave_arrange::{ArrangeConfig, Arranger, ConfigError, RelatedBy, Selection};
pub use tabweave_recency::{RecencySnapshot, RecencyTracker};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tabweave hosts.
#[derive(Debug)]
pub enum Error {
    /// An arrangement request was refused.
    Arrange(ArrangeError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrange(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Arrange(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ArrangeError> for Error {
    fn from(err: ArrangeError) -> Self {
        Self::Arrange(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for tabweave APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load an [`ArrangeConfig`] from a `.json` file, or TOML for any other
/// extension.
#[cfg(feature = "config-file")]
pub fn load_config(path: impl AsRef<std::path::Path>) -> Result<ArrangeConfig> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        ArrangeConfig::from_json_file(path)?
    } else {
        ArrangeConfig::from_toml_file(path)?
    };
    Ok(config)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ArrangeConfig, Arranger, Direction, Error, Group, GroupId, Item, ItemId, Plan,
        RecencyTracker, RelatedBy, Result, Selection, Snapshot, TransferPlan,
    };

    pub use crate::{arrange, core, recency};
}

pub use tabweave_arrange as arrange;
pub use tabweave_core as core;
pub use tabweave_recency as recency;
