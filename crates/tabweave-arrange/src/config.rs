#![forbid(unsafe_code)]

//! Engine configuration as data.
//!
//! [`ArrangeConfig`] can be built in code or loaded from TOML or JSON when the
//! `config-file` feature is enabled (default).
//!
//! ```toml
//! # tabweave.toml
//! verify_plans = true
//! wrap_activation = false
//! conserve_pins = true
//! highlight_arrivals = true
//! max_items = 4096
//! ```
//!
//! ```rust,ignore
//! let config = ArrangeConfig::from_toml_file("tabweave.toml")?;
//! let arranger = Arranger::new(config);
//! ```
//!
//! Fields missing from a file keep their defaults.

#[cfg(feature = "config-file")]
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default upper bound on sequence length.
pub const DEFAULT_MAX_ITEMS: usize = 65_536;

/// Tunables for [`Arranger`](crate::Arranger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeConfig {
    /// Re-check density, pin precedence and group contiguity on every
    /// computed arrangement; a failure surfaces as
    /// `ArrangeError::PlanBrokeInvariant` instead of a corrupt plan.
    pub verify_plans: bool,

    /// `cycle_active` wraps from the last visible item to the first (and
    /// back). Moves never wrap.
    pub wrap_activation: bool,

    /// Cross-sequence arrivals keep their pinned flag. When off, every
    /// arrival lands unpinned at the end of the target.
    pub conserve_pins: bool,

    /// After a cross-sequence move the arrivals become the target's
    /// highlight set, and the first arrival its active item.
    pub highlight_arrivals: bool,

    /// Snapshots longer than this are refused.
    pub max_items: usize,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            verify_plans: true,
            wrap_activation: true,
            conserve_pins: true,
            highlight_arrivals: true,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl ArrangeConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_items == 0 {
            errors.push("max_items must be > 0".to_owned());
        }
        errors
    }

    #[cfg(feature = "config-file")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading an [`ArrangeConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
