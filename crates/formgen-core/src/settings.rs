//! Settings for the formgen engine and its demo tooling.
//!
//! [`Settings`] holds logging configuration, the default binding mode for new
//! forms, rendering defaults, and the location of the record store used by
//! the create-user flow. Every field has a default, so partial TOML or JSON
//! files load cleanly through [`settings_loader`](crate::settings_loader).

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a form's controls own their values.
///
/// In [`BindingMode::Controlled`] mode every change is written back to the
/// form's canonical state and triggers a re-render. In
/// [`BindingMode::Uncontrolled`] mode values live in a registry of native
/// inputs and are read only on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// Values are read from and written to canonical state on every change.
    Controlled,
    /// Values live in the native registration store.
    #[default]
    Uncontrolled,
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controlled => write!(f, "controlled"),
            Self::Uncontrolled => write!(f, "uncontrolled"),
        }
    }
}

impl FromStr for BindingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "controlled" => Ok(Self::Controlled),
            "uncontrolled" => Ok(Self::Uncontrolled),
            other => Err(format!("unknown binding mode '{other}'")),
        }
    }
}

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use formgen_core::settings::{BindingMode, Settings};
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.default_mode, BindingMode::Uncontrolled);
/// assert_eq!(settings.textarea_rows, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "formgen_forms=debug").
    pub log_level: String,

    // ── Forms ────────────────────────────────────────────────────────

    /// Binding mode used when a caller does not pick one.
    pub default_mode: BindingMode,
    /// Row count for textarea controls that do not override it.
    pub textarea_rows: u32,

    // ── Persistence ──────────────────────────────────────────────────

    /// Path of the JSON file backing the record store.
    pub store_path: PathBuf,
    /// Key under which the submitted record is stored.
    pub record_key: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            default_mode: BindingMode::Uncontrolled,
            textarea_rows: 4,
            store_path: PathBuf::from("formgen-store.json"),
            record_key: "userData".to_string(),
            extra: HashMap::new(),
        }
    }
}
