//! Field value types shared by the binding engine, the validator, and
//! submit collaborators.
//!
//! The [`Value`] enum is the universal representation of a single field's
//! value. [`FormData`] is a record of values keyed by field name, the shape
//! handed to submit handlers and custom actions.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A record of field values keyed by field name.
pub type FormData = HashMap<String, Value>;

/// A single field value.
///
/// Values serialize to plain JSON (`null`, booleans, numbers, strings).
/// Dates serialize as `YYYY-MM-DD` strings and come back as [`Value::String`],
/// which the date rule coerces again on the next validation pass.
///
/// # Examples
///
/// ```
/// use formgen_core::value::Value;
///
/// assert_eq!(Value::from("Ada"), Value::String("Ada".to_string()));
/// assert_eq!(Value::from(true), Value::Bool(true));
/// assert_eq!(Value::Number(42.0).to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value (absent or never set).
    #[default]
    Null,
    /// A boolean, produced by checkbox fields.
    Bool(bool),
    /// A number, produced by numeric fields after coercion.
    Number(f64),
    /// A string, produced by text-like, select, and textarea fields.
    String(String),
    /// A calendar date, produced by date fields after coercion.
    Date(chrono::NaiveDate),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for [`Value::Null`] and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Interprets this value as a checkbox state.
    ///
    /// Missing and falsy values are `false`; native checkbox strings
    /// (`"on"`, `"true"`, `"1"`, `"yes"`) are `true`.
    pub fn as_checkbox(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => matches!(
                s.to_ascii_lowercase().as_str(),
                "on" | "true" | "1" | "yes"
            ),
            Self::Date(_) => true,
        }
    }

    /// Returns the string payload, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Formats a number without a trailing `.0` for integral values.
///
/// ```
/// use formgen_core::value::format_number;
///
/// assert_eq!(format_number(6.0), "6");
/// assert_eq!(format_number(2.5), "2.5");
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
