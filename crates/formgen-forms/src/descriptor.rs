//! Field descriptors: the declarative vocabulary a form is built from.
//!
//! Each [`FieldDescriptor`] describes one field's kind, label, constraints,
//! options, and icon affordance. Descriptors are plain data and deserialize
//! from TOML or JSON form definitions; the icon click callback is the only
//! part that must be attached in code.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use formgen_core::value::format_number;

use crate::kinds::FieldKind;

/// One `(value, label)` pair of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// The submitted value.
    pub value: String,
    /// The displayed label.
    pub label: String,
}

impl SelectOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A `min` or `max` bound.
///
/// Numeric kinds compare numbers, string kinds compare lengths, and the date
/// kind parses the bound as a `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// A numeric bound.
    Number(f64),
    /// A textual bound, usually a date.
    Text(String),
}

impl Bound {
    /// Returns this bound as a number, parsing textual bounds.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Returns this bound as a string length, if it is a non-negative integer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_length(&self) -> Option<usize> {
        self.as_number()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as usize)
    }

    /// Returns this bound as a calendar date.
    pub fn as_date(&self) -> Option<chrono::NaiveDate> {
        match self {
            Self::Text(s) => crate::schema::parse_date(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Optional constraints attached to a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    /// A regular expression the value must match.
    #[serde(with = "pattern_serde", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Regex>,
    /// Message reported when the pattern does not match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Lower bound (value, length, or date depending on kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    /// Upper bound (value, length, or date depending on kind).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
}

impl Constraint {
    /// Returns `true` if no constraint is set.
    pub const fn is_empty(&self) -> bool {
        self.pattern.is_none() && self.message.is_none() && self.min.is_none() && self.max.is_none()
    }
}

mod pattern_serde {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(pattern: &Option<Regex>, s: S) -> Result<S::Ok, S::Error> {
        match pattern {
            Some(re) => s.serialize_str(re.as_str()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Regex>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|source| Regex::new(&source).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Which side of a control its icon sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPosition {
    /// Before the control.
    Left,
    /// After the control.
    #[default]
    Right,
}

/// A zero-argument callback invoked when a field's icon is clicked.
#[derive(Clone)]
pub struct IconAction(Arc<dyn Fn() + Send + Sync>);

impl IconAction {
    /// Wraps a closure.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the callback.
    pub fn call(&self) {
        (self.0)();
    }
}

impl fmt::Debug for IconAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IconAction(..)")
    }
}

/// Complete description of a single form field.
///
/// # Examples
///
/// ```
/// use formgen_forms::descriptor::{Bound, FieldDescriptor};
/// use formgen_forms::kinds::FieldKind;
///
/// let field = FieldDescriptor::new("fullname", FieldKind::Text)
///     .label("Full Name")
///     .placeholder("Enter your full name")
///     .required(true)
///     .min(2)
///     .max(50);
/// assert_eq!(field.constraint.min, Some(Bound::Number(2.0)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique key within the form; also the key in submitted data and errors.
    pub name: String,
    /// The field kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Human-readable label, also used in error messages.
    pub label: String,
    /// Placeholder text for text-like controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Whether a value must be present.
    #[serde(default)]
    pub required: bool,
    /// Native autocomplete hint, passed through to the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    /// Options for select and radio fields, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Pattern, bounds, and pattern message.
    #[serde(default, alias = "validation")]
    pub constraint: Constraint,
    /// Icon markup shown inside a text-like control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Side of the control the icon sits on.
    #[serde(default)]
    pub icon_position: IconPosition,
    /// Callback invoked when the icon is clicked.
    #[serde(skip)]
    pub on_icon_click: Option<IconAction>,
    /// Row count override for textarea fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// Step attribute for number and range fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    /// Accepted file types for file fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    /// Whether file and select fields accept several values.
    #[serde(default)]
    pub multiple: bool,
}

impl FieldDescriptor {
    /// Creates an optional field whose label is derived from its name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let label = name.replace('_', " ");
        Self {
            name,
            kind,
            label,
            placeholder: None,
            required: false,
            autocomplete: None,
            options: Vec::new(),
            constraint: Constraint::default(),
            icon: None,
            icon_position: IconPosition::default(),
            on_icon_click: None,
            rows: None,
            step: None,
            accept: None,
            multiple: false,
        }
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the placeholder.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets whether this field is required.
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the native autocomplete hint.
    pub fn autocomplete(mut self, hint: impl Into<String>) -> Self {
        self.autocomplete = Some(hint.into());
        self
    }

    /// Appends an option.
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    /// Sets the pattern the value must match.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.constraint.pattern = Some(pattern);
        self
    }

    /// Sets the message reported when the pattern does not match.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.constraint.message = Some(message.into());
        self
    }

    /// Sets the lower bound.
    pub fn min(mut self, bound: impl Into<Bound>) -> Self {
        self.constraint.min = Some(bound.into());
        self
    }

    /// Sets the upper bound.
    pub fn max(mut self, bound: impl Into<Bound>) -> Self {
        self.constraint.max = Some(bound.into());
        self
    }

    /// Attaches an icon at the given position.
    pub fn icon(mut self, markup: impl Into<String>, position: IconPosition) -> Self {
        self.icon = Some(markup.into());
        self.icon_position = position;
        self
    }

    /// Sets the icon click callback.
    pub fn on_icon_click(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_icon_click = Some(IconAction::new(f));
        self
    }

    /// Overrides the textarea row count.
    pub const fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Sets the step attribute.
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Sets the accepted file types.
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Sets whether several values are accepted.
    pub const fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }
}
