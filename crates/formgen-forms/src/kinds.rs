//! The closed set of field kinds and the table that maps each kind to its
//! validation base rule and its rendered control.
//!
//! [`FieldKind::base_rule`] is consulted by the schema synthesizer and
//! [`FieldKind::control`] by the field renderer. Adding a kind means adding a
//! variant and one arm to each of those two functions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of a form field, named after the native input type it renders.
///
/// Strings that are not part of the closed set are preserved in
/// [`FieldKind::Other`]; they render as a plain input of that type and are
/// validated as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// `<input type="text">`.
    #[default]
    Text,
    /// `<input type="email">`.
    Email,
    /// `<input type="password">`.
    Password,
    /// `<input type="number">`.
    Number,
    /// `<input type="tel">`.
    Tel,
    /// `<input type="url">`.
    Url,
    /// `<input type="search">`.
    Search,
    /// `<input type="date">`.
    Date,
    /// `<input type="datetime-local">`.
    DateTimeLocal,
    /// `<input type="time">`.
    Time,
    /// `<input type="month">`.
    Month,
    /// `<input type="week">`.
    Week,
    /// `<input type="color">`.
    Color,
    /// `<input type="range">`.
    Range,
    /// `<input type="file">`.
    File,
    /// `<input type="hidden">`.
    Hidden,
    /// `<input type="checkbox">`.
    Checkbox,
    /// A group of `<input type="radio">` elements.
    Radio,
    /// `<select>`.
    Select,
    /// `<textarea>`.
    Textarea,
    /// Any other native input type.
    Other(String),
}

/// The validation rule a kind starts from before bounds, pattern, and
/// required rules are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRule {
    /// Boolean rule; no further constraint processing.
    Boolean,
    /// Numeric rule with a coercion check.
    Numeric,
    /// Date rule with a coercion check.
    Date,
    /// String rule pre-seeded with the email format check.
    Email,
    /// Plain string rule.
    Text,
}

/// The concrete control a kind renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Boolean toggle with a label to its right.
    Checkbox,
    /// Enumerated choice with a placeholder option.
    Select,
    /// Multi-line text.
    Textarea,
    /// One radio input per option.
    Radio,
    /// Single-line native input.
    Input,
}

impl FieldKind {
    /// Returns the validation base rule for this kind.
    pub const fn base_rule(&self) -> BaseRule {
        match self {
            Self::Checkbox => BaseRule::Boolean,
            Self::Number | Self::Range => BaseRule::Numeric,
            Self::Date => BaseRule::Date,
            Self::Email => BaseRule::Email,
            Self::Text
            | Self::Password
            | Self::Tel
            | Self::Url
            | Self::Search
            | Self::DateTimeLocal
            | Self::Time
            | Self::Month
            | Self::Week
            | Self::Color
            | Self::File
            | Self::Hidden
            | Self::Radio
            | Self::Select
            | Self::Textarea
            | Self::Other(_) => BaseRule::Text,
        }
    }

    /// Returns the control this kind renders as.
    pub const fn control(&self) -> ControlKind {
        match self {
            Self::Checkbox => ControlKind::Checkbox,
            Self::Select => ControlKind::Select,
            Self::Textarea => ControlKind::Textarea,
            Self::Radio => ControlKind::Radio,
            Self::Text
            | Self::Email
            | Self::Password
            | Self::Number
            | Self::Tel
            | Self::Url
            | Self::Search
            | Self::Date
            | Self::DateTimeLocal
            | Self::Time
            | Self::Month
            | Self::Week
            | Self::Color
            | Self::Range
            | Self::File
            | Self::Hidden
            | Self::Other(_) => ControlKind::Input,
        }
    }

    /// Returns the native type name (the HTML `type` attribute).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Search => "search",
            Self::Date => "date",
            Self::DateTimeLocal => "datetime-local",
            Self::Time => "time",
            Self::Month => "month",
            Self::Week => "week",
            Self::Color => "color",
            Self::Range => "range",
            Self::File => "file",
            Self::Hidden => "hidden",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` if `options` are meaningful for this kind.
    pub const fn takes_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FieldKind {
    fn from(s: &str) -> Self {
        match s {
            "text" => Self::Text,
            "email" => Self::Email,
            "password" => Self::Password,
            "number" => Self::Number,
            "tel" => Self::Tel,
            "url" => Self::Url,
            "search" => Self::Search,
            "date" => Self::Date,
            "datetime-local" => Self::DateTimeLocal,
            "time" => Self::Time,
            "month" => Self::Month,
            "week" => Self::Week,
            "color" => Self::Color,
            "range" => Self::Range,
            "file" => Self::File,
            "hidden" => Self::Hidden,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "select" => Self::Select,
            "textarea" => Self::Textarea,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
