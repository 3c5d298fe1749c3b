//! Core error types for the formgen engine.
//!
//! [`ValidationError`] describes rule failures produced while validating a
//! submitted record. [`FormError`] is the engine-wide error enum used at the
//! API boundary: configuration problems, unknown fields or actions, and
//! failures reported by submit collaborators.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// A simple error carries a single message and a short code naming the rule
/// that failed. A compound error carries per-field error lists, in the order
/// the rules were attached to each field.
///
/// # Examples
///
/// ```
/// use formgen_core::error::ValidationError;
///
/// let err = ValidationError::new("Full Name is required", "required");
///
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "email".to_string(),
///     vec![ValidationError::new("Please enter a valid email address", "email")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert_eq!(
///     err.field_messages().get("email").map(String::as_str),
///     Some("Please enter a valid email address")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failed rule (e.g. "required", "pattern").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the message reported for each field.
    ///
    /// When several rules failed for one field, the rule attached last wins.
    pub fn field_messages(&self) -> HashMap<String, String> {
        self.field_errors
            .iter()
            .filter_map(|(name, errors)| {
                errors
                    .last()
                    .map(|error| (name.clone(), error.message.clone()))
            })
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut names: Vec<&String> = self.field_errors.keys().collect();
            names.sort();
            let mut first = true;
            for field in names {
                for error in &self.field_errors[field] {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the formgen engine.
#[derive(Error, Debug)]
pub enum FormError {
    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// An operation named a field that is not part of the form.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A click was dispatched to a custom button id that is not configured.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A form definition or settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A submit collaborator reported a failure.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for FormError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
