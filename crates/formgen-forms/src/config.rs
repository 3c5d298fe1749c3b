//! Form configuration.
//!
//! A [`FormConfiguration`] is plain data (fields, button overrides, flags)
//! that deserializes from TOML or JSON, plus callbacks attached in code: the
//! async [`SubmitHandler`], custom button [`Action`]s, and icon callbacks.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use formgen_core::settings_loader::toml_to_json;
use formgen_core::{FormData, FormError, FormResult};

use crate::buttons::ButtonConfig;
use crate::descriptor::{FieldDescriptor, IconAction};
use crate::kinds::BaseRule;

/// The caller-supplied submit collaborator.
///
/// An error means the submission failed; the form logs it and keeps its
/// values.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Receives the validated, coerced record.
    async fn submit(&self, data: FormData) -> Result<(), FormError>;
}

#[async_trait]
impl<F, Fut> SubmitHandler for F
where
    F: Fn(FormData) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), FormError>> + Send + 'static,
{
    async fn submit(&self, data: FormData) -> Result<(), FormError> {
        (self)(data).await
    }
}

/// A shared submit handler.
#[derive(Clone)]
pub struct Submitter(pub Arc<dyn SubmitHandler>);

impl Submitter {
    /// Wraps a handler.
    pub fn new(handler: impl SubmitHandler + 'static) -> Self {
        Self(Arc::new(handler))
    }
}

impl fmt::Debug for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Submitter(..)")
    }
}

/// A custom button callback. Receives an owned snapshot of the form values.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn(FormData) + Send + Sync>);

impl Action {
    /// Wraps a closure.
    pub fn new(f: impl Fn(FormData) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the callback.
    pub fn call(&self, data: FormData) {
        (self.0)(data);
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Where a custom button is placed relative to the submit/reset row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPosition {
    /// Above the main row.
    Before,
    /// Below the main row.
    #[default]
    After,
}

/// A caller-defined button that fires a callback without validating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomButton {
    /// Identifier, unique among the form's custom buttons.
    pub id: String,
    /// Appearance override.
    #[serde(default)]
    pub config: ButtonConfig,
    /// Placement.
    #[serde(default)]
    pub position: ButtonPosition,
    /// Click callback.
    #[serde(skip)]
    pub on_click: Option<Action>,
}

impl CustomButton {
    /// Creates a button placed after the main row.
    pub fn new(id: impl Into<String>, config: ButtonConfig) -> Self {
        Self {
            id: id.into(),
            config,
            position: ButtonPosition::default(),
            on_click: None,
        }
    }

    /// Sets the placement.
    #[must_use]
    pub const fn position(mut self, position: ButtonPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the click callback.
    #[must_use]
    pub fn on_click(mut self, f: impl Fn(FormData) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Action::new(f));
        self
    }
}

/// The complete description of a form.
///
/// # Examples
///
/// ```
/// use formgen_forms::config::FormConfiguration;
///
/// let config = FormConfiguration::from_toml_str(r#"
///     show_reset_button = true
///
///     [[fields]]
///     name = "email"
///     type = "email"
///     label = "Email"
///     required = true
/// "#).unwrap();
/// assert_eq!(config.fields.len(), 1);
/// assert!(config.show_reset_button);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfiguration {
    /// Fields in display order.
    pub fields: Vec<FieldDescriptor>,
    /// Submit collaborator.
    #[serde(skip)]
    pub on_submit: Option<Submitter>,
    /// Submit button override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_button: Option<ButtonConfig>,
    /// Reset button override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_button: Option<ButtonConfig>,
    /// Whether a reset button is shown.
    pub show_reset_button: bool,
    /// Whether values return to defaults after a successful submission.
    pub reset_after_submit: bool,
    /// Custom buttons in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_buttons: Vec<CustomButton>,
}

impl FormConfiguration {
    /// Creates a configuration with the given fields and default buttons.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Parses a form definition from TOML.
    pub fn from_toml_str(s: &str) -> FormResult<Self> {
        let value: toml::Value =
            toml::from_str(s).map_err(|e| FormError::Configuration(e.to_string()))?;
        serde_json::from_value(toml_to_json(value))
            .map_err(|e| FormError::Configuration(e.to_string()))
    }

    /// Parses a form definition from JSON.
    pub fn from_json_str(s: &str) -> FormResult<Self> {
        serde_json::from_str(s).map_err(|e| FormError::Configuration(e.to_string()))
    }

    /// Loads a form definition file; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Sets the submit collaborator.
    #[must_use]
    pub fn on_submit(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.on_submit = Some(Submitter::new(handler));
        self
    }

    /// Sets the submit button override.
    #[must_use]
    pub fn submit_button(mut self, config: ButtonConfig) -> Self {
        self.submit_button = Some(config);
        self
    }

    /// Sets the reset button override.
    #[must_use]
    pub fn reset_button(mut self, config: ButtonConfig) -> Self {
        self.reset_button = Some(config);
        self
    }

    /// Sets whether a reset button is shown.
    #[must_use]
    pub const fn show_reset_button(mut self, show: bool) -> Self {
        self.show_reset_button = show;
        self
    }

    /// Sets whether values return to defaults after a successful submission.
    #[must_use]
    pub const fn reset_after_submit(mut self, reset: bool) -> Self {
        self.reset_after_submit = reset;
        self
    }

    /// Appends a custom button.
    #[must_use]
    pub fn custom_button(mut self, button: CustomButton) -> Self {
        self.custom_buttons.push(button);
        self
    }

    /// Attaches an icon click callback to a field loaded from a definition.
    pub fn attach_icon_click(
        &mut self,
        name: &str,
        f: impl Fn() + Send + Sync + 'static,
    ) -> FormResult<()> {
        let field = self
            .fields
            .iter_mut()
            .rev()
            .find(|field| field.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        field.on_icon_click = Some(IconAction::new(f));
        Ok(())
    }

    /// Attaches a click callback to a custom button loaded from a definition.
    pub fn attach_custom_click(
        &mut self,
        id: &str,
        f: impl Fn(FormData) + Send + Sync + 'static,
    ) -> FormResult<()> {
        let button = self
            .custom_buttons
            .iter_mut()
            .find(|button| button.id == id)
            .ok_or_else(|| FormError::UnknownAction(id.to_string()))?;
        button.on_click = Some(Action::new(f));
        Ok(())
    }

    /// Returns the last field declared under `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().rev().find(|field| field.name == name)
    }

    /// Lists problems in this definition that do not prevent it from
    /// loading but make it behave unexpectedly.
    pub fn check(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                issues.push(DefinitionIssue::DuplicateField(field.name.clone()));
            }
            if !field.options.is_empty() && !field.kind.takes_options() {
                issues.push(DefinitionIssue::UnusedOptions(field.name.clone()));
            }
            if field.kind.takes_options() && field.options.is_empty() {
                issues.push(DefinitionIssue::MissingOptions(field.name.clone()));
            }
            let constraint = &field.constraint;
            for bound in [&constraint.min, &constraint.max].into_iter().flatten() {
                let usable = match field.kind.base_rule() {
                    BaseRule::Boolean => true,
                    BaseRule::Numeric => bound.as_number().is_some(),
                    BaseRule::Date => bound.as_date().is_some(),
                    BaseRule::Email | BaseRule::Text => bound.as_length().is_some(),
                };
                if !usable {
                    issues.push(DefinitionIssue::UnusableBound {
                        field: field.name.clone(),
                        bound: bound.to_string(),
                    });
                }
            }
        }
        let mut ids = HashSet::new();
        for button in &self.custom_buttons {
            if !ids.insert(button.id.as_str()) {
                issues.push(DefinitionIssue::DuplicateButton(button.id.clone()));
            }
        }
        issues
    }
}

/// A problem found by [`FormConfiguration::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionIssue {
    /// Two fields share a name; the later one wins.
    DuplicateField(String),
    /// A field that is not a select or radio declares options.
    UnusedOptions(String),
    /// A select or radio field declares no options.
    MissingOptions(String),
    /// A bound cannot be read as the kind's number, date, or length.
    UnusableBound {
        /// The field name.
        field: String,
        /// The bound as written.
        bound: String,
    },
    /// Two custom buttons share an id.
    DuplicateButton(String),
}

impl fmt::Display for DefinitionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField(name) => {
                write!(f, "field '{name}' is declared more than once")
            }
            Self::UnusedOptions(name) => {
                write!(f, "field '{name}' has options but is not a select or radio field")
            }
            Self::MissingOptions(name) => write!(f, "field '{name}' has no options"),
            Self::UnusableBound { field, bound } => {
                write!(f, "field '{field}' has a bound '{bound}' that does not fit its kind")
            }
            Self::DuplicateButton(id) => {
                write!(f, "custom button '{id}' is declared more than once")
            }
        }
    }
}
