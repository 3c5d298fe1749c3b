//! The form generator.
//!
//! A [`FormGenerator`] owns one form instance: its configuration, the
//! synthesized schema, the value store for the chosen binding mode, the
//! current field errors, and the submission phase.
//!
//! Submission runs `Idle -> Validating -> Submitting -> Idle`. It is split
//! into [`FormGenerator::begin_submit`], which validates synchronously and
//! hands out an owned [`PendingSubmission`], and
//! [`FormGenerator::complete_submit`], which applies the handler's result.
//! Between the two, input keeps working and further submits are refused.

use std::collections::HashMap;

use tracing::Instrument;

use formgen_core::logging::form_span;
use formgen_core::{BindingMode, FormData, FormError, FormResult, Settings, Value};

use crate::binding::{convert_kind, normalize, resolve_binding, BindingStore};
use crate::buttons::{resolve_buttons, ButtonInputs, ButtonSet};
use crate::config::{FormConfiguration, Submitter};
use crate::kinds::FieldKind;
use crate::renderer::{render_field, RenderOptions};
use crate::schema::{synthesize, ValidationSchema};

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    /// No submission in progress.
    #[default]
    Idle,
    /// Values are being validated.
    Validating,
    /// The submit handler is running.
    Submitting,
}

/// The result of a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the handler was not invoked. Holds the message
    /// reported for each failing field.
    Invalid(HashMap<String, String>),
    /// The handler succeeded. `reset` tells whether values returned to their
    /// defaults.
    Success {
        /// Whether values were reset.
        reset: bool,
    },
    /// The handler failed; values were kept.
    Failed(String),
    /// A submission was already in flight.
    Busy,
}

/// What the owner must do after a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEffect {
    /// Canonical state changed; re-render.
    Rerender,
    /// A native control changed; nothing to re-render.
    Unchanged,
}

/// A validated submission waiting for its handler.
#[derive(Debug)]
pub struct PendingSubmission {
    data: FormData,
    handler: Option<Submitter>,
    span: tracing::Span,
}

impl PendingSubmission {
    /// Returns the validated, coerced record.
    pub const fn data(&self) -> &FormData {
        &self.data
    }

    /// Runs the submit handler with an owned copy of the record.
    pub async fn run(&self) -> Result<(), FormError> {
        let handler = self
            .handler
            .as_ref()
            .ok_or_else(|| FormError::Configuration("no submit handler configured".into()))?;
        handler
            .0
            .submit(self.data.clone())
            .instrument(self.span.clone())
            .await
    }
}

/// One interactive form instance.
#[derive(Debug)]
pub struct FormGenerator {
    config: FormConfiguration,
    schema: ValidationSchema,
    defaults: FormData,
    store: BindingStore,
    errors: HashMap<String, String>,
    phase: SubmissionPhase,
    options: RenderOptions,
    span: tracing::Span,
}

impl FormGenerator {
    /// Creates a form. Fields missing from `default_values` start empty
    /// (checkboxes unchecked).
    pub fn new(config: FormConfiguration, mode: BindingMode, default_values: FormData) -> Self {
        let defaults = initial_values(&config, default_values);
        let schema = synthesize(&config.fields);
        let span = form_span("form");
        span.in_scope(|| {
            tracing::debug!(
                fields = config.fields.len(),
                mode = %mode,
                "form created"
            );
        });
        Self {
            store: BindingStore::new(mode, defaults.clone()),
            config,
            schema,
            defaults,
            errors: HashMap::new(),
            phase: SubmissionPhase::Idle,
            options: RenderOptions::default(),
            span,
        }
    }

    /// Creates a form using the mode and rendering options from `settings`.
    pub fn with_settings(
        config: FormConfiguration,
        settings: &Settings,
        default_values: FormData,
    ) -> Self {
        let mut generator = Self::new(config, settings.default_mode, default_values);
        generator.options = RenderOptions::from(settings);
        generator
    }

    /// Names this form in log output.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.span = form_span(id);
        self
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &FormConfiguration {
        &self.config
    }

    /// Returns the synthesized schema.
    pub const fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    /// Returns the binding mode.
    pub const fn mode(&self) -> BindingMode {
        self.store.mode()
    }

    /// Returns the submission phase.
    pub const fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Returns `true` while the submit handler is running.
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Returns the default values the form resets to.
    pub const fn defaults(&self) -> &FormData {
        &self.defaults
    }

    /// Returns the current field errors.
    pub const fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    /// Returns the current error for one field.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Returns an owned snapshot of the current values.
    pub fn values(&self) -> FormData {
        self.store.snapshot()
    }

    /// Returns the kind of the last field declared under `name`.
    pub fn field_kind(&self, name: &str) -> Option<&FieldKind> {
        self.config.field(name).map(|field| &field.kind)
    }

    /// Applies a user change to one field.
    ///
    /// Controlled forms route the change through the field's binding and
    /// ask for a re-render whenever the stored revision moves. Uncontrolled
    /// forms take it as a native input event written straight to the
    /// registry, which never triggers a re-render.
    pub fn input(&mut self, name: &str, value: impl Into<Value>) -> FormResult<ChangeEffect> {
        let field = self
            .config
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let before = self.store.revision();
        match &mut self.store {
            BindingStore::Uncontrolled(registry) => {
                registry.write(name, normalize(&field.kind, value.into()));
            }
            store => resolve_binding(field, store).set(value.into()),
        }
        let _guard = self.span.enter();
        tracing::trace!(field = name, "value changed");
        Ok(if self.store.revision() == before {
            ChangeEffect::Unchanged
        } else {
            ChangeEffect::Rerender
        })
    }

    /// Switches a field to another kind, keeping its value.
    ///
    /// The stored value and the default are converted when the switch
    /// crosses the boolean/text boundary, and the schema is re-synthesized
    /// so the new kind's rules apply.
    pub fn set_field_kind(&mut self, name: &str, kind: FieldKind) -> FormResult<()> {
        let previous = self
            .field_kind(name)
            .cloned()
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        for field in self.config.fields.iter_mut().filter(|f| f.name == name) {
            field.kind = kind.clone();
        }
        let current = self.store.read(name);
        self.store.replace(name, convert_kind(&previous, &kind, current));
        if let Some(default) = self.defaults.remove(name) {
            self.defaults
                .insert(name.to_string(), convert_kind(&previous, &kind, default));
        }
        self.schema = synthesize(&self.config.fields);
        let _guard = self.span.enter();
        tracing::debug!(field = name, kind = %kind, "field kind changed");
        Ok(())
    }

    /// Renders the whole form.
    pub fn render(&mut self) -> String {
        let _guard = self.span.enter();
        let mut html = format!(
            r#"<form class="form" novalidate data-mode="{}">"#,
            self.store.mode()
        );
        for field in &self.config.fields {
            let binding = resolve_binding(field, &mut self.store);
            let error = self.errors.get(&field.name).map(String::as_str);
            html.push_str(&render_field(field, binding.as_ref(), error, &self.options));
        }
        html.push_str(&self.buttons().render());
        html.push_str("</form>");
        html
    }

    /// Resolves the form's buttons for the current phase.
    pub fn buttons(&self) -> ButtonSet {
        resolve_buttons(
            ButtonInputs {
                submit: self.config.submit_button.as_ref(),
                reset: self.config.reset_button.as_ref(),
                show_reset: self.config.show_reset_button,
                custom: &self.config.custom_buttons,
            },
            self.is_submitting(),
        )
    }

    /// Validates the current values and, on success, moves to `Submitting`.
    ///
    /// Returns the outcome directly when there is nothing to submit: the
    /// form is busy or validation failed.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitOutcome> {
        let _guard = self.span.enter();
        if self.phase == SubmissionPhase::Submitting {
            tracing::warn!("submit refused while a submission is in flight");
            return Err(SubmitOutcome::Busy);
        }

        self.phase = SubmissionPhase::Validating;
        tracing::debug!(phase = ?self.phase, "validating");
        match self.schema.validate(&self.store.snapshot()) {
            Err(err) => {
                self.errors = err.field_messages();
                self.phase = SubmissionPhase::Idle;
                tracing::debug!(invalid = self.errors.len(), "validation failed");
                Err(SubmitOutcome::Invalid(self.errors.clone()))
            }
            Ok(data) => {
                self.errors.clear();
                self.phase = SubmissionPhase::Submitting;
                tracing::debug!(phase = ?self.phase, "submitting");
                Ok(PendingSubmission {
                    data,
                    handler: self.config.on_submit.clone(),
                    span: self.span.clone(),
                })
            }
        }
    }

    /// Applies the settled result of the handler.
    pub fn complete_submit(&mut self, result: Result<(), FormError>) -> SubmitOutcome {
        let _guard = self.span.enter();
        if self.phase != SubmissionPhase::Submitting {
            tracing::warn!("submission completed with none in flight");
            return SubmitOutcome::Failed("no submission in flight".into());
        }
        self.phase = SubmissionPhase::Idle;
        match result {
            Ok(()) => {
                let reset = self.config.reset_after_submit;
                if reset {
                    self.store.reset(self.defaults.clone());
                }
                tracing::info!(reset, "form submitted");
                SubmitOutcome::Success { reset }
            }
            Err(err) => {
                tracing::error!(error = %err, "form submission error");
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    /// Validates, runs the submit handler, and applies its result.
    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.begin_submit() {
            Err(outcome) => outcome,
            Ok(pending) => {
                let result = pending.run().await;
                self.complete_submit(result)
            }
        }
    }

    /// Restores default values and clears errors.
    pub fn reset(&mut self) {
        self.store.reset(self.defaults.clone());
        self.errors.clear();
        let _guard = self.span.enter();
        tracing::debug!("form reset");
    }

    /// Fires a custom button with a snapshot of the current values.
    ///
    /// No validation runs and the submission phase is untouched.
    pub fn click_custom(&self, id: &str) -> FormResult<()> {
        let button = self
            .config
            .custom_buttons
            .iter()
            .find(|button| button.id == id)
            .ok_or_else(|| FormError::UnknownAction(id.to_string()))?;
        let _guard = self.span.enter();
        tracing::debug!(button = id, "custom button clicked");
        if let Some(action) = &button.on_click {
            action.call(self.store.snapshot());
        }
        Ok(())
    }

    /// Fires a field's icon callback. Returns `false` if the field has none.
    pub fn click_icon(&self, name: &str) -> FormResult<bool> {
        let field = self
            .config
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        Ok(field.on_icon_click.as_ref().map_or(false, |action| {
            action.call();
            true
        }))
    }
}

fn initial_values(config: &FormConfiguration, mut values: FormData) -> FormData {
    for field in &config.fields {
        let value = values.remove(&field.name).unwrap_or_else(|| {
            if field.kind == FieldKind::Checkbox {
                Value::Bool(false)
            } else {
                Value::String(String::new())
            }
        });
        values.insert(field.name.clone(), normalize(&field.kind, value));
    }
    values
}
