//! # formgen-forms
//!
//! The form engine: field descriptors, validation schema synthesis, dual-mode
//! value binding, HTML rendering, button orchestration, and the submission
//! lifecycle.
//!
//! ## Architecture
//!
//! A [`FormConfiguration`](config::FormConfiguration) lists
//! [`FieldDescriptor`](descriptor::FieldDescriptor)s. The
//! [`FormGenerator`](generator::FormGenerator) synthesizes a
//! [`ValidationSchema`](schema::ValidationSchema) from them, keeps values in a
//! [`BindingStore`](binding::BindingStore) for the chosen mode, and renders
//! each field through the [`FieldBinding`](binding::FieldBinding) trait so the
//! renderer never depends on the mode.
//!
//! ## Module Overview
//!
//! - [`kinds`] - The closed set of field kinds and their rule/control table
//! - [`descriptor`] - Field descriptors, bounds, and constraints
//! - [`schema`] - Validation schema synthesis and validation
//! - [`binding`] - Controlled and uncontrolled value binding
//! - [`widgets`] - Leaf HTML controls
//! - [`renderer`] - Complete field rendering
//! - [`buttons`] - Button defaults, overrides, and layout
//! - [`config`] - Form configuration and callbacks
//! - [`generator`] - The form instance and its submission lifecycle
//! - [`persistence`] - Keyed record stores

// These clippy lints are intentionally allowed for the forms crate:
// - struct_excessive_bools: descriptors and button configs carry several flags
// - format_push_string: format! with push_str is clearer for HTML generation
// - module_name_repetitions: types like FormConfiguration live in config
// - return_self_not_must_use: builder pattern methods are self-documenting
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::format_push_string)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::return_self_not_must_use)]

pub mod binding;
pub mod buttons;
pub mod config;
pub mod descriptor;
pub mod generator;
pub mod kinds;
pub mod persistence;
pub mod renderer;
pub mod schema;
pub mod widgets;

pub use binding::{resolve_binding, BindingStore, FieldBinding};
pub use buttons::{resolve_buttons, ButtonConfig, ButtonSet, ButtonSize, ButtonVariant};
pub use config::{ButtonPosition, CustomButton, FormConfiguration, SubmitHandler};
pub use descriptor::{Bound, FieldDescriptor, IconPosition, SelectOption};
pub use generator::{FormGenerator, SubmissionPhase, SubmitOutcome};
pub use kinds::FieldKind;
pub use persistence::{FileStore, MemoryStore, RecordStore};
pub use renderer::{render_field, RenderOptions};
pub use schema::{synthesize, ValidationSchema};
