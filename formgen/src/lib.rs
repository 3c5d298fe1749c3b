//! # formgen
//!
//! A configuration-driven form engine.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formgen` to get the whole engine, or depend on
//! individual crates for finer-grained control.
//!
//! ```
//! use formgen::prelude::*;
//!
//! let config = FormConfiguration::new(vec![
//!     FieldDescriptor::new("email", FieldKind::Email)
//!         .label("Email")
//!         .required(true),
//! ]);
//! let mut form = FormGenerator::new(config, BindingMode::Controlled, FormData::new());
//! form.input("email", "ada@example.com").unwrap();
//! assert!(form.render().contains(r#"value="ada@example.com""#));
//! ```

/// Values, settings, logging, and error types.
pub use formgen_core as core;

/// Field descriptors, validation, binding, rendering, and submission.
pub use formgen_forms as forms;

/// Management commands (CLI) and the create-user flow.
#[cfg(feature = "cli")]
pub use formgen_cli as cli;

/// The types most programs need to declare, render, and submit a form.
pub mod prelude {
    pub use formgen_core::{BindingMode, FormData, FormError, FormResult, Settings, Value};
    pub use formgen_forms::{
        ButtonConfig, ButtonPosition, ButtonVariant, CustomButton, FieldDescriptor, FieldKind,
        FormConfiguration, FormGenerator, IconPosition, SubmitHandler, SubmitOutcome,
    };
}
