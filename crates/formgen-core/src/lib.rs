//! # formgen-core
//!
//! Core types, settings, and error types for the formgen engine.
//! This crate has no engine dependencies and provides the foundation for the
//! forms crate and the management CLI.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - Field values and submitted records
//! - [`settings`] - Engine settings and the binding mode vocabulary
//! - [`settings_loader`] - TOML/JSON/environment settings loading
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult, ValidationError};
pub use settings::{BindingMode, Settings};
pub use value::{FormData, Value};
