//! # formgen-cli
//!
//! Management commands and the user-creation flow for formgen.
//!
//! This crate provides:
//!
//! - **Management commands** - A framework for defining and registering CLI
//!   commands, plus built-in commands (`render`, `validate`, `check`,
//!   `createuser`, `showuser`, `clearuser`)
//! - **Pages** - The create-user form wired to a record store, and the
//!   detail view of the stored user
//!
//! ## Quick Start
//!
//! ```rust
//! use formgen_cli::command::CommandRegistry;
//! use formgen_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"render"));
//! assert!(names.contains(&"createuser"));
//! ```

// These clippy lints are intentionally allowed:
// - doc_markdown: backtick requirements for documentation items are too strict
// - missing_const_for_fn: some functions may gain runtime logic later
// - format_push_string: format! with push_str is clearer for page generation
// - unused_async: command handlers maintain consistent async signatures
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::format_push_string)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;
pub mod pages;

// Re-export primary types at the crate root for convenience.
pub use command::{CommandRegistry, ManagementCommand};
pub use pages::{CreateUserPage, PersistUser};
