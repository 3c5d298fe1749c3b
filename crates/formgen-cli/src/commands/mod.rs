//! Built-in management commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait.

pub mod check;
pub mod clearuser;
pub mod createuser;
pub mod render;
pub mod showuser;
pub mod validate;

pub use check::CheckCommand;
pub use clearuser::ClearuserCommand;
pub use createuser::CreateuserCommand;
pub use render::RenderCommand;
pub use showuser::ShowuserCommand;
pub use validate::ValidateCommand;

use formgen_core::{FormData, FormError, Value};

use crate::command::CommandRegistry;

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(RenderCommand));
    registry.register(Box::new(ValidateCommand));
    registry.register(Box::new(CreateuserCommand));
    registry.register(Box::new(ShowuserCommand));
    registry.register(Box::new(ClearuserCommand));
}

/// Splits `name=value` arguments into pairs.
///
/// The value may itself contain `=`; only the first one separates.
pub fn parse_assignments<'a>(
    args: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<(&'a str, &'a str)>, FormError> {
    args.into_iter()
        .map(|arg| {
            arg.split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| {
                    FormError::Configuration(format!("expected name=value, got '{arg}'"))
                })
        })
        .collect()
}

/// Collects `name=value` arguments into a record of string values.
pub fn assignments_to_record<'a>(
    args: impl IntoIterator<Item = &'a str>,
) -> Result<FormData, FormError> {
    Ok(parse_assignments(args)?
        .into_iter()
        .map(|(name, value)| (name.to_string(), Value::from(value)))
        .collect())
}

/// Formats per-field messages as sorted `name: message` lines.
pub fn format_errors(errors: &std::collections::HashMap<String, String>) -> String {
    let mut names: Vec<&String> = errors.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| format!("{name}: {}", errors[name]))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtin_commands() {
        let mut registry = CommandRegistry::new();
        register_builtin_commands(&mut registry);
        assert_eq!(
            registry.list_commands(),
            ["check", "clearuser", "createuser", "render", "showuser", "validate"]
        );
    }

    #[test]
    fn test_parse_assignments() {
        let pairs = parse_assignments(["fullname=Ada Lovelace", "token=a=b", "empty="]).unwrap();
        assert_eq!(
            pairs,
            [("fullname", "Ada Lovelace"), ("token", "a=b"), ("empty", "")]
        );
        assert!(parse_assignments(["novalue"]).is_err());
        assert!(parse_assignments(["=x"]).is_err());
    }

    #[test]
    fn test_format_errors_sorted() {
        let errors = [
            ("password".to_string(), "Password is required".to_string()),
            ("email".to_string(), "Email is required".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            format_errors(&errors),
            "email: Email is required\npassword: Password is required"
        );
    }
}
