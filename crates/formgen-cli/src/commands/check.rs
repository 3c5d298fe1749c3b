//! The `check` management command.
//!
//! Loads a form definition and reports declarations that load but would
//! behave unexpectedly, plus settings that make no sense.

use std::fmt;

use async_trait::async_trait;
use formgen_core::{FormError, Settings};
use formgen_forms::config::{DefinitionIssue, FormConfiguration};

use crate::command::ManagementCommand;

/// Checks a form definition file and the active settings.
pub struct CheckCommand;

/// Severity of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    /// The form works, but probably not as intended.
    Warning,
    /// Part of the definition is ignored.
    Error,
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// The result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMessage {
    /// The severity level.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// A unique identifier (e.g. "fields.E001").
    pub id: &'static str,
}

impl From<&DefinitionIssue> for CheckMessage {
    fn from(issue: &DefinitionIssue) -> Self {
        let (level, id) = match issue {
            DefinitionIssue::DuplicateField(_) => (CheckLevel::Warning, "fields.W001"),
            DefinitionIssue::UnusedOptions(_) => (CheckLevel::Warning, "fields.W002"),
            DefinitionIssue::MissingOptions(_) => (CheckLevel::Error, "fields.E001"),
            DefinitionIssue::UnusableBound { .. } => (CheckLevel::Error, "fields.E002"),
            DefinitionIssue::DuplicateButton(_) => (CheckLevel::Warning, "buttons.W001"),
        };
        Self {
            level,
            msg: issue.to_string(),
            id,
        }
    }
}

/// Runs every check against a loaded definition and the settings.
pub fn run_checks(config: &FormConfiguration, settings: &Settings) -> Vec<CheckMessage> {
    let mut messages: Vec<CheckMessage> = config.check().iter().map(CheckMessage::from).collect();

    if config.fields.is_empty() {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: "form declares no fields".to_string(),
            id: "fields.W003",
        });
    }

    if settings.textarea_rows == 0 {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: "textarea_rows is 0; textareas render without visible rows".to_string(),
            id: "settings.W001",
        });
    }

    messages
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check a form definition for problems"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("definition")
                .required(true)
                .help("Path to a TOML or JSON form definition"),
        )
        .arg(
            clap::Arg::new("strict")
                .long("strict")
                .action(clap::ArgAction::SetTrue)
                .help("Treat warnings as errors"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormError> {
        let path = matches
            .get_one::<String>("definition")
            .ok_or_else(|| FormError::Configuration("a definition path is required".to_string()))?;
        let config = FormConfiguration::from_file(path)?;
        let messages = run_checks(&config, settings);

        if messages.is_empty() {
            tracing::info!("Check of {path} identified no issues");
            return Ok(());
        }

        for msg in &messages {
            tracing::warn!("{} ({}): {}", msg.level, msg.id, msg.msg);
        }

        let errors = messages.iter().filter(|m| m.level == CheckLevel::Error).count();
        let warnings = messages.len() - errors;
        tracing::info!(
            "Check of {path} identified {} issue(s) ({errors} error(s), {warnings} warning(s))",
            messages.len()
        );

        if errors > 0 || (matches.get_flag("strict") && warnings > 0) {
            return Err(FormError::Configuration(format!(
                "check of {path} failed with {errors} error(s) and {warnings} warning(s)"
            )));
        }
        Ok(())
    }
}
