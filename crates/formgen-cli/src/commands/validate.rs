//! The `validate` management command.

use async_trait::async_trait;
use formgen_core::{FormData, FormError, Settings, ValidationError};
use formgen_forms::config::FormConfiguration;
use formgen_forms::schema::synthesize;

use super::{assignments_to_record, format_errors};
use crate::command::ManagementCommand;

/// Validates `name=value` input against a form definition and prints the
/// coerced record as JSON.
pub struct ValidateCommand;

/// Validates `record` against the schema synthesized from `config`.
pub fn validate_record(
    config: &FormConfiguration,
    record: &FormData,
) -> Result<FormData, ValidationError> {
    synthesize(&config.fields).validate(record)
}

#[async_trait]
impl ManagementCommand for ValidateCommand {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn help(&self) -> &'static str {
        "Validate values against a form definition"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("definition")
                .required(true)
                .help("Path to a TOML or JSON form definition"),
        )
        .arg(
            clap::Arg::new("values")
                .num_args(0..)
                .help("Field values as name=value"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, _settings: &Settings) -> Result<(), FormError> {
        let path = matches
            .get_one::<String>("definition")
            .ok_or_else(|| FormError::Configuration("a definition path is required".to_string()))?;
        let record = assignments_to_record(
            matches
                .get_many::<String>("values")
                .into_iter()
                .flatten()
                .map(String::as_str),
        )?;
        let config = FormConfiguration::from_file(path)?;

        match validate_record(&config, &record) {
            Ok(cleaned) => {
                println!("{}", serde_json::to_string_pretty(&cleaned)?);
                Ok(())
            }
            Err(err) => {
                let messages = err.field_messages();
                tracing::warn!(invalid = messages.len(), "validation failed");
                eprintln!("{}", format_errors(&messages));
                Err(FormError::Validation(err))
            }
        }
    }
}
