//! The `render` management command.
//!
//! Renders a form definition to HTML, optionally pre-filled with values.

use async_trait::async_trait;
use formgen_core::{BindingMode, FormData, FormError, Settings};
use formgen_forms::config::FormConfiguration;
use formgen_forms::generator::FormGenerator;

use super::assignments_to_record;
use crate::command::ManagementCommand;

/// Renders a form definition to stdout or a file.
pub struct RenderCommand;

/// Renders `config` with `values` as defaults, in the given binding mode.
pub fn render_definition(
    config: FormConfiguration,
    settings: &Settings,
    mode: Option<BindingMode>,
    values: FormData,
) -> String {
    let settings = Settings {
        default_mode: mode.unwrap_or(settings.default_mode),
        ..settings.clone()
    };
    FormGenerator::with_settings(config, &settings, values)
        .with_id("render")
        .render()
}

#[async_trait]
impl ManagementCommand for RenderCommand {
    fn name(&self) -> &'static str {
        "render"
    }

    fn help(&self) -> &'static str {
        "Render a form definition to HTML"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("definition")
                .required(true)
                .help("Path to a TOML or JSON form definition"),
        )
        .arg(
            clap::Arg::new("mode")
                .long("mode")
                .value_parser(["controlled", "uncontrolled"])
                .help("Binding mode (defaults to the configured mode)"),
        )
        .arg(
            clap::Arg::new("value")
                .long("value")
                .short('v')
                .action(clap::ArgAction::Append)
                .help("Default value as name=value (repeatable)"),
        )
        .arg(
            clap::Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the HTML to this file instead of stdout"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormError> {
        let path = matches
            .get_one::<String>("definition")
            .ok_or_else(|| FormError::Configuration("a definition path is required".to_string()))?;
        let mode = matches
            .get_one::<String>("mode")
            .map(|m| m.parse::<BindingMode>())
            .transpose()
            .map_err(FormError::Configuration)?;
        let values = assignments_to_record(
            matches
                .get_many::<String>("value")
                .into_iter()
                .flatten()
                .map(String::as_str),
        )?;

        let config = FormConfiguration::from_file(path)?;
        let html = render_definition(config, settings, mode, values);

        if let Some(output) = matches.get_one::<String>("output") {
            tokio::fs::write(output, &html).await.map_err(|e| {
                FormError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write to {output}: {e}"),
                ))
            })?;
            tracing::info!("Form written to {output}");
        } else {
            println!("{html}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_core::Value;

    const DEFINITION: &str = r#"
[[fields]]
name = "fullname"
type = "text"
label = "Full Name"
required = true

[[fields]]
name = "rememberMe"
type = "checkbox"
label = "Remember Me"
"#;

    #[test]
    fn test_render_definition_modes() {
        let config = FormConfiguration::from_toml_str(DEFINITION).unwrap();
        let mut values = FormData::new();
        values.insert("fullname".into(), Value::from("Ada"));

        let html = render_definition(
            config.clone(),
            &Settings::default(),
            Some(BindingMode::Controlled),
            values.clone(),
        );
        assert!(html.contains(r#"data-mode="controlled""#));
        assert!(html.contains(r#"value="Ada""#));

        let html = render_definition(config, &Settings::default(), None, values);
        assert!(html.contains(r#"data-mode="uncontrolled""#));
    }

    #[tokio::test]
    async fn test_handle_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let definition = dir.path().join("form.toml");
        std::fs::write(&definition, DEFINITION).unwrap();
        let output = dir.path().join("form.html");

        let cmd = RenderCommand;
        let matches = cmd
            .add_arguments(clap::Command::new("render"))
            .try_get_matches_from([
                "render",
                definition.to_str().unwrap(),
                "--mode",
                "controlled",
                "-v",
                "fullname=Grace",
                "-o",
                output.to_str().unwrap(),
            ])
            .unwrap();
        cmd.handle(&matches, &Settings::default()).await.unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<form"));
        assert!(html.contains(r#"value="Grace""#));
        assert!(html.contains("Remember Me"));
    }

    #[tokio::test]
    async fn test_handle_rejects_bad_value() {
        let dir = tempfile::tempdir().unwrap();
        let definition = dir.path().join("form.toml");
        std::fs::write(&definition, DEFINITION).unwrap();

        let cmd = RenderCommand;
        let matches = cmd
            .add_arguments(clap::Command::new("render"))
            .try_get_matches_from(["render", definition.to_str().unwrap(), "-v", "fullname"])
            .unwrap();
        assert!(matches!(
            cmd.handle(&matches, &Settings::default()).await,
            Err(FormError::Configuration(_))
        ));
    }
}
