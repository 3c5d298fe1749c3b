//! The `createuser` management command.
//!
//! Fills the user form from `name=value` arguments, submits it, and stores
//! the record in the file-backed store named by the settings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use formgen_core::{FormError, Settings, ValidationError};
use formgen_forms::generator::SubmitOutcome;
use formgen_forms::persistence::{FileStore, RecordStore};

use super::{format_errors, parse_assignments};
use crate::command::ManagementCommand;
use crate::pages::{detail_text, load_user, render_detail, CreateUserPage};

/// Creates a user record from command-line values.
pub struct CreateuserCommand;

fn invalid(errors: &HashMap<String, String>) -> FormError {
    let field_errors = errors
        .iter()
        .map(|(name, message)| (name.clone(), vec![ValidationError::new(message.clone(), "invalid")]))
        .collect();
    FormError::Validation(ValidationError::with_field_errors(field_errors))
}

/// Fills and submits the user form against `store`.
///
/// Returns the page so callers can inspect its state after the attempt.
pub async fn create_user(
    settings: &Settings,
    store: Arc<dyn RecordStore>,
    values: &[(&str, &str)],
) -> Result<CreateUserPage, FormError> {
    let mut page = CreateUserPage::new(settings, store)?;
    page.fill(values.iter().copied())?;
    match page.submit().await {
        SubmitOutcome::Success { .. } => Ok(page),
        SubmitOutcome::Invalid(errors) => {
            eprintln!("{}", format_errors(&errors));
            Err(invalid(&errors))
        }
        SubmitOutcome::Failed(message) => Err(FormError::Submission(message)),
        SubmitOutcome::Busy => Err(FormError::Submission(
            "a submission is already in flight".to_string(),
        )),
    }
}

#[async_trait]
impl ManagementCommand for CreateuserCommand {
    fn name(&self) -> &'static str {
        "createuser"
    }

    fn help(&self) -> &'static str {
        "Create a user from name=value pairs"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("values")
                .num_args(0..)
                .help("Field values: fullname=.. email=.. password=.. rememberMe=on"),
        )
        .arg(
            clap::Arg::new("html")
                .long("html")
                .action(clap::ArgAction::SetTrue)
                .help("Print the detail page as HTML"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormError> {
        let values = parse_assignments(
            matches
                .get_many::<String>("values")
                .into_iter()
                .flatten()
                .map(String::as_str),
        )?;
        let store = Arc::new(FileStore::new(&settings.store_path));
        tracing::info!(store = %store.path().display(), "creating user");

        create_user(settings, Arc::clone(&store) as Arc<dyn RecordStore>, &values).await?;

        let record = load_user(store.as_ref(), &settings.record_key)?;
        if matches.get_flag("html") {
            println!("{}", render_detail(record.as_ref()));
        } else {
            print!("{}", detail_text(record.as_ref()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_core::Value;
    use formgen_forms::persistence::MemoryStore;

    #[tokio::test]
    async fn test_create_user_success() {
        let store = Arc::new(MemoryStore::new());
        let page = create_user(
            &Settings::default(),
            Arc::clone(&store) as Arc<dyn RecordStore>,
            &[
                ("fullname", "Grace Hopper"),
                ("email", "grace@example.com"),
                ("password", "cobol59"),
            ],
        )
        .await
        .unwrap();
        assert!(page.form().errors().is_empty());
        let record = load_user(store.as_ref(), "userData").unwrap().unwrap();
        assert_eq!(record["fullname"], Value::from("Grace Hopper"));
        assert_eq!(record["rememberMe"], Value::Bool(false));
    }

    #[tokio::test]
    async fn test_create_user_invalid() {
        let store = Arc::new(MemoryStore::new());
        let Err(FormError::Validation(err)) = create_user(
            &Settings::default(),
            Arc::clone(&store) as Arc<dyn RecordStore>,
            &[("fullname", "G")],
        )
        .await
        else {
            panic!("expected a validation error");
        };
        let messages = err.field_messages();
        assert_eq!(messages["email"], "Email is required");
        assert_eq!(messages["password"], "Password is required");
        assert!(messages.contains_key("fullname"));
        assert!(store.get("userData").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_handle_writes_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            store_path: dir.path().join("store.json"),
            ..Settings::default()
        };
        let cmd = CreateuserCommand;
        let matches = cmd
            .add_arguments(clap::Command::new("createuser"))
            .try_get_matches_from([
                "createuser",
                "fullname=Ada Lovelace",
                "email=ada@example.com",
                "password=abc123",
                "rememberMe=on",
            ])
            .unwrap();
        cmd.handle(&matches, &settings).await.unwrap();

        let store = FileStore::new(&settings.store_path);
        let record = load_user(&store, "userData").unwrap().unwrap();
        assert_eq!(record["rememberMe"], Value::Bool(true));
    }
}
