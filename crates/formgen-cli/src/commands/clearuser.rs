//! The `clearuser` management command.

use async_trait::async_trait;
use formgen_core::{FormError, Settings};
use formgen_forms::persistence::FileStore;

use crate::command::ManagementCommand;
use crate::pages::create_another;

/// Removes the stored user so another can be created.
pub struct ClearuserCommand;

#[async_trait]
impl ManagementCommand for ClearuserCommand {
    fn name(&self) -> &'static str {
        "clearuser"
    }

    fn help(&self) -> &'static str {
        "Remove the stored user"
    }

    async fn handle(&self, _matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormError> {
        let store = FileStore::new(&settings.store_path);
        create_another(&store, &settings.record_key)?;
        tracing::info!(key = %settings.record_key, "stored user cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_core::{FormData, Value};
    use formgen_forms::persistence::{save_record, RecordStore};

    #[tokio::test]
    async fn test_handle_removes_only_the_user() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            store_path: dir.path().join("store.json"),
            ..Settings::default()
        };
        let store = FileStore::new(&settings.store_path);
        let mut record = FormData::new();
        record.insert("fullname".into(), Value::from("Ada"));
        save_record(&store, "userData", &record).unwrap();
        store.set("theme", "dark").unwrap();

        let cmd = ClearuserCommand;
        let matches = cmd
            .add_arguments(clap::Command::new("clearuser"))
            .try_get_matches_from(["clearuser"])
            .unwrap();
        cmd.handle(&matches, &settings).await.unwrap();

        assert!(store.get("userData").unwrap().is_none());
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }
}
