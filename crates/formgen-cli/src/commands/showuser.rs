//! The `showuser` management command.

use async_trait::async_trait;
use formgen_core::{FormError, Settings};
use formgen_forms::persistence::FileStore;

use crate::command::ManagementCommand;
use crate::pages::{detail_text, load_user, render_detail};

/// Prints the stored user with the password masked, or the empty state.
pub struct ShowuserCommand;

#[async_trait]
impl ManagementCommand for ShowuserCommand {
    fn name(&self) -> &'static str {
        "showuser"
    }

    fn help(&self) -> &'static str {
        "Show the stored user"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("html")
                .long("html")
                .action(clap::ArgAction::SetTrue)
                .help("Print the detail page as HTML"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), FormError> {
        let store = FileStore::new(&settings.store_path);
        let record = load_user(&store, &settings.record_key)?;
        if record.is_none() {
            tracing::debug!(key = %settings.record_key, "no stored user");
        }
        if matches.get_flag("html") {
            println!("{}", render_detail(record.as_ref()));
        } else {
            print!("{}", detail_text(record.as_ref()));
        }
        Ok(())
    }
}
