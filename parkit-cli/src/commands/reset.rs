//! Reset command implementation.
//!
//! Deletes every ticket and frees every spot. The inventory itself is kept.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;

/// Delete every ticket and free every spot.
#[derive(Args)]
pub struct ResetCommand {
    /// Confirm the reset; nothing is deleted without it
    #[arg(long)]
    pub yes: bool,
}

impl ResetCommand {
    /// Execute the reset command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if !self.yes {
            return Err(CliError::InvalidArguments(
                "reset deletes all parking history; pass --yes to confirm".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let summary = db.reset_sessions()?;

        if !global.quiet {
            println!(
                "Deleted {} tickets and released {} spots",
                summary.tickets_deleted, summary.spots_released
            );
        }

        Ok(())
    }
}
