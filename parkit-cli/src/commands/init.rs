//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the parkit data directory, database and spot inventory.

use crate::error::CliError;
use crate::utils::{load_configuration, resolve_data_dir, GlobalOptions};
use clap::Parser;
use parkit::operations::{init_lot, InitOptions};

/// Initialize parkit data directory and database.
#[derive(Parser)]
#[command(about = "Initialize parkit data directory and database")]
pub struct InitCommand {
    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Number of car spots (defaults to the configured layout)
    #[arg(long, value_name = "COUNT")]
    car_spots: Option<u32>,

    /// Number of bike spots (defaults to the configured layout)
    #[arg(long, value_name = "COUNT")]
    bike_spots: Option<u32>,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Note: `--disable-autoinit` has no effect here, and `--data-dir` names
    /// the directory to create rather than one to find.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        let config = load_configuration(global)?;
        let (configured_cars, configured_bikes) = config.lot_layout();
        let cars = self.car_spots.unwrap_or(configured_cars);
        let bikes = self.bike_spots.unwrap_or(configured_bikes);

        let options = InitOptions::new(data_dir.clone())
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_layout(cars, bikes);

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize parkit in: {}", data_dir.display());

            if data_dir.exists() {
                println!("  - Data directory already exists: {}", data_dir.display());
            } else {
                println!("  - Create data directory: {}", data_dir.display());
            }

            let db_path = options.database_path();
            if db_path.exists() {
                if self.overwrite {
                    println!("  - Remove existing database: {}", db_path.display());
                    println!("  - Create new database: {}", db_path.display());
                } else {
                    println!(
                        "  - ERROR: Database already exists (use --overwrite to replace): {}",
                        db_path.display()
                    );
                }
            } else {
                println!("  - Create database: {}", db_path.display());
            }
            println!("  - Seed {cars} car spots and {bikes} bike spots");

            if self.with_config {
                let config_path = options.config_path();
                if config_path.exists() {
                    println!(
                        "  - Configuration file already exists (will not overwrite): {}",
                        config_path.display()
                    );
                } else {
                    println!("  - Create configuration file: {}", config_path.display());
                }
            }

            return Ok(());
        }

        let result = init_lot(&options)?;

        println!("Initialized parkit in: {}", result.data_dir.display());

        if result.data_dir_created {
            println!("  - Created data directory");
        }

        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }
        println!(
            "  - Seeded {} spots ({cars} car, {bikes} bike)",
            result.spots_seeded
        );

        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}
