//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, and output formatting.

use crate::error::CliError;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use parkit::database::{default_data_dir, DATABASE_FILE_NAME};
use parkit::operations::ensure_inventory;
use parkit::{Config, ConfigBuilder, Database, DatabaseConfig};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    #[allow(dead_code)]
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Additional configuration file.
    pub config_file: Option<PathBuf>,
}

/// Resolve the data directory: `--data-dir` (or `PARKIT_DATA_DIR`, which
/// clap folds into the same flag), otherwise `~/.parkit`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.clone());
    }
    default_data_dir().map_err(|_| CliError::Config("Could not determine home directory".into()))
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. The `--config` file
/// 3. `config.yaml` in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new().with_data_dir(resolve_data_dir(global)?);
    if let Some(ref file) = global.config_file {
        builder = builder.with_config_file(file);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Open the lot database, creating and seeding it when needed.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled, either by flag or by configuration.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && (global.disable_autoinit || config.autoinit_disabled()) {
        return Err(CliError::NoDataDirectory);
    }

    let timeout_seconds = global
        .busy_timeout
        .map_or_else(|| config.lock_wait_seconds(), u64::from);
    let db_config =
        DatabaseConfig::new(db_path).with_busy_timeout(Duration::from_secs(timeout_seconds));

    let mut db = Database::open(db_config)?;

    let (cars, bikes) = config.lot_layout();
    ensure_inventory(&mut db, cars, bikes)?;

    Ok(db)
}

/// Format a timestamp for display, in local time.
pub fn format_timestamp(ts: SystemTime) -> String {
    use chrono::{DateTime, Local};
    let dt: DateTime<Local> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_timestamp() {
        use std::time::UNIX_EPOCH;
        // 2024-01-15 10:30:45 UTC; stays on the same day in every timezone
        // between UTC-10 and UTC+13
        let st = UNIX_EPOCH + Duration::from_secs(1_705_315_845);
        let formatted = format_timestamp(st);
        assert!(formatted.starts_with("2024-01-15"));
        assert_eq!(formatted.len(), "2024-01-15 10:30:45".len());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1.426), "1.43");
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(3.0), "3.00");
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let global = GlobalOptions {
            data_dir: Some(PathBuf::from("/srv/lot")),
            ..Default::default()
        };
        assert_eq!(resolve_data_dir(&global).unwrap(), PathBuf::from("/srv/lot"));
    }

    #[test]
    fn test_autoinit_disabled_without_database() {
        let dir = tempdir().unwrap();
        let global = GlobalOptions {
            data_dir: Some(dir.path().to_path_buf()),
            disable_autoinit: true,
            ..Default::default()
        };

        let result = open_database(&global, &Config::defaults());
        assert!(matches!(result, Err(CliError::NoDataDirectory)));
        assert!(!dir.path().join(DATABASE_FILE_NAME).exists());
    }

    #[test]
    fn test_open_database_seeds_layout() {
        let dir = tempdir().unwrap();
        let global = GlobalOptions {
            data_dir: Some(dir.path().join("lot")),
            ..Default::default()
        };

        let db = open_database(&global, &Config::defaults()).unwrap();
        assert_eq!(Database::list_spots(db.connection()).unwrap().len(), 5);
    }
}
