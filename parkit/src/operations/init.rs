//! Lot initialization operations.
//!
//! This module creates the parkit data directory and database, seeds the
//! spot inventory and optionally writes a commented configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{DEFAULT_BIKE_SPOTS, DEFAULT_CAR_SPOTS};
use crate::config::USER_CONFIG_FILE_NAME;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};
use crate::spot::inventory_layout;

/// Options for lot initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Overwrite existing database if it exists.
    pub overwrite: bool,
    /// Create a default configuration file.
    pub create_config: bool,
    /// Number of car spots to seed.
    pub car_spots: u32,
    /// Number of bike spots to seed.
    pub bike_spots: u32,
}

impl InitOptions {
    /// Creates initialization options for the default lot layout.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            car_spots: DEFAULT_CAR_SPOTS,
            bike_spots: DEFAULT_BIKE_SPOTS,
        }
    }

    /// Sets whether to overwrite existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to create default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets the number of car and bike spots to seed.
    #[must_use]
    pub fn with_layout(mut self, car_spots: u32, bike_spots: u32) -> Self {
        self.car_spots = car_spots;
        self.bike_spots = bike_spots;
        self
    }

    /// Path of the database file this initialization targets.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    /// Path of the configuration file this initialization may write.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(USER_CONFIG_FILE_NAME)
    }
}

/// Result of initialization operation.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether a configuration file was created.
    pub config_created: bool,
    /// Number of spots inserted into the inventory.
    pub spots_seeded: usize,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

/// Default configuration template, every option commented out.
pub(crate) const DEFAULT_CONFIG_TEMPLATE: &str = r"# parkit configuration file
# Values shown are the built-in defaults.

# Hourly rates per vehicle category
# rates:
#   car_per_hour: 1.5
#   bike_per_hour: 1.0

# Lot layout used by `parkit init` (cars are numbered first, then bikes)
# lot:
#   car_spots: 3
#   bike_spots: 2

# Maximum lock wait time in seconds
# maximum_lock_wait_seconds: 5

# Refuse to create the database implicitly
# disable_autoinit: false
";

/// Initializes the parkit data directory and database.
///
/// Creates the data directory if needed, creates the database, seeds the
/// inventory with the requested layout and optionally writes a default
/// configuration file. An existing configuration file is never replaced.
///
/// # Errors
///
/// Returns an error if:
/// - The layout has no spots
/// - The data directory cannot be created
/// - Overwrite is false and the database already exists
/// - The database cannot be created or seeded
/// - The configuration file cannot be written
///
/// # Examples
///
/// ```no_run
/// use parkit::operations::init::{InitOptions, init_lot};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/parkit-test"))
///     .with_layout(10, 4)
///     .with_create_config(true);
///
/// let result = init_lot(&options).unwrap();
/// println!("Seeded {} spots", result.spots_seeded);
/// ```
pub fn init_lot(options: &InitOptions) -> Result<InitResult> {
    // Fail before touching the filesystem
    let layout = inventory_layout(options.car_spots, options.bike_spots)?;

    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        spots_seeded: 0,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.database_path();
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "Database already exists at {}. Use --overwrite to replace it.",
                    db_path.display()
                ),
            });
        }
        remove_database_files(&db_path)?;
    }

    let mut db = Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    result.spots_seeded = db.seed_inventory(&layout)?;
    log::info!(
        "initialized lot at {} with {} spots",
        options.data_dir.display(),
        result.spots_seeded
    );

    if options.create_config {
        let config_path = options.config_path();
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

/// Seeds the inventory of an existing database if it has no spots yet.
///
/// Used when a database is created implicitly on first use. Returns the
/// number of spots inserted, which is 0 when the lot already has spots.
///
/// # Errors
///
/// Returns an error if the layout is empty or the database cannot be
/// queried or written.
pub fn ensure_inventory(db: &mut Database, car_spots: u32, bike_spots: u32) -> Result<usize> {
    if !Database::list_spots(db.connection())?.is_empty() {
        return Ok(0);
    }
    let seeded = db.seed_inventory(&inventory_layout(car_spots, bike_spots)?)?;
    log::info!("seeded empty lot with {seeded} spots");
    Ok(seeded)
}

// WAL mode leaves sidecar files next to the database
fn remove_database_files(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = PathBuf::from(sidecar);
        if sidecar.exists() {
            fs::remove_file(sidecar)?;
        }
    }
    Ok(())
}
