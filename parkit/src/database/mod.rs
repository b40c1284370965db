//! Database layer for persistent storage of spots and tickets.
//!
//! This module provides a SQLite-based storage layer for the lot, including
//! connection management, schema versioning, inventory seeding and the
//! implementations of [`SpotStorage`](crate::storage::SpotStorage) and
//! [`TicketStorage`](crate::storage::TicketStorage).
//!
//! # Examples
//!
//! ```no_run
//! use parkit::database::{Database, DatabaseConfig};
//! use parkit::spot::inventory_layout;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/parkit.db")).unwrap();
//! db.seed_inventory(&inventory_layout(3, 2).unwrap()).unwrap();
//!
//! for spot in Database::list_spots(db.connection()).unwrap() {
//!     println!("{spot}");
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use transaction::ResetSummary;
