//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::spot::inventory_layout;
use crate::{ParkingSpot, SpotNumber, VehicleCategory};

/// Creates a temporary test database with an empty inventory.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Creates a temporary test database holding the default lot: car spots
/// 1 to 3 and bike spots 4 and 5, all free.
///
/// # Panics
///
/// Panics if the database cannot be created or seeded.
#[must_use]
pub fn create_seeded_database() -> Database {
    let mut db = create_test_database();
    db.seed_inventory(&inventory_layout(3, 2).unwrap()).unwrap();
    db
}

/// Shorthand for building a spot in tests.
///
/// # Panics
///
/// Panics if `number` is 0.
#[must_use]
pub fn spot(number: u32, category: VehicleCategory, available: bool) -> ParkingSpot {
    ParkingSpot::new(SpotNumber::try_from(number).unwrap(), category, available)
}
