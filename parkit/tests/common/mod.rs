//! Common test utilities for integration tests.

use std::collections::VecDeque;
use std::path::Path;

use parkit::database::{Database, DatabaseConfig};
use parkit::spot::inventory_layout;
use parkit::storage::OperatorInput;
use parkit::{Error, Result};

/// Creates a temporary database seeded with `cars` car spots and `bikes`
/// bike spots.
///
/// The temporary directory lives for the rest of the test process.
#[allow(dead_code)]
pub fn create_lot(cars: u32, bikes: u32) -> Database {
    let dir = tempfile::tempdir().unwrap();
    let db = open_lot(&dir.path().join("parkit.db"), cars, bikes);

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Opens (creating if needed) a database at `path` and seeds its inventory.
#[allow(dead_code)]
pub fn open_lot(path: &Path, cars: u32, bikes: u32) -> Database {
    let mut db = Database::open(DatabaseConfig::new(path)).unwrap();
    db.seed_inventory(&inventory_layout(cars, bikes).unwrap())
        .unwrap();
    db
}

/// Operator input that replays a fixed script.
///
/// Each entry consumes one selection and one registration; each exit
/// consumes one registration. Running out of script is an error.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    selections: VecDeque<i64>,
    registrations: VecDeque<String>,
}

#[allow(dead_code)]
impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an arrival.
    pub fn arrive(mut self, selection: i64, registration: &str) -> Self {
        self.selections.push_back(selection);
        self.registrations.push_back(registration.to_string());
        self
    }

    /// Queues a departure.
    pub fn depart(mut self, registration: &str) -> Self {
        self.registrations.push_back(registration.to_string());
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.selections.is_empty() && self.registrations.is_empty()
    }
}

impl OperatorInput for ScriptedInput {
    fn read_category_selection(&mut self) -> Result<i64> {
        self.selections.pop_front().ok_or_else(|| Error::Validation {
            field: "selection".into(),
            message: "script exhausted".into(),
        })
    }

    fn read_registration_id(&mut self) -> Result<String> {
        self.registrations.pop_front().ok_or_else(|| Error::Validation {
            field: "registration".into(),
            message: "script exhausted".into(),
        })
    }
}
