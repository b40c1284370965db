//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the parking lot.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the parking spot inventory.
///
/// Rows are created when the lot is initialised; afterwards only the
/// `available` flag changes.
pub const CREATE_PARKING_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS parking (
        number INTEGER PRIMARY KEY NOT NULL CHECK (number > 0),
        category TEXT NOT NULL CHECK (category IN ('CAR', 'BIKE')),
        available INTEGER NOT NULL DEFAULT 1 CHECK (available IN (0, 1))
    )";

/// SQL statement to create the ticket table.
///
/// Timestamps are Unix epoch milliseconds. `price` and `out_time` stay NULL
/// while the vehicle is parked.
pub const CREATE_TICKET_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS ticket (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vehicle_reg_number TEXT NOT NULL,
        parking_number INTEGER NOT NULL REFERENCES parking(number),
        price REAL,
        in_time INTEGER NOT NULL,
        out_time INTEGER
    )";

/// SQL statement to create an index on the registration column.
///
/// This index speeds up open-ticket lookups and visit counts.
pub const CREATE_REGISTRATION_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_ticket_registration ON ticket(vehicle_reg_number)";

/// SQL statement to create the one-open-ticket-per-vehicle index.
pub const CREATE_OPEN_TICKET_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_ticket_open
    ON ticket(vehicle_reg_number)
    WHERE out_time IS NULL";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a spot unless its number is already taken.
pub const INSERT_SPOT: &str = r"
    INSERT OR IGNORE INTO parking (number, category, available)
    VALUES (?, ?, ?)
";

/// Columns selected for every ticket query, joined with the spot.
pub const TICKET_COLUMNS: &str = r"
    SELECT t.id, t.vehicle_reg_number, t.parking_number, p.category, p.available,
           t.price, t.in_time, t.out_time
    FROM ticket t
    JOIN parking p ON p.number = t.parking_number
";
