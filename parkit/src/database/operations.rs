//! Database operations for spots and tickets.
//!
//! This module implements the queries behind the storage traits and the
//! read-only listings used by the operator console. Functions taking a
//! `&Connection` run inside whatever transaction the caller holds.

use std::time::{Duration, SystemTime};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::{Error, Result};
use crate::storage::{SpotStorage, TicketStorage};
use crate::{ParkingSpot, RegistrationId, SpotNumber, Ticket, TicketId, VehicleCategory};

use super::connection::Database;
use super::schema::TICKET_COLUMNS;

/// Converts a `SystemTime` to Unix epoch milliseconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch or too far in the
/// future to fit.
pub(super) fn systemtime_to_unix_millis(time: SystemTime) -> Result<i64> {
    let millis = time
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })?
        .as_millis();

    i64::try_from(millis).map_err(|_| Error::Validation {
        field: "timestamp".into(),
        message: format!("Timestamp {millis}ms is out of range"),
    })
}

/// Converts Unix epoch milliseconds from the database to a `SystemTime`.
///
/// Negative values clamp to the epoch.
pub(super) fn unix_millis_to_systemtime(millis: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_millis(u64::try_from(millis).unwrap_or(0))
}

impl FromSql for VehicleCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for VehicleCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SpotNumber {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        let raw = u32::try_from(raw).map_err(|_| FromSqlError::OutOfRange(raw))?;
        Self::try_from(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for SpotNumber {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.value())))
    }
}

fn conversion_failure<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// Helper function to deserialize a spot from a database row.
///
/// Expects row fields in this order: number, category, available
fn row_to_spot(row: &rusqlite::Row<'_>) -> rusqlite::Result<ParkingSpot> {
    Ok(ParkingSpot::new(row.get(0)?, row.get(1)?, row.get(2)?))
}

/// Helper function to deserialize a ticket from a database row.
///
/// Expects the field order of [`TICKET_COLUMNS`].
fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let id: i64 = row.get(0)?;
    let registration: String = row.get(1)?;
    let spot = ParkingSpot::new(row.get(2)?, row.get(3)?, row.get(4)?);
    let price: Option<f64> = row.get(5)?;
    let in_millis: i64 = row.get(6)?;
    let out_millis: Option<i64> = row.get(7)?;

    let registration = RegistrationId::new(registration).map_err(|e| conversion_failure(1, e))?;

    Ticket::builder(registration, spot, unix_millis_to_systemtime(in_millis))
        .id(Some(TicketId(id)))
        .exited_at(out_millis.map(unix_millis_to_systemtime))
        .price(price)
        .build()
        .map_err(|e| conversion_failure(7, e))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation
    )
}

const SELECT_NEXT_AVAILABLE: &str = r"
    SELECT MIN(number) FROM parking
    WHERE category = ? AND available = 1
";

const SELECT_SPOT: &str = "SELECT number, category, available FROM parking WHERE number = ?";

const LIST_SPOTS: &str = "SELECT number, category, available FROM parking ORDER BY number";

const CLAIM_SPOT: &str = r"
    UPDATE parking SET available = 0
    WHERE number = ? AND category = ? AND available = 1
";

const RELEASE_SPOT: &str = r"
    UPDATE parking SET available = 1
    WHERE number = ? AND category = ?
";

const INSERT_TICKET: &str = r"
    INSERT INTO ticket (vehicle_reg_number, parking_number, price, in_time, out_time)
    VALUES (?, ?, ?, ?, ?)
";

const CLOSE_TICKET: &str = r"
    UPDATE ticket SET price = ?, out_time = ?
    WHERE id = ? AND out_time IS NULL
";

const COUNT_COMPLETED: &str = r"
    SELECT COUNT(*) FROM ticket
    WHERE vehicle_reg_number = ? AND out_time IS NOT NULL
";

impl Database {
    /// Finds the lowest-numbered free spot of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_next_available_spot(
        conn: &Connection,
        category: VehicleCategory,
    ) -> Result<Option<SpotNumber>> {
        let number: Option<SpotNumber> =
            conn.query_row(SELECT_NEXT_AVAILABLE, params![category], |row| row.get(0))?;
        Ok(number)
    }

    /// Retrieves a single spot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_spot(conn: &Connection, number: SpotNumber) -> Result<Option<ParkingSpot>> {
        Ok(conn
            .query_row(SELECT_SPOT, params![number], row_to_spot)
            .optional()?)
    }

    /// Lists the whole inventory ordered by spot number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use parkit::database::{Database, DatabaseConfig};
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/parkit.db")).unwrap();
    /// for spot in Database::list_spots(db.connection()).unwrap() {
    ///     println!("{spot}: available={}", spot.is_available());
    /// }
    /// ```
    pub fn list_spots(conn: &Connection) -> Result<Vec<ParkingSpot>> {
        let mut stmt = conn.prepare(LIST_SPOTS)?;
        let spots = stmt
            .query_map([], row_to_spot)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(spots)
    }

    /// Writes a spot's availability using an existing connection or
    /// transaction.
    ///
    /// Taking a spot only succeeds while it is still free, so two sessions
    /// can never both claim it.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the row was updated
    /// - `Ok(false)` if the spot does not exist or was already taken
    pub fn update_spot_simple(conn: &Connection, spot: &ParkingSpot) -> Result<bool> {
        let sql = if spot.is_available() {
            RELEASE_SPOT
        } else {
            CLAIM_SPOT
        };
        let rows_affected = conn.execute(sql, params![spot.number(), spot.category()])?;
        Ok(rows_affected > 0)
    }

    /// Inserts a ticket using an existing connection or transaction.
    ///
    /// Returns `Ok(None)` when a constraint rejects the row, which happens
    /// when the registration already has an open ticket or the spot does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails for any other reason.
    pub fn insert_ticket_simple(conn: &Connection, ticket: &Ticket) -> Result<Option<TicketId>> {
        let in_millis = systemtime_to_unix_millis(ticket.entered_at())?;
        let out_millis = ticket
            .exited_at()
            .map(systemtime_to_unix_millis)
            .transpose()?;

        match conn.execute(
            INSERT_TICKET,
            params![
                ticket.registration().as_str(),
                ticket.spot().number(),
                ticket.price(),
                in_millis,
                out_millis,
            ],
        ) {
            Ok(_) => Ok(Some(TicketId(conn.last_insert_rowid()))),
            Err(e) if is_constraint_violation(&e) => {
                log::debug!("ticket for {} rejected: {e}", ticket.registration());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records the exit time and price of a closed ticket using an existing
    /// connection or transaction.
    ///
    /// Only a ticket that is still open in the database is updated, so a
    /// session can never be billed twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket is still open or the update fails.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the ticket was closed
    /// - `Ok(false)` if the ticket was never saved or is already closed
    pub fn close_ticket_simple(conn: &Connection, ticket: &Ticket) -> Result<bool> {
        let Some(id) = ticket.id() else {
            return Ok(false);
        };
        let Some(exited_at) = ticket.exited_at() else {
            return Err(Error::Validation {
                field: "exited_at".into(),
                message: format!("ticket {id} has no exit time"),
            });
        };

        let rows_affected = conn.execute(
            CLOSE_TICKET,
            params![ticket.price(), systemtime_to_unix_millis(exited_at)?, id.0],
        )?;
        Ok(rows_affected > 0)
    }

    /// Retrieves the open ticket of a registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_open_ticket(conn: &Connection, registration: &RegistrationId) -> Result<Option<Ticket>> {
        let sql = format!(
            "{TICKET_COLUMNS} WHERE t.vehicle_reg_number = ? AND t.out_time IS NULL \
             ORDER BY t.in_time DESC LIMIT 1"
        );
        Ok(conn
            .query_row(&sql, params![registration.as_str()], row_to_ticket)
            .optional()?)
    }

    /// Counts the completed sessions of a registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_completed_tickets(conn: &Connection, registration: &RegistrationId) -> Result<u32> {
        let count: u32 =
            conn.query_row(COUNT_COMPLETED, params![registration.as_str()], |row| row.get(0))?;
        Ok(count)
    }

    /// Lists every ticket of a registration, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn tickets_for(conn: &Connection, registration: &RegistrationId) -> Result<Vec<Ticket>> {
        let sql = format!("{TICKET_COLUMNS} WHERE t.vehicle_reg_number = ? ORDER BY t.in_time, t.id");
        let mut stmt = conn.prepare(&sql)?;
        let tickets = stmt
            .query_map(params![registration.as_str()], row_to_ticket)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(tickets)
    }

    /// Lists the tickets of every vehicle currently parked, by spot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_open_tickets(conn: &Connection) -> Result<Vec<Ticket>> {
        let sql = format!("{TICKET_COLUMNS} WHERE t.out_time IS NULL ORDER BY t.parking_number");
        let mut stmt = conn.prepare(&sql)?;
        let tickets = stmt
            .query_map([], row_to_ticket)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(tickets)
    }
}

impl SpotStorage for Database {
    fn next_available_spot(&self, category: VehicleCategory) -> Result<Option<SpotNumber>> {
        Self::find_next_available_spot(&self.conn, category)
    }

    fn update_spot(&self, spot: &ParkingSpot) -> Result<bool> {
        self.with_immediate_transaction(|tx| Self::update_spot_simple(tx, spot))
    }
}

impl TicketStorage for Database {
    fn save_ticket(&self, ticket: &Ticket) -> Result<Option<TicketId>> {
        self.with_immediate_transaction(|tx| Self::insert_ticket_simple(tx, ticket))
    }

    fn get_open_ticket(&self, registration: &RegistrationId) -> Result<Option<Ticket>> {
        Self::find_open_ticket(&self.conn, registration)
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<bool> {
        self.with_immediate_transaction(|tx| Self::close_ticket_simple(tx, ticket))
    }

    fn count_tickets_for(&self, registration: &RegistrationId) -> Result<u32> {
        Self::count_completed_tickets(&self.conn, registration)
    }
}
