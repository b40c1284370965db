//! Transaction management utilities.
//!
//! Every write runs in an IMMEDIATE transaction so that concurrent processes
//! sharing the database file serialize on the write lock up front instead of
//! failing at commit.

use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::error::Result;
use crate::ParkingSpot;

use super::connection::Database;
use super::schema::INSERT_SPOT;

/// What [`Database::reset_sessions`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    /// Number of tickets deleted.
    pub tickets_deleted: usize,
    /// Number of spots that were taken and are now free.
    pub spots_released: usize,
}

impl Database {
    /// Runs `f` inside an IMMEDIATE transaction on a shared reference.
    ///
    /// The transaction commits when `f` succeeds and rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or an error if the transaction cannot be
    /// started or committed.
    pub fn with_immediate_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Adds spots to the inventory in a single transaction.
    ///
    /// Spots whose number already exists are left untouched, so seeding is
    /// idempotent. Returns the number of spots actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transaction cannot be started
    /// - Any insert fails
    /// - The transaction cannot be committed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use parkit::database::{Database, DatabaseConfig};
    /// use parkit::spot::inventory_layout;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/parkit.db")).unwrap();
    /// let inserted = db.seed_inventory(&inventory_layout(3, 2).unwrap()).unwrap();
    /// println!("Added {inserted} spots");
    /// ```
    pub fn seed_inventory(&mut self, spots: &[ParkingSpot]) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(INSERT_SPOT)?;
            for spot in spots {
                inserted += stmt.execute(params![
                    spot.number(),
                    spot.category(),
                    spot.is_available()
                ])?;
            }
        }

        tx.commit()?;
        log::debug!("seeded {inserted} of {} spots", spots.len());
        Ok(inserted)
    }

    /// Deletes every ticket and marks every spot available.
    ///
    /// This returns the lot to its freshly initialised state while keeping
    /// the inventory. Ticket numbering restarts from 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started, any statement
    /// fails, or the transaction cannot be committed.
    pub fn reset_sessions(&mut self) -> Result<ResetSummary> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let tickets_deleted = tx.execute("DELETE FROM ticket", [])?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'ticket'", [])?;
        let spots_released = tx.execute("UPDATE parking SET available = 1 WHERE available = 0", [])?;

        tx.commit()?;
        log::info!("reset removed {tickets_deleted} tickets and released {spots_released} spots");
        Ok(ResetSummary {
            tickets_deleted,
            spots_released,
        })
    }
}
