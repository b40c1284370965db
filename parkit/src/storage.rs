//! Collaborator traits for the session flow.
//!
//! The orchestrator never talks to SQLite or the console directly. It is
//! handed implementations of these traits, which keeps the lifecycle logic
//! testable against mocks and lets several storage handles share one
//! [`Database`](crate::Database).
//!
//! Persistence refusals (a row that was not written) are reported as
//! `false`/`None`; genuine failures are reported as errors.

use std::cell::Cell;
use std::time::SystemTime;

use crate::error::Result;
use crate::{ParkingSpot, RegistrationId, SpotNumber, Ticket, TicketId, VehicleCategory};

/// Read and write access to the spot inventory.
#[cfg_attr(test, mockall::automock)]
pub trait SpotStorage {
    /// Returns the lowest-numbered free spot of the category, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn next_available_spot(&self, category: VehicleCategory) -> Result<Option<SpotNumber>>;

    /// Persists the spot's availability flag.
    ///
    /// Returns `Ok(false)` when the update was refused, for instance because
    /// another session claimed the spot first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn update_spot(&self, spot: &ParkingSpot) -> Result<bool>;
}

/// Read and write access to tickets.
#[cfg_attr(test, mockall::automock)]
pub trait TicketStorage {
    /// Saves a new open ticket, returning its identifier.
    ///
    /// Returns `Ok(None)` when the ticket was not persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn save_ticket(&self, ticket: &Ticket) -> Result<Option<TicketId>>;

    /// Fetches the open ticket of a registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn get_open_ticket(&self, registration: &RegistrationId) -> Result<Option<Ticket>>;

    /// Persists the exit time and price of a closed ticket.
    ///
    /// Returns `Ok(false)` when the ticket was not updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn update_ticket(&self, ticket: &Ticket) -> Result<bool>;

    /// Counts the completed sessions of a registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be queried.
    fn count_tickets_for(&self, registration: &RegistrationId) -> Result<u32>;
}

/// Source of the operator's answers.
#[cfg_attr(test, mockall::automock)]
pub trait OperatorInput {
    /// Reads the vehicle-type menu selection (1 for a car, 2 for a bike).
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or is not a number.
    fn read_category_selection(&mut self) -> Result<i64>;

    /// Reads the vehicle registration identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    fn read_registration_id(&mut self) -> Result<String>;
}

/// Source of the current time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// The current instant.
    fn now(&self) -> SystemTime;
}

impl<T: SpotStorage + ?Sized> SpotStorage for &T {
    fn next_available_spot(&self, category: VehicleCategory) -> Result<Option<SpotNumber>> {
        (**self).next_available_spot(category)
    }

    fn update_spot(&self, spot: &ParkingSpot) -> Result<bool> {
        (**self).update_spot(spot)
    }
}

impl<T: TicketStorage + ?Sized> TicketStorage for &T {
    fn save_ticket(&self, ticket: &Ticket) -> Result<Option<TicketId>> {
        (**self).save_ticket(ticket)
    }

    fn get_open_ticket(&self, registration: &RegistrationId) -> Result<Option<Ticket>> {
        (**self).get_open_ticket(registration)
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<bool> {
        (**self).update_ticket(ticket)
    }

    fn count_tickets_for(&self, registration: &RegistrationId) -> Result<u32> {
        (**self).count_tickets_for(registration)
    }
}

impl<T: OperatorInput + ?Sized> OperatorInput for &mut T {
    fn read_category_selection(&mut self) -> Result<i64> {
        (**self).read_category_selection()
    }

    fn read_registration_id(&mut self) -> Result<String> {
        (**self).read_registration_id()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
///
/// Useful for replaying sessions with known durations.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use parkit::storage::{Clock, ManualClock};
///
/// let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
/// clock.advance(Duration::from_secs(3600));
/// assert_eq!(clock.now(), SystemTime::UNIX_EPOCH + Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<SystemTime>,
}

impl ManualClock {
    /// Creates a clock stopped at `start`.
    #[must_use]
    pub const fn new(start: SystemTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: std::time::Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Sets the clock to an absolute instant.
    pub fn set(&self, instant: SystemTime) {
        self.now.set(instant);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}
