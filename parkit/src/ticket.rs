//! Ticket types for tracking parking sessions.
//!
//! A ticket is issued when a vehicle enters and closed when it leaves. Closed
//! tickets are never deleted by the session flow; together they form the
//! visit history that loyalty status is derived from.

use std::fmt;
use std::time::SystemTime;

use crate::ParkingSpot;

/// Maximum accepted length of a registration identifier.
pub const MAX_REGISTRATION_LEN: usize = 32;

/// A vehicle registration identifier (licence plate).
///
/// Identifiers are trimmed and must be non-empty.
///
/// # Examples
///
/// ```
/// use parkit::RegistrationId;
///
/// let id = RegistrationId::new("  ABCDEF ").unwrap();
/// assert_eq!(id.as_str(), "ABCDEF");
///
/// assert!(RegistrationId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Creates a registration identifier from operator input.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty after trimming, longer than
    /// [`MAX_REGISTRATION_LEN`] characters, or contains control characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(ValidationError {
                field: "registration".into(),
                message: "registration must be non-empty after trimming whitespace".into(),
            });
        }

        if trimmed.chars().count() > MAX_REGISTRATION_LEN {
            return Err(ValidationError {
                field: "registration".into(),
                message: format!("registration cannot exceed {MAX_REGISTRATION_LEN} characters"),
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError {
                field: "registration".into(),
                message: "registration cannot contain control characters".into(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage identifier of a saved ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub i64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One parking session.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use parkit::{ParkingSpot, RegistrationId, SpotNumber, Ticket, VehicleCategory};
///
/// let spot = ParkingSpot::new(SpotNumber::try_from(1).unwrap(), VehicleCategory::Car, false);
/// let entered = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
/// let ticket = Ticket::open(RegistrationId::new("ABCDEF").unwrap(), spot, entered);
/// assert!(ticket.is_open());
///
/// let closed = ticket.close(entered + Duration::from_secs(3600), 1.5).unwrap();
/// assert!(!closed.is_open());
/// assert_eq!(closed.price(), Some(1.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    id: Option<TicketId>,
    registration: RegistrationId,
    spot: ParkingSpot,
    entered_at: SystemTime,
    exited_at: Option<SystemTime>,
    price: Option<f64>,
}

impl Ticket {
    /// Issues a new, unsaved ticket for a vehicle entering now.
    #[must_use]
    pub const fn open(registration: RegistrationId, spot: ParkingSpot, entered_at: SystemTime) -> Self {
        Self {
            id: None,
            registration,
            spot,
            entered_at,
            exited_at: None,
            price: None,
        }
    }

    /// Creates a ticket builder, used when rehydrating stored tickets.
    #[must_use]
    pub const fn builder(
        registration: RegistrationId,
        spot: ParkingSpot,
        entered_at: SystemTime,
    ) -> TicketBuilder {
        TicketBuilder {
            id: None,
            registration,
            spot,
            entered_at,
            exited_at: None,
            price: None,
        }
    }

    /// Storage identifier, if the ticket has been saved.
    #[must_use]
    pub const fn id(&self) -> Option<TicketId> {
        self.id
    }

    /// The vehicle this ticket belongs to.
    #[must_use]
    pub const fn registration(&self) -> &RegistrationId {
        &self.registration
    }

    /// The spot assigned at entry.
    #[must_use]
    pub const fn spot(&self) -> ParkingSpot {
        self.spot
    }

    /// Entry timestamp.
    #[must_use]
    pub const fn entered_at(&self) -> SystemTime {
        self.entered_at
    }

    /// Exit timestamp; `None` while the vehicle is parked.
    #[must_use]
    pub const fn exited_at(&self) -> Option<SystemTime> {
        self.exited_at
    }

    /// Billed price; `None` while the vehicle is parked.
    #[must_use]
    pub const fn price(&self) -> Option<f64> {
        self.price
    }

    /// Whether the session is still in progress.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }

    /// Returns this ticket tagged with its storage identifier.
    #[must_use]
    pub fn with_id(self, id: TicketId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Returns the closed form of this ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket is already closed, if `exited_at`
    /// precedes the entry time, or if `price` is negative or not finite.
    pub fn close(self, exited_at: SystemTime, price: f64) -> Result<Self, ValidationError> {
        if !self.is_open() {
            return Err(ValidationError {
                field: "exited_at".into(),
                message: format!("ticket for {} is already closed", self.registration),
            });
        }

        Self::builder(self.registration, self.spot, self.entered_at)
            .id(self.id)
            .exited_at(Some(exited_at))
            .price(Some(price))
            .build()
    }
}

/// Builder for creating `Ticket` instances with validation.
#[derive(Debug)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    registration: RegistrationId,
    spot: ParkingSpot,
    entered_at: SystemTime,
    exited_at: Option<SystemTime>,
    price: Option<f64>,
}

impl TicketBuilder {
    /// Sets the storage identifier.
    #[must_use]
    pub const fn id(mut self, id: Option<TicketId>) -> Self {
        self.id = id;
        self
    }

    /// Sets the exit timestamp.
    #[must_use]
    pub const fn exited_at(mut self, exited_at: Option<SystemTime>) -> Self {
        self.exited_at = exited_at;
        self
    }

    /// Sets the billed price.
    #[must_use]
    pub const fn price(mut self, price: Option<f64>) -> Self {
        self.price = price;
        self
    }

    /// Builds the ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the exit time precedes the entry time, or the
    /// price is negative or not finite.
    pub fn build(self) -> Result<Ticket, ValidationError> {
        if let Some(exited_at) = self.exited_at {
            if exited_at < self.entered_at {
                return Err(ValidationError {
                    field: "exited_at".into(),
                    message: "exit time must not precede entry time".into(),
                });
            }
        }

        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(ValidationError {
                    field: "price".into(),
                    message: format!("price must be a non-negative amount, got {price}"),
                });
            }
        }

        Ok(Ticket {
            id: self.id,
            registration: self.registration,
            spot: self.spot,
            entered_at: self.entered_at,
            exited_at: self.exited_at,
            price: self.price,
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
