//! Parking spot types.
//!
//! A spot is a numbered location restricted to one vehicle category. The
//! inventory is created once when the lot is initialised; afterwards only
//! the availability flag changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::VehicleCategory;

/// A valid spot number (1 and above).
///
/// # Examples
///
/// ```
/// use parkit::SpotNumber;
///
/// let number = SpotNumber::try_from(4).unwrap();
/// assert_eq!(number.value(), 4);
///
/// assert!(SpotNumber::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotNumber(u32);

impl SpotNumber {
    /// Returns the underlying spot number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SpotNumber {
    type Error = InvalidSpotNumberError;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidSpotNumberError { value })
        } else {
            Ok(Self(value))
        }
    }
}

impl fmt::Display for SpotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for invalid spot numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSpotNumberError {
    /// The rejected value.
    pub value: u32,
}

impl fmt::Display for InvalidSpotNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid spot number {}: spots are numbered from 1", self.value)
    }
}

impl std::error::Error for InvalidSpotNumberError {}

/// A single parking spot and its current availability.
///
/// # Examples
///
/// ```
/// use parkit::{ParkingSpot, SpotNumber, VehicleCategory};
///
/// let spot = ParkingSpot::new(SpotNumber::try_from(1).unwrap(), VehicleCategory::Car, true);
/// let taken = spot.with_availability(false);
///
/// assert!(spot.is_available());
/// assert!(!taken.is_available());
/// assert_eq!(taken.number(), spot.number());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    number: SpotNumber,
    category: VehicleCategory,
    available: bool,
}

impl ParkingSpot {
    /// Creates a spot description.
    #[must_use]
    pub const fn new(number: SpotNumber, category: VehicleCategory, available: bool) -> Self {
        Self {
            number,
            category,
            available,
        }
    }

    /// The spot number.
    #[must_use]
    pub const fn number(&self) -> SpotNumber {
        self.number
    }

    /// The vehicle category this spot is reserved for.
    #[must_use]
    pub const fn category(&self) -> VehicleCategory {
        self.category
    }

    /// Whether the spot is currently free.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Returns a copy of this spot with the given availability.
    #[must_use]
    pub const fn with_availability(self, available: bool) -> Self {
        Self { available, ..self }
    }
}

impl fmt::Display for ParkingSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spot {} ({})", self.number, self.category)
    }
}

/// Lays out a lot with the given number of spots per category.
///
/// Car spots are numbered first, starting at 1, followed by bike spots.
/// Every spot starts out free.
///
/// # Errors
///
/// Returns a validation error if the lot would have no spots at all or the
/// numbering would overflow.
///
/// # Examples
///
/// ```
/// use parkit::spot::inventory_layout;
/// use parkit::VehicleCategory;
///
/// let spots = inventory_layout(3, 2).unwrap();
/// assert_eq!(spots.len(), 5);
/// assert_eq!(spots[3].number().value(), 4);
/// assert_eq!(spots[3].category(), VehicleCategory::Bike);
/// ```
pub fn inventory_layout(car_spots: u32, bike_spots: u32) -> Result<Vec<ParkingSpot>> {
    let total = car_spots.checked_add(bike_spots).ok_or_else(|| Error::Validation {
        field: "lot".into(),
        message: "too many spots".into(),
    })?;
    if total == 0 {
        return Err(Error::Validation {
            field: "lot".into(),
            message: "the lot must have at least one spot".into(),
        });
    }

    (1..=total)
        .map(|number| {
            let category = if number <= car_spots {
                VehicleCategory::Car
            } else {
                VehicleCategory::Bike
            };
            Ok(ParkingSpot::new(SpotNumber::try_from(number)?, category, true))
        })
        .collect()
}
