//! Vehicle categories.
//!
//! The lot serves exactly two kinds of vehicle. The category decides which
//! spots a vehicle may use and which hourly rate it is billed at.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The kind of vehicle entering the lot.
///
/// # Examples
///
/// ```
/// use parkit::VehicleCategory;
///
/// let car = VehicleCategory::from_selection(1).unwrap();
/// assert_eq!(car, VehicleCategory::Car);
/// assert_eq!(car.to_string(), "CAR");
///
/// assert!(VehicleCategory::from_selection(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleCategory {
    /// A car.
    Car,
    /// A bike (motorcycle).
    Bike,
}

impl VehicleCategory {
    /// Every category, in selection-code order.
    pub const ALL: [Self; 2] = [Self::Car, Self::Bike];

    /// Maps the operator's menu selection to a category.
    ///
    /// The console menu offers `1` for a car and `2` for a bike.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelection`] for any other code.
    pub fn from_selection(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Self::Car),
            2 => Ok(Self::Bike),
            other => Err(Error::InvalidSelection { value: other }),
        }
    }

    /// The menu code the operator types for this category.
    #[must_use]
    pub const fn selection_code(self) -> i64 {
        match self {
            Self::Car => 1,
            Self::Bike => 2,
        }
    }

    /// The canonical storage name (`CAR` or `BIKE`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Bike => "BIKE",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = Error;

    /// Parses a category name, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAR" => Ok(Self::Car),
            "BIKE" => Ok(Self::Bike),
            _ => Err(Error::UnknownCategory {
                value: s.to_string(),
            }),
        }
    }
}
