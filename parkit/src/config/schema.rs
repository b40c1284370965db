//! Configuration schema definitions.
//!
//! This module defines the configuration structure for parkit: hourly rates,
//! the lot layout used when seeding a new database, and a few operational
//! switches.

use serde::{Deserialize, Serialize};

use crate::fare::{RateTable, BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR};

/// Number of car spots in a freshly initialised lot.
pub const DEFAULT_CAR_SPOTS: u32 = 3;

/// Number of bike spots in a freshly initialised lot.
pub const DEFAULT_BIKE_SPOTS: u32 = 2;

/// Default lock wait, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// Every field is optional so that configurations from several sources can
/// be layered on top of each other.
///
/// # Examples
///
/// ```
/// use parkit::config::{Config, RateConfig};
///
/// let config = Config {
///     rates: Some(RateConfig {
///         car_per_hour: Some(2.0),
///         bike_per_hour: None,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.rate_table().car_per_hour(), 2.0);
/// assert_eq!(config.rate_table().bike_per_hour(), 1.0);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Hourly rates per vehicle category.
    pub rates: Option<RateConfig>,

    /// Lot layout used when seeding the inventory.
    pub lot: Option<LotConfig>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,
}

/// Hourly rate overrides.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RateConfig {
    /// Price of one hour for a car.
    pub car_per_hour: Option<f64>,

    /// Price of one hour for a bike.
    pub bike_per_hour: Option<f64>,
}

/// Lot layout.
///
/// Car spots are numbered first, starting at 1, followed by bike spots.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LotConfig {
    /// Number of car spots.
    pub car_spots: Option<u32>,

    /// Number of bike spots.
    pub bike_spots: Option<u32>,
}

impl Config {
    /// Built-in defaults, the lowest layer of every merged configuration.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            rates: Some(RateConfig {
                car_per_hour: Some(CAR_RATE_PER_HOUR),
                bike_per_hour: Some(BIKE_RATE_PER_HOUR),
            }),
            lot: Some(LotConfig {
                car_spots: Some(DEFAULT_CAR_SPOTS),
                bike_spots: Some(DEFAULT_BIKE_SPOTS),
            }),
            maximum_lock_wait_seconds: Some(DEFAULT_LOCK_WAIT_SECONDS),
            disable_autoinit: Some(false),
        }
    }

    /// The rate table described by this configuration, falling back to the
    /// built-in rates for unset fields.
    #[must_use]
    pub fn rate_table(&self) -> RateTable {
        let rates = self.rates.unwrap_or_default();
        RateTable::new(
            rates.car_per_hour.unwrap_or(CAR_RATE_PER_HOUR),
            rates.bike_per_hour.unwrap_or(BIKE_RATE_PER_HOUR),
        )
    }

    /// Car and bike spot counts, falling back to the default layout.
    #[must_use]
    pub fn lot_layout(&self) -> (u32, u32) {
        let lot = self.lot.unwrap_or_default();
        (
            lot.car_spots.unwrap_or(DEFAULT_CAR_SPOTS),
            lot.bike_spots.unwrap_or(DEFAULT_BIKE_SPOTS),
        )
    }

    /// Lock wait in seconds.
    #[must_use]
    pub fn lock_wait_seconds(&self) -> u64 {
        self.maximum_lock_wait_seconds
            .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS)
    }

    /// Whether automatic initialization is disabled.
    #[must_use]
    pub fn autoinit_disabled(&self) -> bool {
        self.disable_autoinit.unwrap_or(false)
    }
}
