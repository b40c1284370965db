//! Fare computation.
//!
//! Prices are derived from the time between entry and exit, the hourly rate
//! of the vehicle category and the driver's loyalty status. Computation is
//! pure: nothing here touches storage.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{Ticket, VehicleCategory};

/// Default hourly rate for cars.
pub const CAR_RATE_PER_HOUR: f64 = 1.5;

/// Default hourly rate for bikes.
pub const BIKE_RATE_PER_HOUR: f64 = 1.0;

/// Sessions strictly shorter than this many hours are free.
pub const GRACE_PERIOD_HOURS: f64 = 0.5;

/// Multiplier applied to the price of a loyal customer.
pub const LOYALTY_DISCOUNT_FACTOR: f64 = 0.95;

/// Completed visits a registration needs before it counts as loyal.
pub const LOYALTY_MIN_PRIOR_VISITS: u32 = 2;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Returns whether a driver with this many completed visits gets the
/// loyalty discount.
///
/// # Examples
///
/// ```
/// use parkit::fare::is_loyal;
///
/// assert!(!is_loyal(1));
/// assert!(is_loyal(2));
/// ```
#[must_use]
pub const fn is_loyal(prior_completed_visits: u32) -> bool {
    prior_completed_visits >= LOYALTY_MIN_PRIOR_VISITS
}

/// Hourly rates per vehicle category.
///
/// # Examples
///
/// ```
/// use parkit::{RateTable, VehicleCategory};
///
/// let rates = RateTable::default();
/// assert_eq!(rates.rate_for(VehicleCategory::Car), 1.5);
/// assert_eq!(rates.rate_for(VehicleCategory::Bike), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    car_per_hour: f64,
    bike_per_hour: f64,
}

impl RateTable {
    /// Creates a rate table.
    #[must_use]
    pub const fn new(car_per_hour: f64, bike_per_hour: f64) -> Self {
        Self {
            car_per_hour,
            bike_per_hour,
        }
    }

    /// The hourly rate for cars.
    #[must_use]
    pub const fn car_per_hour(&self) -> f64 {
        self.car_per_hour
    }

    /// The hourly rate for bikes.
    #[must_use]
    pub const fn bike_per_hour(&self) -> f64 {
        self.bike_per_hour
    }

    /// The hourly rate for a category.
    #[must_use]
    pub const fn rate_for(&self, category: VehicleCategory) -> f64 {
        match category {
            VehicleCategory::Car => self.car_per_hour,
            VehicleCategory::Bike => self.bike_per_hour,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(CAR_RATE_PER_HOUR, BIKE_RATE_PER_HOUR)
    }
}

/// Computes parking fares from a [`RateTable`].
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use parkit::{FareCalculator, VehicleCategory};
///
/// let calculator = FareCalculator::default();
/// let entry = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
/// let exit = entry + Duration::from_secs(45 * 60);
///
/// let price = calculator
///     .compute_fare(entry, Some(exit), Some(VehicleCategory::Car), false)
///     .unwrap();
/// assert!((price - 1.125).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FareCalculator {
    rates: RateTable,
}

impl FareCalculator {
    /// Creates a calculator billing at the given rates.
    #[must_use]
    pub const fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    /// The rates this calculator bills at.
    #[must_use]
    pub const fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Computes the price of a session.
    ///
    /// Sessions shorter than [`GRACE_PERIOD_HOURS`] cost nothing, whatever
    /// the category. Longer sessions are billed linearly at the category's
    /// hourly rate, then multiplied by [`LOYALTY_DISCOUNT_FACTOR`] when
    /// `loyal` is set. No rounding is applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExitTime`] if `exit` is absent or precedes
    /// `entry`, and [`Error::UnknownCategory`] if `category` is absent for a
    /// billable session.
    pub fn compute_fare(
        &self,
        entry: SystemTime,
        exit: Option<SystemTime>,
        category: Option<VehicleCategory>,
        loyal: bool,
    ) -> Result<f64> {
        let Some(exit) = exit else {
            return Err(Error::InvalidExitTime {
                exit: "none".into(),
            });
        };

        let elapsed = exit
            .duration_since(entry)
            .map_err(|_| Error::InvalidExitTime {
                exit: format_instant(exit),
            })?;

        #[allow(clippy::cast_precision_loss)]
        let hours = elapsed.as_millis() as f64 / MILLIS_PER_HOUR;

        if hours < GRACE_PERIOD_HOURS {
            return Ok(0.0);
        }

        let category = category.ok_or_else(|| Error::UnknownCategory {
            value: "none".into(),
        })?;

        let base = hours * self.rates.rate_for(category);
        Ok(if loyal {
            base * LOYALTY_DISCOUNT_FACTOR
        } else {
            base
        })
    }

    /// Bills an open ticket and returns its closed form.
    ///
    /// The category is taken from the ticket's spot.
    ///
    /// # Errors
    ///
    /// Returns an error if the fare cannot be computed (see
    /// [`compute_fare`](Self::compute_fare)) or the ticket is already closed.
    pub fn close_ticket(&self, ticket: Ticket, exit: SystemTime, loyal: bool) -> Result<Ticket> {
        let price = self.compute_fare(
            ticket.entered_at(),
            Some(exit),
            Some(ticket.spot().category()),
            loyal,
        )?;
        Ok(ticket.close(exit, price)?)
    }
}

fn format_instant(instant: SystemTime) -> String {
    DateTime::<Utc>::from(instant).to_rfc3339_opts(SecondsFormat::Millis, true)
}
