//! Configuration validation.
//!
//! Checks run on the merged configuration, not on individual files.

use crate::config::schema::{Config, LotConfig, RateConfig};
use crate::error::{Error, Result};

/// Largest spot count accepted per category.
pub const MAX_SPOTS_PER_CATEGORY: u32 = 10_000;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use parkit::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
/// ConfigValidator::validate(&Config::defaults()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref rates) = config.rates {
            Self::validate_rates(rates)?;
        }

        if let Some(ref lot) = config.lot {
            Self::validate_lot(lot)?;
        }

        // The effective layout must have at least one spot
        let (cars, bikes) = config.lot_layout();
        if cars == 0 && bikes == 0 {
            return Err(Error::Validation {
                field: "lot".into(),
                message: "The lot must have at least one spot".into(),
            });
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::Validation {
                field: "maximum_lock_wait_seconds".into(),
                message: "Must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_rates(rates: &RateConfig) -> Result<()> {
        Self::validate_rate("rates.car_per_hour", rates.car_per_hour)?;
        Self::validate_rate("rates.bike_per_hour", rates.bike_per_hour)
    }

    fn validate_rate(field: &str, rate: Option<f64>) -> Result<()> {
        match rate {
            Some(value) if !value.is_finite() || value <= 0.0 => Err(Error::Validation {
                field: field.into(),
                message: format!("Rate must be a finite number greater than 0, got {value}"),
            }),
            _ => Ok(()),
        }
    }

    fn validate_lot(lot: &LotConfig) -> Result<()> {
        for (field, count) in [("lot.car_spots", lot.car_spots), ("lot.bike_spots", lot.bike_spots)] {
            if let Some(count) = count {
                if count > MAX_SPOTS_PER_CATEGORY {
                    return Err(Error::Validation {
                        field: field.into(),
                        message: format!(
                            "At most {MAX_SPOTS_PER_CATEGORY} spots are supported, got {count}"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
