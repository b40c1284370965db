//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `PARKIT_*` environment variables that
//! override configuration file values.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Hourly car rate override.
pub const CAR_RATE_ENV: &str = "PARKIT_CAR_RATE_PER_HOUR";
/// Hourly bike rate override.
pub const BIKE_RATE_ENV: &str = "PARKIT_BIKE_RATE_PER_HOUR";
/// Car spot count override.
pub const CAR_SPOTS_ENV: &str = "PARKIT_CAR_SPOTS";
/// Bike spot count override.
pub const BIKE_SPOTS_ENV: &str = "PARKIT_BIKE_SPOTS";
/// Lock wait override, in seconds.
pub const LOCK_WAIT_ENV: &str = "PARKIT_MAXIMUM_LOCK_WAIT_SECONDS";
/// Autoinit switch.
pub const DISABLE_AUTOINIT_ENV: &str = "PARKIT_DISABLE_AUTOINIT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use parkit::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Empty variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value cannot be parsed
    /// (non-numeric rate or count, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(rate) = Self::parse_var::<f64>(CAR_RATE_ENV, "Must be a number")? {
            config.rates.get_or_insert_with(Default::default).car_per_hour = Some(rate);
        }

        if let Some(rate) = Self::parse_var::<f64>(BIKE_RATE_ENV, "Must be a number")? {
            config.rates.get_or_insert_with(Default::default).bike_per_hour = Some(rate);
        }

        if let Some(count) = Self::parse_var::<u32>(CAR_SPOTS_ENV, "Must be a non-negative integer")? {
            config.lot.get_or_insert_with(Default::default).car_spots = Some(count);
        }

        if let Some(count) = Self::parse_var::<u32>(BIKE_SPOTS_ENV, "Must be a non-negative integer")? {
            config.lot.get_or_insert_with(Default::default).bike_spots = Some(count);
        }

        if let Some(seconds) = Self::parse_var::<u64>(LOCK_WAIT_ENV, "Must be a positive integer")? {
            config.maximum_lock_wait_seconds = Some(seconds);
        }

        if let Some(val) = Self::read_var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        Ok(())
    }

    fn read_var(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    fn parse_var<T: FromStr>(name: &str, message: &str) -> Result<Option<T>> {
        Self::read_var(name)
            .map(|raw| {
                raw.trim().parse().map_err(|_| Error::Validation {
                    field: name.into(),
                    message: format!("{message} (got '{raw}')"),
                })
            })
            .transpose()
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
