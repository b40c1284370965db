//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, LotConfig, RateConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use parkit::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(10), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(10));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Nested rate and lot sections: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if let Some(ref rates) = source.rates {
            Self::merge_rates(target.rates.get_or_insert_with(RateConfig::default), rates);
        }

        if let Some(ref lot) = source.lot {
            Self::merge_lot(target.lot.get_or_insert_with(LotConfig::default), lot);
        }
    }

    fn merge_rates(target: &mut RateConfig, source: &RateConfig) {
        if source.car_per_hour.is_some() {
            target.car_per_hour = source.car_per_hour;
        }
        if source.bike_per_hour.is_some() {
            target.bike_per_hour = source.bike_per_hour;
        }
    }

    fn merge_lot(target: &mut LotConfig, source: &LotConfig) {
        if source.car_spots.is_some() {
            target.car_spots = source.car_spots;
        }
        if source.bike_spots.is_some() {
            target.bike_spots = source.bike_spots;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("config-{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_empty() {
        assert_eq!(ConfigMerger::merge(vec![]), Config::default());
    }

    #[test]
    fn test_merge_none_keeps_target() {
        let mut target = Config::defaults();
        ConfigMerger::merge_into(&mut target, &Config::default());
        assert_eq!(target, Config::defaults());
    }

    #[test]
    fn test_nested_rates_merge_field_by_field() {
        let low = Config {
            rates: Some(RateConfig {
                car_per_hour: Some(2.0),
                bike_per_hour: Some(1.2),
            }),
            ..Default::default()
        };
        let high = Config {
            rates: Some(RateConfig {
                car_per_hour: None,
                bike_per_hour: Some(0.8),
            }),
            ..Default::default()
        };

        let merged = ConfigMerger::merge(vec![source(1, low), source(2, high)]);
        let rates = merged.rates.unwrap();
        assert_eq!(rates.car_per_hour, Some(2.0));
        assert_eq!(rates.bike_per_hour, Some(0.8));
    }

    #[test]
    fn test_lot_and_flags() {
        let low = Config {
            lot: Some(LotConfig {
                car_spots: Some(10),
                bike_spots: Some(5),
            }),
            disable_autoinit: Some(true),
            ..Default::default()
        };
        let high = Config {
            lot: Some(LotConfig {
                car_spots: Some(20),
                bike_spots: None,
            }),
            disable_autoinit: Some(false),
            ..Default::default()
        };

        let merged = ConfigMerger::merge(vec![source(1, low), source(2, high)]);
        assert_eq!(merged.lot_layout(), (20, 5));
        assert_eq!(merged.disable_autoinit, Some(false));
    }
}
