//! Configuration system for parkit.
//!
//! This module provides layered configuration with support for:
//! - YAML configuration files (the user config and an explicit file)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`PARKIT_*`)
//! 3. Explicit file (via `ConfigBuilder::with_config_file`)
//! 4. User config (`<data_dir>/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use parkit::config::ConfigBuilder;
//! use parkit::FareCalculator;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let fares = FareCalculator::new(config.rate_table());
//! let (cars, bikes) = config.lot_layout();
//! println!("{cars} car spots, {bikes} bike spots");
//! # let _ = fares;
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, USER_CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{Config, LotConfig, RateConfig};
pub use validator::ConfigValidator;
