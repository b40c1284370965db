#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # parkit
//!
//! A library for running a small parking lot: allocating spots, issuing
//! tickets and billing departures.
//!
//! ## Core Types
//!
//! - [`VehicleCategory`], [`SpotNumber`] and [`ParkingSpot`]: The inventory
//! - [`RegistrationId`] and [`Ticket`]: One parking session
//! - [`FareCalculator`] and [`RateTable`]: Pricing, with a grace period and
//!   a loyalty discount
//! - [`SpotAllocator`]: Picks the next free spot for a category
//! - [`SessionOrchestrator`]: Drives entry and exit against injected storage
//! - [`Database`]: The `SQLite` storage behind the command-line tool
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use std::time::{Duration, SystemTime};
//! use parkit::{FareCalculator, VehicleCategory};
//!
//! let fares = FareCalculator::default();
//! let entry = SystemTime::UNIX_EPOCH;
//! let exit = entry + Duration::from_secs(2 * 3600);
//!
//! let price = fares
//!     .compute_fare(entry, Some(exit), Some(VehicleCategory::Car), false)
//!     .unwrap();
//! assert_eq!(price, 3.0);
//! ```

pub mod allocator;
pub mod config;
pub mod database;
pub mod error;
pub mod fare;
pub mod logging;
pub mod operations;
pub mod session;
pub mod spot;
pub mod storage;
pub mod ticket;
pub mod vehicle;

// Re-export key types at crate root for convenience
pub use allocator::{SpotAllocator, SpotClaim};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use fare::{FareCalculator, RateTable};
pub use logging::{init_logger, LogLevel, Logger};
pub use session::{EntryOutcome, ExitOutcome, SessionOrchestrator};
pub use spot::{ParkingSpot, SpotNumber};
pub use ticket::{RegistrationId, Ticket, TicketId};
pub use vehicle::VehicleCategory;
