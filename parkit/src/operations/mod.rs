//! Lot maintenance operations.
//!
//! Session handling lives in [`crate::session`]; this module holds the
//! operations that prepare the lot itself.
//!
//! # Examples
//!
//! ```no_run
//! use parkit::operations::{init_lot, InitOptions};
//! use std::path::PathBuf;
//!
//! let result = init_lot(&InitOptions::new(PathBuf::from("/tmp/parkit"))).unwrap();
//! assert!(result.database_created);
//! ```

pub mod init;

pub use init::{ensure_inventory, init_lot, InitOptions, InitResult};
