//! Error types for the parkit library.
//!
//! This module provides the error hierarchy for all operations in the
//! parkit library, using `thiserror` for ergonomic error handling.
//!
//! Expected outcomes such as "no free spot" or "no open ticket" are not
//! errors; they are reported through the outcome types in
//! [`crate::session`].

use thiserror::Error;

/// Result type alias for operations that may fail with a parkit error.
///
/// # Examples
///
/// ```
/// use parkit::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(1)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the parkit library.
#[derive(Debug, Error)]
pub enum Error {
    /// The exit time of a session is missing or precedes its entry time.
    #[error("out time provided is incorrect: {exit}")]
    InvalidExitTime {
        /// The offending exit time, rendered for diagnostics.
        exit: String,
    },

    /// A vehicle category could not be determined.
    #[error("unknown vehicle category: {value}")]
    UnknownCategory {
        /// The unrecognised category value.
        value: String,
    },

    /// The operator entered a vehicle-type selection other than 1 or 2.
    #[error("invalid vehicle type selection {value}: the value entered is invalid")]
    InvalidSelection {
        /// The selection code that was entered.
        value: i64,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration document could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration file on disk is not valid YAML for the schema.
    #[error("invalid configuration file {}: {source}", path.display())]
    ConfigFile {
        /// The file that failed to parse.
        path: std::path::PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::spot::InvalidSpotNumberError> for Error {
    fn from(err: crate::spot::InvalidSpotNumberError) -> Self {
        Self::Validation {
            field: "spot_number".into(),
            message: err.to_string(),
        }
    }
}

impl From<crate::ticket::ValidationError> for Error {
    fn from(err: crate::ticket::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the error was caused by bad operator or caller input.
    ///
    /// # Examples
    ///
    /// ```
    /// use parkit::Error;
    ///
    /// let err = Error::InvalidSelection { value: 3 };
    /// assert!(err.is_invalid_input());
    /// ```
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidExitTime { .. }
                | Self::UnknownCategory { .. }
                | Self::InvalidSelection { .. }
                | Self::Validation { .. }
        )
    }

    /// Check if the error means the database stayed locked for the whole
    /// busy timeout.
    #[must_use]
    pub fn is_lock_timeout(&self) -> bool {
        matches!(
            self,
            Self::Database(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::DatabaseBusy)
        )
    }
}
