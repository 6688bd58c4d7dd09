//! Custom error types for the application.
//!
//! This module defines the primary error type, `LoggerError`, for the entire crate.
//! Using the `thiserror` crate, it provides a centralized and consistent way to handle
//! the different kinds of errors that can occur while logging sensor readings.
//!
//! ## Error Hierarchy
//!
//! Three variants describe the recoverable failures of the reading loop:
//!
//! - **`Load`**: the day file could not be read or decoded at startup. The session
//!   starts from an empty buffer instead.
//! - **`Parse`**: one input line was not a valid reading. The line is dropped.
//! - **`Persist`**: the day file could not be written. The in-memory buffer is kept
//!   and the next successful write carries everything accumulated so far.
//!
//! The remaining variants cover the outer surfaces (opening the serial device,
//! configuration, export, feature gates). Opening the input stream is the only
//! failure that stops a logging session.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the sensor logger.
#[derive(Error, Debug)]
pub enum LoggerError {
    /// Startup read or decode of the persisted day file failed.
    #[error("Failed to load readings from '{}': {reason}", .path.display())]
    Load {
        /// Day file that was being loaded.
        path: PathBuf,
        /// Underlying read or decode failure.
        reason: String,
    },

    /// A raw input line did not decode into a reading.
    #[error("Failed to parse reading: {0}")]
    Parse(#[source] serde_json::Error),

    /// Writing the day file failed.
    #[error("Failed to persist readings to '{}': {source}", .path.display())]
    Persist {
        /// Day file that was being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Encoding the buffer as JSON failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The serial device could not be opened or configured.
    #[error("Failed to open serial port '{port}': {reason}")]
    SerialOpen {
        /// Device path that was requested.
        port: String,
        /// Driver error message.
        reason: String,
    },

    /// Serial support was compiled out.
    #[error("Serial support not enabled. Rebuild with --features instrument_serial")]
    SerialFeatureDisabled,

    /// A feature needed for the requested operation was compiled out.
    #[error("Feature '{0}' is not enabled. Please build with --features {0}")]
    FeatureNotEnabled(String),

    /// CSV export failed.
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration loaded but holds invalid values.
    #[error("Configuration validation error: {0}")]
    Configuration(String),
}

impl LoggerError {
    /// Whether the reading loop may carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoggerError::Load { .. }
                | LoggerError::Parse(_)
                | LoggerError::Persist { .. }
                | LoggerError::Serialization(_)
        )
    }
}

impl From<figment::Error> for LoggerError {
    fn from(value: figment::Error) -> Self {
        LoggerError::Config(Box::new(value))
    }
}
