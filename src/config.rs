//! Configuration System using Figment
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. `config/sensor_logger.toml` (optional)
//! 3. Environment variables prefixed with `SENSOR_LOGGER_`, using `__` between
//!    section and key (e.g. `SENSOR_LOGGER_SERIAL__BAUD_RATE=115200`)
//!
//! # Example
//! ```no_run
//! use sensor_logger::config::LoggerConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoggerConfig::load()?;
//! config.validate()?;
//! println!("Reading from {}", config.serial.port);
//! # Ok(())
//! # }
//! ```

use crate::error::LoggerError;
use crate::validation::{is_in_range, is_not_empty, is_valid_path};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config/sensor_logger.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Serial device settings
    #[serde(default)]
    pub serial: SerialConfig,
    /// Day file settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Tag each log event with its source file and line
    #[serde(default)]
    pub log_file_and_line: bool,
}

/// Serial device configuration.
///
/// Framing is fixed at 8N1 without flow control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path (e.g. "/dev/ttyUSB0", "COM3")
    #[serde(default = "default_port")]
    pub port: String,
    /// Line speed
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Day file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the `readings-YYYY-MM-DD.json` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            log_file_and_line: false,
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl SerialConfig {
    /// Read timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl LoggerConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self, LoggerError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, LoggerError> {
        Ok(Self::figment(path.as_ref()).extract()?)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(LoggerConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SENSOR_LOGGER_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), LoggerError> {
        let invalid = |msg: String| Err(LoggerError::Configuration(msg));

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.to_lowercase().as_str()) {
            return invalid(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.application.log_format.to_lowercase().as_str()) {
            return invalid(format!(
                "Invalid log_format '{}'. Must be one of: {}",
                self.application.log_format,
                valid_formats.join(", ")
            ));
        }

        if let Err(e) = is_not_empty(&self.serial.port) {
            return invalid(format!("serial.port: {e}"));
        }
        if let Err(e) = is_in_range(self.serial.baud_rate, 1..=4_000_000) {
            return invalid(format!("serial.baud_rate {}: {e}", self.serial.baud_rate));
        }
        if self.serial.timeout_ms == 0 {
            return invalid("serial.timeout_ms must be greater than 0".to_string());
        }

        if let Err(e) = is_valid_path(&self.storage.output_dir.to_string_lossy()) {
            return invalid(format!("storage.output_dir: {e}"));
        }

        Ok(())
    }
}
