//! Serial sensor connection.
//!
//! The sensor talks 8N1 without flow control. Only the port path, line speed
//! and read timeout are configurable.
use crate::config::SerialConfig;
use crate::error::LoggerError;
use std::io::Read;
use std::time::Duration;
use tracing::info;

/// Builder for opening the sensor's serial port.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use sensor_logger::instrument::serial::SerialSensorBuilder;
///
/// # fn main() -> Result<(), sensor_logger::error::LoggerError> {
/// let port = SerialSensorBuilder::new("/dev/ttyUSB0".to_string(), 9600)
///     .with_timeout(Duration::from_millis(500))
///     .open()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SerialSensorBuilder {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialSensorBuilder {
    /// Create a new builder with required parameters
    ///
    /// Default read timeout: 1 second
    pub fn new(port_name: String, baud_rate: u32) -> Self {
        Self {
            port_name,
            baud_rate,
            timeout: Duration::from_secs(1),
        }
    }

    /// Builder taking every setting from configuration.
    pub fn from_config(config: &SerialConfig) -> Self {
        Self::new(config.port.clone(), config.baud_rate).with_timeout(config.timeout())
    }

    /// Set the read timeout duration
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Device path this builder opens.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Open and configure the port.
    #[cfg(feature = "instrument_serial")]
    pub fn open(self) -> Result<Box<dyn Read + Send>, LoggerError> {
        use serialport::{DataBits, FlowControl, Parity, StopBits};

        let port = serialport::new(&self.port_name, self.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open()
            .map_err(|e| LoggerError::SerialOpen {
                port: self.port_name.clone(),
                reason: e.to_string(),
            })?;

        info!(
            port = %self.port_name,
            baud_rate = self.baud_rate,
            timeout_ms = self.timeout.as_millis() as u64,
            "Serial port opened"
        );
        Ok(Box::new(port))
    }

    /// Open and configure the port.
    #[cfg(not(feature = "instrument_serial"))]
    pub fn open(self) -> Result<Box<dyn Read + Send>, LoggerError> {
        Err(LoggerError::SerialFeatureDisabled)
    }
}
