//! Sensor reading records.
//!
//! The sensor emits one JSON object per line carrying the four measured
//! quantities. The capture time is never taken from the device: the logger
//! stamps each reading with its own local clock when the line arrives.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A reading as it arrives on the wire, before it is timestamped.
///
/// Unknown fields (including any timestamp the device might send) are ignored.
/// All four quantities are required.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawReading {
    /// CO2 concentration in ppm.
    #[serde(rename = "CO2")]
    pub co2: i64,
    /// Barometric pressure as reported by the sensor.
    pub pressure: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity.
    pub humidity: f64,
}

impl RawReading {
    /// Decode one line of sensor output.
    pub fn from_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }

    /// Attach the capture time.
    pub fn stamp(self, when: DateTime<Local>) -> SensorReading {
        SensorReading {
            when,
            co2: self.co2,
            pressure: self.pressure,
            temperature: self.temperature,
            humidity: self.humidity,
        }
    }
}

/// One timestamped sample, as stored in the day file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Capture time on the local clock (RFC 3339 on disk).
    #[serde(rename = "When")]
    pub when: DateTime<Local>,
    /// CO2 concentration in ppm.
    #[serde(rename = "CO2")]
    pub co2: i64,
    /// Barometric pressure.
    pub pressure: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity.
    pub humidity: f64,
}

impl SensorReading {
    /// Calendar day the reading was captured on.
    pub fn day(&self) -> NaiveDate {
        self.when.date_naive()
    }

    /// Temperature converted to degrees Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature)
    }
}

/// `F = C * 1.8 + 32`
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}
