//! Reading records and the daily buffer that holds them.

pub mod buffer;
pub mod reading;

pub use buffer::DailyBuffer;
pub use reading::{celsius_to_fahrenheit, RawReading, SensorReading};
