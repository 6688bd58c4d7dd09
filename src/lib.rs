//! # Sensor Logger Core Library
//!
//! Reads line-delimited JSON air-quality readings (CO2, pressure, temperature,
//! humidity) from a serial sensor, stamps each with the local time, and keeps
//! the current day's readings in a per-day JSON file that is rewritten after
//! every reading. A restart on the same day picks up where the file left off.
//!
//! ## Crate Structure
//!
//! - **`accumulator`**: load today's buffer, ingest one raw line, persist the buffer.
//! - **`config`**: layered configuration (defaults, TOML file, environment).
//! - **`data`**: the per-day JSON store and CSV export.
//! - **`error`**: the `LoggerError` enum used across the crate.
//! - **`instrument`**: opening the serial sensor and splitting its output into records.
//! - **`logging`**: `tracing` subscriber setup.
//! - **`measurement`**: reading records and the daily buffer.
//! - **`session`**: the driving loop tying input, accumulator and store together.
//! - **`validation`**: small validators used by configuration checks.

pub mod accumulator;
pub mod config;
pub mod data;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod measurement;
pub mod session;
pub mod validation;

pub use accumulator::{ingest_line, load_today_buffer, persist, IngestOutcome};
pub use data::DailyStore;
pub use error::LoggerError;
pub use measurement::{DailyBuffer, RawReading, SensorReading};
pub use session::{run_session, Clock, RunSummary, StreamEnd, SystemClock};
