//! Storage and export of logged readings.
pub mod export;
pub mod storage;

pub use storage::DailyStore;
