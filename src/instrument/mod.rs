//! Input side: the serial sensor and the record reader over it.

pub mod lines;
pub mod serial;

pub use lines::{LineReader, MAX_RECORD_LEN};
pub use serial::SerialSensorBuilder;
