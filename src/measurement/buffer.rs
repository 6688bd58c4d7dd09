//! The day-scoped reading buffer.

use super::reading::SensorReading;
use chrono::NaiveDate;

/// Ordered, append-only readings for a single calendar day.
///
/// Every reading held has a capture date equal to [`DailyBuffer::day`].
/// Pushing a reading from another day is done through [`DailyBuffer::roll_over`],
/// which discards the previous day's contents (they already live in that
/// day's file).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBuffer {
    day: NaiveDate,
    readings: Vec<SensorReading>,
}

impl DailyBuffer {
    /// An empty buffer for `day`.
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            readings: Vec::new(),
        }
    }

    /// Build a buffer from previously persisted readings.
    ///
    /// Readings captured on any other day than `day` are dropped; the number
    /// dropped is returned alongside the buffer.
    pub fn from_readings(day: NaiveDate, readings: Vec<SensorReading>) -> (Self, usize) {
        let total = readings.len();
        let readings: Vec<_> = readings.into_iter().filter(|r| r.day() == day).collect();
        let dropped = total - readings.len();
        (Self { day, readings }, dropped)
    }

    /// Calendar day this buffer covers.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Readings in arrival order.
    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    /// Number of readings held.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether no reading has been captured yet today.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Whether `reading` falls on a different day and would trigger a rollover.
    pub fn needs_rollover(&self, reading: &SensorReading) -> bool {
        reading.day() != self.day
    }

    /// Append a reading captured on this buffer's day.
    ///
    /// Returns the reading back if it belongs to another day.
    pub fn push(&mut self, reading: SensorReading) -> Result<(), SensorReading> {
        if self.needs_rollover(&reading) {
            return Err(reading);
        }
        self.readings.push(reading);
        Ok(())
    }

    /// Start a new day holding only `reading`.
    pub fn roll_over(&mut self, reading: SensorReading) {
        self.day = reading.day();
        self.readings.clear();
        self.readings.push(reading);
    }

    /// Consume the buffer, yielding its readings.
    pub fn into_readings(self) -> Vec<SensorReading> {
        self.readings
    }
}
