//! The reading accumulator.
//!
//! Turns raw sensor lines into timestamped readings held in a [`DailyBuffer`]
//! and writes that buffer to the day file. The buffer is an explicit value:
//! each step takes it and hands it back, so the caller owns the only copy.
//!
//! None of the failures here stop the caller:
//! - a day file that cannot be loaded yields an empty buffer,
//! - a line that does not parse is dropped and the buffer is returned unchanged,
//! - a failed write leaves the buffer in memory for the next attempt.

use crate::data::DailyStore;
use crate::error::LoggerError;
use crate::measurement::{DailyBuffer, RawReading};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// What [`ingest_line`] did with a well-formed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Appended to the current day's buffer.
    Appended,
    /// The line started a new day; the buffer now holds only this reading.
    RolledOver,
}

/// Load the buffer for the calendar day of `now`.
///
/// On any read or decode failure an empty buffer for today is returned together
/// with the error, which has already been logged.
pub fn load_today_buffer(
    store: &DailyStore,
    now: DateTime<Local>,
) -> (DailyBuffer, Option<LoggerError>) {
    let today = now.date_naive();
    match store.load(today) {
        Ok(readings) => {
            let (buffer, dropped) = DailyBuffer::from_readings(today, readings);
            if dropped > 0 {
                warn!(
                    path = %store.path_for(today).display(),
                    dropped,
                    "Day file held readings from other days; discarded them"
                );
            }
            info!(
                path = %store.path_for(today).display(),
                readings = buffer.len(),
                "Resumed today's readings"
            );
            (buffer, None)
        }
        Err(err) => {
            warn!(error = %err, "Nothing to resume, starting an empty day");
            (DailyBuffer::empty(today), Some(err))
        }
    }
}

/// Parse `raw` as a reading captured at `now` and add it to `buffer`.
///
/// A parse failure is logged and returned with the buffer untouched. When
/// `now` falls on another calendar day than the buffer, the buffer is cleared
/// before the reading is appended.
pub fn ingest_line(
    mut buffer: DailyBuffer,
    raw: &[u8],
    now: DateTime<Local>,
) -> (DailyBuffer, Result<IngestOutcome, LoggerError>) {
    let reading = match RawReading::from_slice(raw) {
        Ok(raw_reading) => raw_reading.stamp(now),
        Err(e) => {
            warn!(
                error = %e,
                line = %String::from_utf8_lossy(raw).escape_default(),
                "Discarding malformed sensor line"
            );
            return (buffer, Err(LoggerError::Parse(e)));
        }
    };

    let co2 = reading.co2;
    let outcome = match buffer.push(reading) {
        Ok(()) => IngestOutcome::Appended,
        Err(reading) => {
            info!(
                previous_day = %buffer.day(),
                new_day = %reading.day(),
                discarded = buffer.len(),
                "Day rollover, starting a new buffer"
            );
            buffer.roll_over(reading);
            IngestOutcome::RolledOver
        }
    };
    debug!(co2, readings = buffer.len(), "Reading captured");
    (buffer, Ok(outcome))
}

/// Overwrite the day file for `now` with the whole buffer.
///
/// Failure is logged and returned; the buffer is borrowed, never consumed, so
/// it survives for the next attempt.
pub fn persist(
    store: &DailyStore,
    buffer: &DailyBuffer,
    now: DateTime<Local>,
) -> Result<PathBuf, LoggerError> {
    store
        .write(now.date_naive(), buffer.readings())
        .map_err(|err| {
            error!(error = %err, readings = buffer.len(), "Failed to persist readings");
            err
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::tempdir;
    use tracing_test::traced_test;

    const LINE_400: &[u8] = br#"{"CO2":400,"pressure":1.0,"temperature":20.0,"humidity":50.0}"#;
    const LINE_410: &[u8] = br#"{"CO2":410,"pressure":1.01,"temperature":20.5,"humidity":51.0}"#;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, day, hour, min, 0).single().unwrap()
    }

    #[test]
    fn ingest_appends_same_day() {
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());

        let (buffer, res) = ingest_line(buffer, LINE_400, at(16, 9, 0));
        assert_eq!(res.unwrap(), IngestOutcome::Appended);
        let (buffer, res) = ingest_line(buffer, LINE_410, at(16, 9, 1));
        assert_eq!(res.unwrap(), IngestOutcome::Appended);

        let readings = buffer.readings();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].co2, 400);
        assert_eq!(readings[0].when, at(16, 9, 0));
        assert_eq!(readings[1].co2, 410);
        assert_eq!(readings[1].when, at(16, 9, 1));
    }

    #[test]
    fn ingest_stamps_with_now_not_input() {
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let line = br#"{"When":"2001-02-03T04:05:06Z","CO2":400,"pressure":1.0,"temperature":20.0,"humidity":50.0}"#;

        let (buffer, res) = ingest_line(buffer, line, at(16, 12, 0));

        assert!(res.is_ok());
        assert_eq!(buffer.readings()[0].when, at(16, 12, 0));
    }

    #[test]
    fn ingest_rolls_over_on_new_day() {
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let (buffer, _) = ingest_line(buffer, LINE_400, at(16, 23, 59));
        let (buffer, _) = ingest_line(buffer, LINE_400, at(16, 23, 59));

        let (buffer, res) = ingest_line(buffer, LINE_410, at(17, 0, 0));

        assert_eq!(res.unwrap(), IngestOutcome::RolledOver);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.day(), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(buffer.readings()[0].co2, 410);
    }

    #[test]
    fn same_date_next_year_rolls_over() {
        let march = |year| Local.with_ymd_and_hms(year, 3, 1, 10, 0, 0).single().unwrap();
        let buffer = DailyBuffer::empty(march(2025).date_naive());
        let (buffer, _) = ingest_line(buffer, LINE_400, march(2025));

        let (buffer, res) = ingest_line(buffer, LINE_410, march(2026));

        assert_eq!(res.unwrap(), IngestOutcome::RolledOver);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.day(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(buffer.readings()[0].co2, 410);
    }

    #[test]
    #[traced_test]
    fn malformed_line_leaves_buffer_unchanged() {
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let (buffer, _) = ingest_line(buffer, LINE_400, at(16, 9, 0));
        let before = buffer.clone();

        let (buffer, res) = ingest_line(buffer, b"{\"CO2\": 4", at(16, 9, 1));

        assert!(matches!(res, Err(LoggerError::Parse(_))));
        assert_eq!(buffer, before);
        assert!(logs_contain("Discarding malformed sensor line"));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let (buffer, res) = ingest_line(
            buffer,
            br#"{"CO2":400,"pressure":1.0,"humidity":50.0}"#,
            at(16, 9, 0),
        );
        assert!(matches!(res, Err(LoggerError::Parse(_))));
        assert!(buffer.is_empty());
    }

    #[test]
    #[traced_test]
    fn load_without_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());

        let (buffer, err) = load_today_buffer(&store, at(16, 8, 0));

        assert!(buffer.is_empty());
        assert_eq!(buffer.day(), at(16, 8, 0).date_naive());
        assert!(matches!(err, Some(LoggerError::Load { .. })));
        assert!(logs_contain("Nothing to resume"));
    }

    #[test]
    fn load_resumes_persisted_day() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let (buffer, _) = ingest_line(buffer, LINE_400, at(16, 9, 0));
        let (buffer, _) = ingest_line(buffer, LINE_410, at(16, 9, 5));
        persist(&store, &buffer, at(16, 9, 5)).unwrap();

        let (resumed, err) = load_today_buffer(&store, at(16, 10, 0));

        assert!(err.is_none());
        assert_eq!(resumed, buffer);
    }

    #[test]
    #[traced_test]
    fn load_drops_readings_from_other_days() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        let today = at(16, 0, 0).date_naive();
        let stamped = |raw: &[u8], when| RawReading::from_slice(raw).unwrap().stamp(when);
        // A file for today that also carries a reading from the previous evening.
        let mixed = vec![
            stamped(LINE_400, at(15, 23, 50)),
            stamped(LINE_410, at(16, 0, 10)),
        ];
        store.write(today, &mixed).unwrap();

        let (buffer, err) = load_today_buffer(&store, at(16, 8, 0));

        assert!(err.is_none());
        assert_eq!(buffer.day(), today);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.readings()[0].co2, 410);
        assert!(logs_contain("discarded them"));
        assert!(logs_contain("dropped=1"));
    }

    #[test]
    #[traced_test]
    fn persist_failure_keeps_buffer() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path().join("missing"));
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let (buffer, _) = ingest_line(buffer, LINE_400, at(16, 9, 0));

        let res = persist(&store, &buffer, at(16, 9, 0));

        assert!(matches!(res, Err(LoggerError::Persist { .. })));
        assert_eq!(buffer.len(), 1);
        assert!(logs_contain("Failed to persist readings"));
    }

    #[test]
    fn persist_writes_file_named_for_now() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        let buffer = DailyBuffer::empty(at(16, 0, 0).date_naive());
        let (buffer, _) = ingest_line(buffer, LINE_400, at(16, 9, 0));

        let path = persist(&store, &buffer, at(16, 9, 0)).unwrap();

        assert_eq!(path, dir.path().join("readings-2026-10-16.json"));
        assert!(path.exists());
    }
}
