//! Per-day JSON files.
//!
//! Each calendar day owns one file, `readings-YYYY-MM-DD.json`, holding the
//! whole day's readings as a JSON array. Every write replaces the file.
use crate::{error::LoggerError, measurement::SensorReading};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Maps calendar days to day files inside an output directory.
#[derive(Debug, Clone)]
pub struct DailyStore {
    dir: PathBuf,
}

impl DailyStore {
    /// A store rooted at `dir` (the working directory is `"."`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the day files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for `day`, e.g. `readings-2026-10-16.json`.
    pub fn file_name(day: NaiveDate) -> String {
        format!("readings-{}.json", day.format("%Y-%m-%d"))
    }

    /// Full path of the file for `day`.
    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.dir.join(Self::file_name(day))
    }

    /// Read and decode the file for `day`.
    pub fn load(&self, day: NaiveDate) -> Result<Vec<SensorReading>, LoggerError> {
        let path = self.path_for(day);
        let bytes = fs::read(&path).map_err(|e| LoggerError::Load {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| LoggerError::Load {
            path,
            reason: e.to_string(),
        })
    }

    /// Overwrite the file for `day` with `readings`.
    ///
    /// Returns the path written. The write is not atomic: a crash mid-write
    /// can leave a truncated file behind.
    pub fn write(
        &self,
        day: NaiveDate,
        readings: &[SensorReading],
    ) -> Result<PathBuf, LoggerError> {
        let path = self.path_for(day);
        let bytes =
            serde_json::to_vec(readings).map_err(|e| LoggerError::Serialization(e.to_string()))?;
        fs::write(&path, bytes).map_err(|source| LoggerError::Persist {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    fn sample(co2: i64) -> SensorReading {
        SensorReading {
            when: Local.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).single().unwrap(),
            co2,
            pressure: 1.01,
            temperature: 21.5,
            humidity: 48.0,
        }
    }

    #[test]
    fn file_name_is_zero_padded() {
        assert_eq!(DailyStore::file_name(day()), "readings-2026-03-07.json");
        let store = DailyStore::new("data");
        assert_eq!(
            store.path_for(day()),
            PathBuf::from("data/readings-2026-03-07.json")
        );
    }

    #[test]
    fn write_then_load() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());

        store.write(day(), &[sample(400), sample(410)]).unwrap();
        let loaded = store.load(day()).unwrap();

        assert_eq!(loaded, vec![sample(400), sample(410)]);
    }

    #[test]
    fn write_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());

        store.write(day(), &[sample(400), sample(410)]).unwrap();
        store.write(day(), &[sample(500)]).unwrap();

        assert_eq!(store.load(day()).unwrap(), vec![sample(500)]);
    }

    #[test]
    fn file_is_a_json_array_with_when_field() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        let path = store.write(day(), &[sample(400)]).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert!(first["When"].is_string());
        assert_eq!(first["CO2"], 400);
        assert_eq!(first["temperature"], 21.5);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        assert!(matches!(store.load(day()), Err(LoggerError::Load { .. })));
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path());
        fs::write(store.path_for(day()), b"[{\"When\":").unwrap();
        assert!(matches!(store.load(day()), Err(LoggerError::Load { .. })));
    }

    #[test]
    fn unwritable_directory_is_a_persist_error() {
        let dir = tempdir().unwrap();
        let store = DailyStore::new(dir.path().join("does-not-exist"));
        let err = store.write(day(), &[sample(400)]).unwrap_err();
        assert!(matches!(err, LoggerError::Persist { .. }));
    }
}
