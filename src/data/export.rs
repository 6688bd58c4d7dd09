//! CSV export of a day's readings.
use crate::{error::LoggerError, measurement::SensorReading};
use chrono::SecondsFormat;
use std::io::Write;

/// Header row of the exported table.
pub const EXPORT_HEADER: [&str; 6] = [
    "When",
    "CO2",
    "Pressure",
    "Temperature Celsius",
    "Temperature Fahrenheit",
    "Humidity",
];

/// One table row for `reading`. Floats carry two decimals.
pub fn to_record(reading: &SensorReading) -> [String; 6] {
    [
        reading.when.to_rfc3339_opts(SecondsFormat::Secs, true),
        reading.co2.to_string(),
        format!("{:.2}", reading.pressure),
        format!("{:.2}", reading.temperature),
        format!("{:.2}", reading.temperature_fahrenheit()),
        format!("{:.2}", reading.humidity),
    ]
}

/// Header followed by one row per reading.
pub fn to_records(readings: &[SensorReading]) -> Vec<[String; 6]> {
    let mut records = Vec::with_capacity(readings.len() + 1);
    records.push(EXPORT_HEADER.map(String::from));
    records.extend(readings.iter().map(to_record));
    records
}

/// Write `readings` as CSV into `out`.
#[cfg(feature = "storage_csv")]
pub fn write_csv<W: Write>(out: W, readings: &[SensorReading]) -> Result<(), LoggerError> {
    let mut writer = csv::Writer::from_writer(out);
    for record in to_records(readings) {
        writer
            .write_record(&record)
            .map_err(|e| LoggerError::Export(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| LoggerError::Export(e.to_string()))?;
    tracing::debug!(rows = readings.len(), "CSV export written");
    Ok(())
}

/// Write `readings` as CSV into `out`.
#[cfg(not(feature = "storage_csv"))]
pub fn write_csv<W: Write>(_out: W, _readings: &[SensorReading]) -> Result<(), LoggerError> {
    Err(LoggerError::FeatureNotEnabled("storage_csv".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};

    fn sample() -> SensorReading {
        SensorReading {
            when: Local.with_ymd_and_hms(2026, 10, 16, 8, 15, 0).single().unwrap(),
            co2: 612,
            pressure: 1013.257,
            temperature: 21.0,
            humidity: 44.5,
        }
    }

    #[test]
    fn record_formats_two_decimals() {
        let record = to_record(&sample());
        assert_eq!(record[1], "612");
        assert_eq!(record[2], "1013.26");
        assert_eq!(record[3], "21.00");
        assert_eq!(record[4], "69.80");
        assert_eq!(record[5], "44.50");
        assert!(record[0].starts_with("2026-10-16T08:15:00"));
    }

    #[test]
    fn timestamp_is_rfc3339_with_z_for_utc() {
        let reading = sample();
        let when = &to_record(&reading)[0];

        let parsed = DateTime::parse_from_rfc3339(when).unwrap();
        assert_eq!(parsed, reading.when);
        let utc = reading.when.offset().local_minus_utc() == 0;
        assert_eq!(when.ends_with('Z'), utc);
        assert!(!when.ends_with("+00:00"));
    }

    #[test]
    fn records_start_with_header() {
        let records = to_records(&[sample(), sample()]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0][0], "When");
        assert_eq!(records[0][4], "Temperature Fahrenheit");
    }

    #[cfg(feature = "storage_csv")]
    #[test]
    fn csv_output_has_header_and_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &[sample()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "When,CO2,Pressure,Temperature Celsius,Temperature Fahrenheit,Humidity"
        );
        assert!(lines.next().unwrap().ends_with(",612,1013.26,21.00,69.80,44.50"));
        assert!(lines.next().is_none());
    }
}
