use crate::error::ParseError;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, hash::Hash};

/// Expected minimum number of columns in a telemetry CSV row.
///
/// The format is positional, not header-driven: columns 0..=6 are
/// `id, timestamp(seconds), temperature, relative_humidity, lux,
/// moisture_value, moisture_percent`. Extra trailing columns are ignored.
pub const CSV_ROW_LENGTH: usize = 7;

/// Canonical column names used only by the advisory header heuristic.
pub const CANONICAL_HEADERS: [&str; 7] = [
    "id",
    "timestamp",
    "temperature",
    "relative_humidity",
    "lux",
    "moisture_value",
    "moisture_percent",
];

/// Parse a numeric field, falling back to `default` when it does not parse.
///
/// Field exports from the loggers are occasionally corrupt mid-row; a bad
/// channel value degrades to the default instead of losing the whole record.
/// The fallback is indistinguishable from a measured zero, which the wire
/// format has no way to express otherwise.
pub fn parse_numeric_or_default(field: &str, default: f64) -> f64 {
    field.trim().parse::<f64>().unwrap_or(default)
}

/// A single normalized sensor reading from a field device.
///
/// Constructed only by row normalization; immutable afterwards. The
/// timestamp is always interpreted as epoch seconds, never milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: String,
    pub timestamp_epoch_seconds: i64,
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in %
    pub relative_humidity: f64,
    /// Illuminance in lux
    pub lux: f64,
    /// Raw ADC moisture reading
    pub moisture_raw: f64,
    /// Calibrated moisture in %
    pub moisture_percent: f64,
}

impl TryFrom<&StringRecord> for PlantRecord {
    type Error = ParseError;

    fn try_from(value: &StringRecord) -> Result<Self, Self::Error> {
        if value.len() < CSV_ROW_LENGTH {
            return Err(ParseError::TooFewColumns {
                expected: CSV_ROW_LENGTH,
                found: value.len(),
            });
        }
        // len() >= 7 was checked above, so positional access cannot miss
        let field = |idx: usize| value.get(idx).unwrap_or_default().trim();

        // The timestamp is the one structural field: a row without a usable
        // instant cannot be bucketed at all, so it rejects the whole row.
        // This is also what makes a header line count as one skipped line.
        let raw_timestamp = field(1);
        let timestamp_epoch_seconds = raw_timestamp
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs >= 0)
            .ok_or_else(|| ParseError::InvalidTimestamp(raw_timestamp.to_string()))?;

        Ok(PlantRecord {
            id: field(0).to_string(),
            timestamp_epoch_seconds,
            temperature: parse_numeric_or_default(field(2), 0.0),
            relative_humidity: parse_numeric_or_default(field(3), 0.0),
            lux: parse_numeric_or_default(field(4), 0.0),
            moisture_raw: parse_numeric_or_default(field(5), 0.0),
            moisture_percent: parse_numeric_or_default(field(6), 0.0),
        })
    }
}

impl Hash for PlantRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.timestamp_epoch_seconds.hash(state);
    }
}

impl Ord for PlantRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp_epoch_seconds
            .cmp(&other.timestamp_epoch_seconds)
    }
}

impl Eq for PlantRecord {}

impl PartialEq for PlantRecord {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp_epoch_seconds == other.timestamp_epoch_seconds && self.id == other.id
    }
}

impl PartialOrd for PlantRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record_from(fields: &[&str]) -> Result<PlantRecord, ParseError> {
        let record = StringRecord::from(fields.to_vec());
        PlantRecord::try_from(&record)
    }

    #[test]
    fn test_normalize_valid_row() {
        let record =
            record_from(&["A", "1700000000", "21.5", "55.0", "320", "600", "40.0"]).unwrap();
        assert_eq!(record.id, "A");
        assert_eq!(record.timestamp_epoch_seconds, 1_700_000_000);
        assert_eq!(record.temperature, 21.5);
        assert_eq!(record.relative_humidity, 55.0);
        assert_eq!(record.lux, 320.0);
        assert_eq!(record.moisture_raw, 600.0);
        assert_eq!(record.moisture_percent, 40.0);
    }

    #[test]
    fn test_too_few_columns_rejected() {
        let result = record_from(&["A", "1700000000", "21.5", "55.0", "320"]);
        assert_eq!(
            result,
            Err(ParseError::TooFewColumns {
                expected: 7,
                found: 5
            })
        );
    }

    #[test]
    fn test_bad_channel_defaults_to_zero() {
        let record =
            record_from(&["A", "1700000000", "oops", "55.0", "", "600", "40.0"]).unwrap();
        assert_eq!(record.temperature, 0.0);
        assert_eq!(record.lux, 0.0);
        assert_eq!(record.relative_humidity, 55.0);
    }

    #[test]
    fn test_header_row_rejected_on_timestamp() {
        let result = record_from(&[
            "id",
            "timestamp",
            "temperature",
            "relative_humidity",
            "lux",
            "moisture_value",
            "moisture_percent",
        ]);
        assert!(matches!(result, Err(ParseError::InvalidTimestamp(_))));
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let result = record_from(&["A", "-5", "21.5", "55.0", "320", "600", "40.0"]);
        assert!(matches!(result, Err(ParseError::InvalidTimestamp(_))));
    }

    #[test]
    fn test_parse_numeric_or_default() {
        assert_eq!(parse_numeric_or_default("42.5", 0.0), 42.5);
        assert_eq!(parse_numeric_or_default(" 7 ", 0.0), 7.0);
        assert_eq!(parse_numeric_or_default("n/a", 0.0), 0.0);
        assert_eq!(parse_numeric_or_default("", -1.0), -1.0);
    }
}
