//! Global per-channel statistics across a loaded record set.

use ptl_core::record::PlantRecord;
use serde::Serialize;

/// Min / max / mean of one sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ChannelStats {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl ChannelStats {
    fn over(records: &[PlantRecord], channel: fn(&PlantRecord) -> f64) -> ChannelStats {
        if records.is_empty() {
            return ChannelStats::default();
        }
        let mut minimum = f64::INFINITY;
        let mut maximum = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for record in records {
            let value = channel(record);
            minimum = minimum.min(value);
            maximum = maximum.max(value);
            sum += value;
        }
        ChannelStats {
            average: sum / records.len() as f64,
            minimum,
            maximum,
        }
    }
}

/// Per-channel statistics over all accepted records.
///
/// All fields are zero for an empty record set; computation never divides by
/// zero and never fails.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlantStatistics {
    pub count: usize,
    pub temperature: ChannelStats,
    pub humidity: ChannelStats,
    pub lux: ChannelStats,
    pub moisture: ChannelStats,
}

/// Compute global statistics for a record set.
pub fn compute_statistics(records: &[PlantRecord]) -> PlantStatistics {
    PlantStatistics {
        count: records.len(),
        temperature: ChannelStats::over(records, |r| r.temperature),
        humidity: ChannelStats::over(records, |r| r.relative_humidity),
        lux: ChannelStats::over(records, |r| r.lux),
        moisture: ChannelStats::over(records, |r| r.moisture_percent),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ptl_core::parse::parse;

    #[test]
    fn test_statistics_over_records() {
        let payload = "\
A,1700000000,21.5,55.0,320,600,40.0
B,1700003600,22.0,50.0,310,610,38.0
C,1700100000,20.0,60.0,250,580,42.0
";
        let records = parse(payload).records;
        let stats = compute_statistics(&records);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.temperature.minimum, 20.0);
        assert_eq!(stats.temperature.maximum, 22.0);
        assert!((stats.temperature.average - 21.166666).abs() < 1e-5);
        assert_eq!(stats.lux.maximum, 320.0);
        assert_eq!(stats.moisture.minimum, 38.0);
    }

    #[test]
    fn test_statistics_empty_is_all_zero() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.temperature, ChannelStats::default());
        assert_eq!(stats.humidity.average, 0.0);
        assert_eq!(stats.moisture.maximum, 0.0);
    }

    #[test]
    fn test_statistics_single_record() {
        let records = parse("A,1700000000,21.5,55.0,320,600,40.0\n").records;
        let stats = compute_statistics(&records);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.temperature.minimum, 21.5);
        assert_eq!(stats.temperature.maximum, 21.5);
        assert_eq!(stats.temperature.average, 21.5);
    }
}
