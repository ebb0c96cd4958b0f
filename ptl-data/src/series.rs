//! Fixed-resolution aggregation series for chart consumption.
//!
//! DAY mode is a variable-length trend (one point per date with data); HOUR
//! mode is a fixed single-day profile of exactly 24 points, with zero-valued
//! gap points so the chart x-axis geometry never changes while navigating
//! between days.

use crate::grouping::ChannelAverages;
use chrono::NaiveDate;
use ptl_core::local_time::LocalClock;
use ptl_core::record::PlantRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregation resolution for chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartMode {
    /// 24-point single-day profile
    Hour,
    /// One point per calendar day with data
    Day,
}

/// One bucketed chart point. Ephemeral: recomputed whenever the record set
/// or the selected day changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub bucket_start_epoch_seconds: i64,
    pub temperature: f64,
    pub humidity: f64,
    pub lux: f64,
    pub moisture: f64,
    /// Human-readable time label for the x-axis
    pub label: String,
    pub hour_of_day: Option<u32>,
    pub date: Option<NaiveDate>,
}

impl AggregatedPoint {
    fn from_averages(averages: ChannelAverages) -> AggregatedPoint {
        AggregatedPoint {
            bucket_start_epoch_seconds: 0,
            temperature: averages.temperature,
            humidity: averages.humidity,
            lux: averages.lux,
            moisture: averages.moisture,
            label: String::new(),
            hour_of_day: None,
            date: None,
        }
    }

    fn zeroed() -> AggregatedPoint {
        Self::from_averages(ChannelAverages::of(&[]))
    }
}

/// DAY mode: one point per distinct local date present, ascending.
///
/// Bucket start is local midnight of the date. No gap-filling: only dates
/// with at least one record appear, and no date appears twice.
pub fn aggregate_daily(records: &[PlantRecord], clock: &LocalClock) -> Vec<AggregatedPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<PlantRecord>> = BTreeMap::new();
    for record in records {
        by_date
            .entry(clock.local_date(record.timestamp_epoch_seconds))
            .or_default()
            .push(record.clone());
    }

    by_date
        .into_iter()
        .map(|(date, day_records)| {
            let mut point = AggregatedPoint::from_averages(ChannelAverages::of(&day_records));
            point.bucket_start_epoch_seconds = clock.day_start(date);
            point.label = ptl_utils::dates::format_date(&date);
            point.date = Some(date);
            point
        })
        .collect()
}

/// HOUR mode, day-scoped: exactly 24 points for `target_date`, hours 0..=23.
///
/// Hours with records hold the mean of that hour's records; hours without
/// are synthesized with all channels at zero and the correct local
/// bucket-start epoch. The zero is a chart-geometry choice, not a claim the
/// sensor read zero.
pub fn aggregate_hourly_for_day(
    records: &[PlantRecord],
    clock: &LocalClock,
    target_date: NaiveDate,
) -> Vec<AggregatedPoint> {
    let mut by_hour: BTreeMap<u32, Vec<PlantRecord>> = BTreeMap::new();
    for record in records {
        let stamp = clock.resolve(record.timestamp_epoch_seconds);
        if stamp.date == target_date {
            by_hour.entry(stamp.hour).or_default().push(record.clone());
        }
    }

    (0..24)
        .map(|hour| {
            let mut point = match by_hour.get(&hour) {
                Some(hour_records) => {
                    AggregatedPoint::from_averages(ChannelAverages::of(hour_records))
                }
                None => AggregatedPoint::zeroed(),
            };
            point.bucket_start_epoch_seconds = clock.bucket_start(target_date, hour);
            point.label = ptl_utils::dates::format_hour_label(hour);
            point.hour_of_day = Some(hour);
            point.date = Some(target_date);
            point
        })
        .collect()
}
