//! Day → Hour → records hierarchy for drill-down display.
//!
//! The tree is pure derived data: no UI flags live on nodes, and per-node
//! averages are computed on read from the node's own record list so they can
//! never drift from the counts.

use chrono::NaiveDate;
use log::debug;
use ptl_core::local_time::LocalClock;
use ptl_core::record::PlantRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Arithmetic means over the four display channels of a record set.
///
/// `moisture` is the calibrated percentage; the raw ADC reading stays on the
/// individual records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelAverages {
    pub temperature: f64,
    pub humidity: f64,
    pub lux: f64,
    pub moisture: f64,
}

impl ChannelAverages {
    /// Means over a record slice; all zeros for an empty slice.
    pub fn of(records: &[PlantRecord]) -> ChannelAverages {
        if records.is_empty() {
            return ChannelAverages {
                temperature: 0.0,
                humidity: 0.0,
                lux: 0.0,
                moisture: 0.0,
            };
        }
        let n = records.len() as f64;
        let mut sums = (0.0, 0.0, 0.0, 0.0);
        for record in records {
            sums.0 += record.temperature;
            sums.1 += record.relative_humidity;
            sums.2 += record.lux;
            sums.3 += record.moisture_percent;
        }
        ChannelAverages {
            temperature: sums.0 / n,
            humidity: sums.1 / n,
            lux: sums.2 / n,
            moisture: sums.3 / n,
        }
    }
}

/// All records of one local hour of one local day, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    /// Hour of day, 0..=23
    pub hour_of_day: u32,
    pub records: Vec<PlantRecord>,
}

impl HourBucket {
    pub fn averages(&self) -> ChannelAverages {
        ChannelAverages::of(&self.records)
    }
}

/// All records of one local day, partitioned into non-empty hour buckets.
///
/// Only hours with at least one record are materialized; the gap-filled
/// 24-slot view lives in the series aggregation, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub weekday_name: String,
    /// Ascending by hour of day
    pub hours: Vec<HourBucket>,
}

impl DayBucket {
    pub fn record_count(&self) -> usize {
        self.hours.iter().map(|hour| hour.records.len()).sum()
    }

    pub fn averages(&self) -> ChannelAverages {
        let all: Vec<PlantRecord> = self
            .hours
            .iter()
            .flat_map(|hour| hour.records.iter().cloned())
            .collect();
        ChannelAverages::of(&all)
    }
}

/// The grouping root: day buckets sorted descending by date (newest first).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecordTree {
    pub days: Vec<DayBucket>,
}

impl RecordTree {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total records across all day and hour buckets.
    pub fn record_count(&self) -> usize {
        self.days.iter().map(DayBucket::record_count).sum()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn hour(&self, date: NaiveDate, hour_of_day: u32) -> Option<&HourBucket> {
        self.day(date)?
            .hours
            .iter()
            .find(|hour| hour.hour_of_day == hour_of_day)
    }

    /// Distinct dates present, ascending.
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.days.iter().map(|day| day.date).collect();
        dates.sort();
        dates
    }
}

/// Group records into the Day → Hour hierarchy using local calendar time.
///
/// Hours ascend within a day, records ascend by timestamp within an hour,
/// days descend by date for the display-facing tree. Empty input yields an
/// empty tree.
pub fn group(records: &[PlantRecord], clock: &LocalClock) -> RecordTree {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<u32, Vec<PlantRecord>>> = BTreeMap::new();
    for record in records {
        let stamp = clock.resolve(record.timestamp_epoch_seconds);
        by_date
            .entry(stamp.date)
            .or_default()
            .entry(stamp.hour)
            .or_default()
            .push(record.clone());
    }

    let days = by_date
        .into_iter()
        .rev()
        .map(|(date, hours)| {
            let hours = hours
                .into_iter()
                .map(|(hour_of_day, mut records)| {
                    records.sort();
                    HourBucket {
                        hour_of_day,
                        records,
                    }
                })
                .collect();
            DayBucket {
                date,
                weekday_name: date.format("%A").to_string(),
                hours,
            }
        })
        .collect::<Vec<DayBucket>>();

    debug!("grouped {} records into {} days", records.len(), days.len());
    RecordTree { days }
}
