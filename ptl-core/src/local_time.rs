//! Calendar resolution against the one configured IANA timezone.
//!
//! Every grouping and aggregation decision above the record layer depends
//! only on the attributes derived here, never on raw timestamps. Two records
//! with the same epoch second always resolve to the same local date and
//! hour, DST transitions of the configured zone included.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Zone the field devices report from.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;

/// Calendar attributes of one instant in the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalStamp {
    pub date: NaiveDate,
    /// Hour of day, 0..=23
    pub hour: u32,
    pub weekday: Weekday,
}

impl LocalStamp {
    /// Full weekday name, e.g. "Tuesday".
    pub fn weekday_name(&self) -> String {
        self.date.format("%A").to_string()
    }

    /// Month display label, e.g. "November 2023".
    pub fn month_label(&self) -> String {
        self.date.format("%B %Y").to_string()
    }
}

/// Resolves epoch timestamps to local calendar attributes for one fixed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    tz: Tz,
}

impl LocalClock {
    pub fn new(tz: Tz) -> Self {
        LocalClock { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Resolve an epoch-seconds timestamp to its local calendar attributes.
    pub fn resolve(&self, epoch_seconds: i64) -> LocalStamp {
        // Out-of-range instants clamp to the epoch rather than panic; record
        // normalization only admits non-negative i64 seconds.
        let local = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
            .unwrap_or_default()
            .with_timezone(&self.tz);
        LocalStamp {
            date: local.date_naive(),
            hour: local.hour(),
            weekday: local.weekday(),
        }
    }

    /// Local calendar date of an instant.
    pub fn local_date(&self, epoch_seconds: i64) -> NaiveDate {
        self.resolve(epoch_seconds).date
    }

    /// Epoch seconds at which a local (date, hour) bucket starts.
    ///
    /// Ambiguous wall-clock times (DST fall-back) resolve to the earliest
    /// instant; a wall-clock hour skipped by spring-forward resolves to the
    /// nominal slot start derived from the following hour.
    pub fn bucket_start(&self, date: NaiveDate, hour: u32) -> i64 {
        let naive = date
            .and_hms_opt(hour.min(23), 0, 0)
            .unwrap_or_else(|| NaiveDateTime::from(date));
        if let Some(local) = self.tz.from_local_datetime(&naive).earliest() {
            return local.timestamp();
        }
        let after_gap = naive + Duration::hours(1);
        self.tz
            .from_local_datetime(&after_gap)
            .earliest()
            .map(|local| local.timestamp() - 3600)
            .unwrap_or_else(|| naive.and_utc().timestamp())
    }

    /// Local midnight of a date, as epoch seconds.
    pub fn day_start(&self, date: NaiveDate) -> i64 {
        self.bucket_start(date, 0)
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        LocalClock::new(DEFAULT_TIMEZONE)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_resolve_utc() {
        let clock = LocalClock::new(chrono_tz::UTC);
        // 2023-11-14 22:13:20 UTC
        let stamp = clock.resolve(1_700_000_000);
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
        assert_eq!(stamp.hour, 22);
        assert_eq!(stamp.weekday, Weekday::Tue);
        assert_eq!(stamp.weekday_name(), "Tuesday");
        assert_eq!(stamp.month_label(), "November 2023");
    }

    #[test]
    fn test_resolve_fixed_offset_zone() {
        // Asia/Seoul is UTC+9 year-round: 22:13 UTC is 07:13 next day
        let clock = LocalClock::default();
        let stamp = clock.resolve(1_700_000_000);
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2023, 11, 15).unwrap());
        assert_eq!(stamp.hour, 7);
    }

    #[test]
    fn test_same_second_same_stamp() {
        let clock = LocalClock::default();
        assert_eq!(clock.resolve(1_700_000_000), clock.resolve(1_700_000_000));
    }

    #[test]
    fn test_bucket_start_round_trips() {
        let clock = LocalClock::new(chrono_tz::UTC);
        let date = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        let start = clock.bucket_start(date, 9);
        let stamp = clock.resolve(start);
        assert_eq!(stamp.date, date);
        assert_eq!(stamp.hour, 9);
    }

    #[test]
    fn test_bucket_start_dst_gap() {
        // US spring forward 2023-03-12: 02:00 local does not exist
        let clock = LocalClock::new(chrono_tz::America::Los_Angeles);
        let date = NaiveDate::from_ymd_opt(2023, 3, 12).unwrap();
        let one = clock.bucket_start(date, 1);
        let two = clock.bucket_start(date, 2);
        let three = clock.bucket_start(date, 3);
        // The skipped hour collapses onto the jump instant
        assert!(one <= two);
        assert!(two < three);
    }

    #[test]
    fn test_day_start() {
        let clock = LocalClock::new(chrono_tz::UTC);
        let date = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        // 2023-11-14 00:00 UTC
        assert_eq!(clock.day_start(date), 1_699_920_000);
    }
}
