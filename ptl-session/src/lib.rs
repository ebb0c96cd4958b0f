//! Session state for one loaded telemetry dataset.
//!
//! [`SessionState`] owns the accepted records and every structure derived
//! from them: the drill-down tree, both chart series, global statistics, the
//! selected date, and the expand/collapse side-state the display layer
//! mutates. A load either fully succeeds and replaces all derived state
//! atomically, or fails and leaves the previous dataset untouched.
//!
//! All mutation goes through `&mut self`, so one owner serializes access; a
//! host that shares an instance across threads wraps it in a lock. Loading
//! is pure CPU work over an in-memory string and commits by field assignment
//! only after every derivation stage has succeeded, so torn state is never
//! observable.

use chrono::NaiveDate;
use log::info;
use ptl_core::error::LoadError;
use ptl_core::local_time::LocalClock;
use ptl_core::parse;
use ptl_core::record::PlantRecord;
use ptl_data::grouping::{self, RecordTree};
use ptl_data::series::{self, AggregatedPoint, ChartMode};
use ptl_data::statistics::{self, PlantStatistics};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Diagnostics of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub record_count: usize,
    /// Malformed lines skipped during parsing (a header line counts as one)
    pub skipped_lines: usize,
    pub day_count: usize,
}

/// Owner of one loaded dataset and all views derived from it.
///
/// Create with [`SessionState::new`], populate with [`SessionState::load`],
/// discard or [`SessionState::clear`] when done. No ambient singleton; hosts
/// construct and inject their own instance.
#[derive(Debug, Clone)]
pub struct SessionState {
    clock: LocalClock,
    records: Vec<PlantRecord>,
    tree: RecordTree,
    series: HashMap<ChartMode, Vec<AggregatedPoint>>,
    statistics: PlantStatistics,
    selected_date: Option<NaiveDate>,
    /// Distinct dates with data, ascending
    available_dates: Vec<NaiveDate>,
    expanded_days: HashSet<NaiveDate>,
    expanded_hours: HashSet<(NaiveDate, u32)>,
}

impl SessionState {
    pub fn new(clock: LocalClock) -> Self {
        SessionState {
            clock,
            records: Vec::new(),
            tree: RecordTree::default(),
            series: HashMap::new(),
            statistics: PlantStatistics::default(),
            selected_date: None,
            available_dates: Vec::new(),
            expanded_days: HashSet::new(),
            expanded_hours: HashSet::new(),
        }
    }

    /// Parse a raw payload and replace all derived state on success.
    ///
    /// Failure (empty payload, or zero lines normalized) returns a
    /// [`LoadError`] and leaves any previously loaded dataset intact. A load
    /// with some skipped lines but at least one valid record is a success;
    /// the skip count is reported in the summary.
    pub fn load(&mut self, raw_text: &str) -> Result<LoadSummary, LoadError> {
        if raw_text.trim().is_empty() {
            return Err(LoadError::EmptyOrUnreadable);
        }
        let outcome = parse::parse(raw_text);
        if outcome.records.is_empty() {
            return Err(LoadError::NoValidRecords);
        }

        // Derive everything on locals first; commit only when complete.
        let tree = grouping::group(&outcome.records, &self.clock);
        let available_dates = tree.available_dates();
        let selected_date = available_dates.last().copied();
        let mut series = HashMap::new();
        series.insert(
            ChartMode::Day,
            series::aggregate_daily(&outcome.records, &self.clock),
        );
        if let Some(date) = selected_date {
            series.insert(
                ChartMode::Hour,
                series::aggregate_hourly_for_day(&outcome.records, &self.clock, date),
            );
        }
        let statistics = statistics::compute_statistics(&outcome.records);

        let summary = LoadSummary {
            record_count: outcome.records.len(),
            skipped_lines: outcome.skipped_lines,
            day_count: available_dates.len(),
        };

        self.records = outcome.records;
        self.tree = tree;
        self.series = series;
        self.statistics = statistics;
        self.selected_date = selected_date;
        self.available_dates = available_dates;
        self.expanded_days.clear();
        self.expanded_hours.clear();

        info!(
            "loaded {} records across {} days ({} lines skipped)",
            summary.record_count, summary.day_count, summary.skipped_lines
        );
        Ok(summary)
    }

    /// Reset to the empty initial state, keeping the configured clock.
    pub fn clear(&mut self) {
        *self = SessionState::new(self.clock);
    }

    /// Select a date for the HOUR-mode series. Returns false (and changes
    /// nothing) when the date has no data or nothing is loaded.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if !self.available_dates.contains(&date) {
            return false;
        }
        self.selected_date = Some(date);
        self.series.insert(
            ChartMode::Hour,
            series::aggregate_hourly_for_day(&self.records, &self.clock, date),
        );
        true
    }

    /// Move the selection to the next later date with data. No-op at the
    /// upper boundary (never wraps).
    pub fn next_day(&mut self) {
        if let Some(date) = self.adjacent_date(1) {
            self.select_date(date);
        }
    }

    /// Move the selection to the previous earlier date with data. No-op at
    /// the lower boundary (never wraps).
    pub fn previous_day(&mut self) {
        if let Some(date) = self.adjacent_date(-1) {
            self.select_date(date);
        }
    }

    fn adjacent_date(&self, offset: isize) -> Option<NaiveDate> {
        let current = self.selected_date?;
        let index = self
            .available_dates
            .iter()
            .position(|date| *date == current)? as isize;
        let target = index + offset;
        if target < 0 {
            return None;
        }
        self.available_dates.get(target as usize).copied()
    }

    /// Flip the expansion flag of a day node; no-op if the day is absent.
    pub fn toggle_day_expansion(&mut self, date: NaiveDate) {
        if self.tree.day(date).is_none() {
            return;
        }
        if !self.expanded_days.remove(&date) {
            self.expanded_days.insert(date);
        }
    }

    /// Flip the expansion flag of an hour node; no-op if the node is absent.
    pub fn toggle_hour_expansion(&mut self, date: NaiveDate, hour_of_day: u32) {
        if self.tree.hour(date, hour_of_day).is_none() {
            return;
        }
        let key = (date, hour_of_day);
        if !self.expanded_hours.remove(&key) {
            self.expanded_hours.insert(key);
        }
    }

    pub fn is_day_expanded(&self, date: NaiveDate) -> bool {
        self.expanded_days.contains(&date)
    }

    pub fn is_hour_expanded(&self, date: NaiveDate, hour_of_day: u32) -> bool {
        self.expanded_hours.contains(&(date, hour_of_day))
    }

    pub fn is_loaded(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn tree(&self) -> &RecordTree {
        &self.tree
    }

    /// The current series for a mode; empty when nothing is loaded.
    pub fn series(&self, mode: ChartMode) -> &[AggregatedPoint] {
        self.series.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn statistics(&self) -> &PlantStatistics {
        &self.statistics
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn available_dates(&self) -> &[NaiveDate] {
        &self.available_dates
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::new(LocalClock::default())
    }
}
