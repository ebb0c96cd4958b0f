//! Command implementations for the PTL CLI.
//!
//! Provides subcommands for inspecting local plant telemetry exports:
//! drill-down tree summaries, global statistics, chart series, and the
//! format pre-check.

use anyhow::Context;
use clap::Subcommand;
use ptl_core::local_time::LocalClock;

pub mod inspect;
pub mod report;

#[derive(Subcommand)]
pub enum Command {
    /// Load an export and print the day/hour drill-down summary
    Inspect {
        /// Path to the telemetry CSV export
        file: String,

        /// IANA timezone for calendar bucketing (defaults to the device zone)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Print global per-channel statistics for an export
    Stats {
        /// Path to the telemetry CSV export
        file: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// IANA timezone for calendar bucketing (defaults to the device zone)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Print an aggregation series (per-hour profile or per-day trend)
    Series {
        /// Path to the telemetry CSV export
        file: String,

        /// Aggregation mode: "hour" or "day"
        #[arg(short, long)]
        mode: String,

        /// Day to profile in hour mode, YYYY-MM-DD (defaults to most recent)
        #[arg(short, long)]
        date: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// IANA timezone for calendar bucketing (defaults to the device zone)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Check whether a file looks like a plant telemetry CSV
    Check {
        /// Path to the candidate file
        file: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Inspect { file, timezone } => {
            inspect::run_inspect(&file, clock_for(timezone.as_deref())?)
        }
        Command::Stats {
            file,
            json,
            timezone,
        } => report::run_stats(&file, json, clock_for(timezone.as_deref())?),
        Command::Series {
            file,
            mode,
            date,
            json,
            timezone,
        } => report::run_series(
            &file,
            &mode,
            date.as_deref(),
            json,
            clock_for(timezone.as_deref())?,
        ),
        Command::Check { file } => report::run_check(&file),
    }
}

/// Build the bucketing clock, from the flag when given.
fn clock_for(timezone: Option<&str>) -> anyhow::Result<LocalClock> {
    match timezone {
        Some(name) => {
            let tz = name
                .parse()
                .map_err(|e| anyhow::anyhow!("Unknown timezone {:?}: {}", name, e))?;
            Ok(LocalClock::new(tz))
        }
        None => Ok(LocalClock::default()),
    }
}

/// Read an export file; the only true I/O in the toolkit.
pub(crate) fn read_export(file: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))
}
