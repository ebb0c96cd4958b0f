//! Drill-down inspection of a telemetry export.

use log::info;
use ptl_core::local_time::LocalClock;
use ptl_session::SessionState;
use ptl_utils::dates::{format_date, format_hour_label};

/// Load an export and print its day/hour tree with per-node averages.
pub fn run_inspect(file: &str, clock: LocalClock) -> anyhow::Result<()> {
    let raw = crate::read_export(file)?;
    let mut session = SessionState::new(clock);
    let summary = session.load(&raw)?;

    info!(
        "{}: {} records, {} days, {} lines skipped",
        file, summary.record_count, summary.day_count, summary.skipped_lines
    );

    for day in &session.tree().days {
        let averages = day.averages();
        println!(
            "{} ({}) — {} records, avg {:.1}°C {:.1}% {:.0}lx {:.1}%moist",
            format_date(&day.date),
            day.weekday_name,
            day.record_count(),
            averages.temperature,
            averages.humidity,
            averages.lux,
            averages.moisture,
        );
        for hour in &day.hours {
            let averages = hour.averages();
            println!(
                "  {} — {} records, avg {:.1}°C {:.1}% {:.0}lx {:.1}%moist",
                format_hour_label(hour.hour_of_day),
                hour.records.len(),
                averages.temperature,
                averages.humidity,
                averages.lux,
                averages.moisture,
            );
        }
    }

    if summary.skipped_lines > 0 {
        println!("({} malformed lines skipped)", summary.skipped_lines);
    }
    Ok(())
}
