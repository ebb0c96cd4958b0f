//! Statistics, series, and format-check commands.

use anyhow::bail;
use ptl_core::local_time::LocalClock;
use ptl_core::parse;
use ptl_data::series::ChartMode;
use ptl_session::SessionState;
use ptl_utils::dates::parse_date;

/// Print global per-channel statistics for an export.
pub fn run_stats(file: &str, json: bool, clock: LocalClock) -> anyhow::Result<()> {
    let raw = crate::read_export(file)?;
    let mut session = SessionState::new(clock);
    session.load(&raw)?;
    let stats = session.statistics();

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("{} records", stats.count);
    for (name, channel) in [
        ("temperature", &stats.temperature),
        ("humidity", &stats.humidity),
        ("lux", &stats.lux),
        ("moisture", &stats.moisture),
    ] {
        println!(
            "{:<12} avg {:>10.2}  min {:>10.2}  max {:>10.2}",
            name, channel.average, channel.minimum, channel.maximum
        );
    }
    Ok(())
}

/// Print an aggregation series for an export.
///
/// Hour mode profiles a single day (the most recent by default); day mode
/// prints the whole multi-day trend.
pub fn run_series(
    file: &str,
    mode: &str,
    date: Option<&str>,
    json: bool,
    clock: LocalClock,
) -> anyhow::Result<()> {
    let chart_mode = match mode {
        "hour" => ChartMode::Hour,
        "day" => ChartMode::Day,
        other => bail!("Unknown mode {:?}: expected \"hour\" or \"day\"", other),
    };

    let raw = crate::read_export(file)?;
    let mut session = SessionState::new(clock);
    session.load(&raw)?;

    if let Some(date) = date {
        if chart_mode != ChartMode::Hour {
            bail!("--date only applies to hour mode");
        }
        let date = parse_date(date)?;
        if !session.select_date(date) {
            bail!("No data for {}", date);
        }
    }

    let points = session.series(chart_mode);
    if json {
        println!("{}", serde_json::to_string_pretty(points)?);
        return Ok(());
    }

    for point in points {
        println!(
            "{:<12} {:>8.2}°C {:>7.2}% {:>9.1}lx {:>7.2}%moist",
            point.label, point.temperature, point.humidity, point.lux, point.moisture
        );
    }
    Ok(())
}

/// Run the advisory format heuristic against a file.
pub fn run_check(file: &str) -> anyhow::Result<()> {
    let raw = crate::read_export(file)?;
    if parse::looks_like_plant_csv(&raw) {
        println!("{}: looks like a plant telemetry CSV", file);
    } else {
        println!("{}: does not look like a plant telemetry CSV", file);
    }
    Ok(())
}
