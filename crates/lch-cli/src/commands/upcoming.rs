//! Upcoming command: closures ahead of a reference time, across regions.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use lch_core::{RegionSet, Window};
use serde::Serialize;

use super::util::{load_report, parse_time};

/// One upcoming closure, labeled with the region it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingClosure {
    pub region: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
    /// Seconds until the closure starts; negative when already closed.
    pub starts_in_seconds: i64,
}

/// Collects every closure with an endpoint inside the horizon, labeled
/// and ordered by start time.
pub fn collect(
    set: &RegionSet,
    limit: Duration,
    reference: DateTime<Utc>,
) -> Vec<UpcomingClosure> {
    let mut rows: Vec<UpcomingClosure> = set
        .iter()
        .flat_map(|region| {
            region
                .closures()
                .filter(|c| c.upcoming_within(limit, reference))
                .map(|c| UpcomingClosure {
                    region: region.name().to_string(),
                    start: c.start(),
                    end: c.end(),
                    duration_seconds: c.duration().num_seconds(),
                    starts_in_seconds: c.time_until(reference).num_seconds(),
                })
        })
        .collect();
    rows.sort_by_key(|row| row.start);
    rows
}

pub fn run<W: Write>(
    writer: &mut W,
    report: &Path,
    date: Option<NaiveDate>,
    at: Option<&str>,
    within_minutes: i64,
    json: bool,
) -> Result<()> {
    let set = load_report(report, date)?;
    let reference = match at {
        Some(text) => parse_time(text)?,
        None => Utc::now(),
    };
    let rows = collect(&set, Duration::minutes(within_minutes), reference);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &rows)?;
        writeln!(writer)?;
        return Ok(());
    }

    if rows.is_empty() {
        writeln!(writer, "No closures within {within_minutes} minutes.")?;
        return Ok(());
    }
    for row in &rows {
        let when = if row.starts_in_seconds >= 0 {
            format!("in {} s", row.starts_in_seconds)
        } else {
            "in progress".to_string()
        };
        writeln!(
            writer,
            "{}  {:15} closed {} s  ({when})",
            row.start.format("%H:%M:%S"),
            row.region,
            row.duration_seconds,
        )?;
    }
    Ok(())
}
