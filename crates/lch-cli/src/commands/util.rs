//! Shared helpers for command implementations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lch_core::{RegionSet, parse_report};

/// Reads and parses a closure report file.
///
/// Wall-clock opening times are resolved against `date`, defaulting to
/// today's UTC date.
pub fn load_report(path: &Path, date: Option<NaiveDate>) -> Result<RegionSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let set = parse_report(text.lines(), date)
        .with_context(|| format!("failed to parse report {}", path.display()))?;
    tracing::debug!(report = %path.display(), regions = set.len(), "report loaded");
    Ok(set)
}

/// Parses a query time as RFC 3339 or naive `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn parse_time(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    bail!("cannot parse {text:?} as a time; use RFC 3339 or YYYY-MM-DD HH:MM:SS")
}
