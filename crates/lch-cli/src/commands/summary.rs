//! Summary command: derived statistics for a whole report.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use lch_core::RegionSet;
use serde::Serialize;

use super::util::load_report;

/// Derived report statistics, plus summary-line verification.
#[derive(Debug, Serialize)]
pub struct SummaryData {
    pub regions: usize,
    pub closures: usize,
    pub closure_seconds: i64,
    /// Human-readable descriptions of summary-line disagreements.
    pub mismatches: Vec<String>,
}

pub fn collect(set: &RegionSet) -> SummaryData {
    SummaryData {
        regions: set.region_count(),
        closures: set.total_closure_count(),
        closure_seconds: set.total_closure_duration().num_seconds(),
        mismatches: set.verify().iter().map(ToString::to_string).collect(),
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    report: &Path,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let set = load_report(report, date)?;
    let data = collect(&set);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &data)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Regions:      {}", data.regions)?;
    writeln!(writer, "Closures:     {}", data.closures)?;
    writeln!(writer, "Closed time:  {} s", data.closure_seconds)?;
    if data.mismatches.is_empty() {
        writeln!(writer, "Summaries:    consistent")?;
    } else {
        writeln!(writer, "Summaries:    INCONSISTENT")?;
        for mismatch in &data.mismatches {
            writeln!(writer, "  - {mismatch}")?;
        }
    }
    Ok(())
}
