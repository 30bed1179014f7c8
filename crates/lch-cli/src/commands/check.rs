//! Check command: point-in-time clearance queries.

use std::io::Write;
use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use lch_core::{EquatorialCoord, RegionSet};

use super::util::{load_report, parse_time};

/// What the clearance question is about.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    /// A named region's own schedule.
    Region(String),
    /// A sky location, answered across every covering region.
    Location(EquatorialCoord),
}

/// Whether propagation is allowed toward `place` at `time`.
///
/// Unknown region names are an error; an uncovered location is not, and
/// conservatively reports closed.
pub fn clearance(set: &RegionSet, place: &Place, time: DateTime<Utc>) -> Result<bool> {
    match place {
        Place::Region(name) => match set.get(name) {
            Some(region) => Ok(region.open(time)),
            None => bail!("no region named {name:?} in this report"),
        },
        Place::Location(location) => Ok(set.open(location, time)),
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    report: &Path,
    date: Option<NaiveDate>,
    at: &str,
    region: Option<&str>,
    ra: Option<f64>,
    dec: Option<f64>,
) -> Result<bool> {
    let set = load_report(report, date)?;
    let time = parse_time(at)?;
    let place = match (region, ra, dec) {
        (Some(name), _, _) => Place::Region(name.to_string()),
        (None, Some(ra), Some(dec)) => Place::Location(EquatorialCoord::new(ra, dec)),
        _ => bail!("specify either --region or both --ra and --dec"),
    };

    let allowed = clearance(&set, &place, time)?;
    writeln!(writer, "{}", if allowed { "open" } else { "closed" })?;
    Ok(allowed)
}
