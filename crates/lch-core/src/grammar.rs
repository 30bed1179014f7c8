//! Line grammars for closure reports.
//!
//! Pure line classifiers: each function inspects one line of text and
//! extracts a record, or returns `None` when the line does not match.
//! Attaching line numbers and deciding whether a mismatch is fatal is the
//! parser's job.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::Serialize;

/// Human-format opening line:
/// `HH:MM:SS  HH:MM:SS  open(min:sec) MM:SS  [Closure(sec) N]`.
static OPENING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<start>\d{2}:\d{2}:\d{2})\s*(?P<end>\d{2}:\d{2}:\d{2})\s*open\(min:sec\) (?P<opening>\d{2,4}:\d{2})\s*(?:Closure\(sec\)\s*(?P<closure>\d+))?",
    )
    .expect("opening regex is valid")
});

/// Compact opening line: `epochStart epochEnd openingSecs closureSecs`.
static COMPACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<start>\d{10})\s+(?P<end>\d{10})\s+(?P<opening>\d+)\s+(?P<closure>\d+)\s*$")
        .expect("compact opening regex is valid")
});

/// Summary line: `<ordinal> <N> objects: total time of closures: <secs>`
/// or `... total number of closures: <count>`.
static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<ordinal>\w+)\s+(?P<objects>\d+)\s+objects:\s+(?:total time of closures:\s+(?P<time>\d+(?:\.\d+)?)|total number of closures:\s+(?P<number>\d+))\s*$",
    )
    .expect("summary regex is valid")
});

/// One parsed opening line, in either format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Stated opening duration, checked against `end - start`.
    pub opening: Duration,
    /// Stated duration of the closure following this opening, if any.
    pub closure: Option<Duration>,
}

/// The trailing clause of a summary line; exactly one appears per line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryDetail {
    TotalClosureTime { seconds: f64 },
    TotalClosureCount { count: u32 },
}

/// One parsed summary line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    /// Ordinal word introducing the block, e.g. `First`.
    pub ordinal: String,
    /// Number of objects the summary claims to cover.
    pub objects: u32,
    pub detail: SummaryDetail,
}

/// Parses a human-format opening line, joining its wall-clock times with
/// the reference `date`.
pub fn parse_opening_line(line: &str, date: NaiveDate) -> Option<OpeningRecord> {
    let caps = OPENING_RE.captures(line)?;
    Some(OpeningRecord {
        start: wall_clock(date, &caps["start"])?,
        end: wall_clock(date, &caps["end"])?,
        opening: parse_min_sec(&caps["opening"])?,
        closure: match caps.name("closure") {
            Some(m) => Some(parse_min_sec(m.as_str())?),
            None => None,
        },
    })
}

/// Parses a compact four-integer opening line. Epoch values are Unix
/// timestamps, UTC.
pub fn parse_opening_compact(line: &str) -> Option<OpeningRecord> {
    let caps = COMPACT_RE.captures(line)?;
    Some(OpeningRecord {
        start: DateTime::from_timestamp(caps["start"].parse().ok()?, 0)?,
        end: DateTime::from_timestamp(caps["end"].parse().ok()?, 0)?,
        opening: parse_min_sec(&caps["opening"])?,
        closure: Some(parse_min_sec(&caps["closure"])?),
    })
}

/// Parses a summary line.
pub fn parse_summary_line(line: &str) -> Option<SummaryRecord> {
    let caps = SUMMARY_RE.captures(line)?;
    let detail = if let Some(time) = caps.name("time") {
        SummaryDetail::TotalClosureTime {
            seconds: time.as_str().parse().ok()?,
        }
    } else {
        SummaryDetail::TotalClosureCount {
            count: caps["number"].parse().ok()?,
        }
    };
    Some(SummaryRecord {
        ordinal: caps["ordinal"].to_string(),
        objects: caps["objects"].parse().ok()?,
        detail,
    })
}

fn wall_clock(date: NaiveDate, hms: &str) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(hms, "%H:%M:%S").ok()?;
    Some(date.and_time(time).and_utc())
}

/// Duration fields: `MM:SS` means minutes and seconds, a bare integer
/// means seconds.
fn parse_min_sec(text: &str) -> Option<Duration> {
    let seconds = match text.split_once(':') {
        Some((minutes, seconds)) => {
            minutes.parse::<i64>().ok()? * 60 + seconds.parse::<i64>().ok()?
        }
        None => text.parse::<i64>().ok()?,
    };
    Some(Duration::seconds(seconds))
}
