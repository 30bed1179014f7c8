//! The closure-report parser.
//!
//! A closure report has no fixed schema: header, blank, region-definition,
//! opening, and summary lines are distinguished by content, not position.
//! The parser tracks a small state indicating how to interpret the next
//! line and folds each line into a [`RegionSet`] under construction.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::grammar::{parse_opening_compact, parse_opening_line, parse_summary_line};
use crate::region::Region;
use crate::region_set::RegionSet;
use crate::window::{InvalidInterval, Opening, Window};

/// How the next line of the report will be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// The report title line.
    Header,
    /// The separator after the header.
    Blank,
    /// A starlist-formatted region definition.
    Starlist,
    /// The first opening line of a region block.
    Opening,
    /// End of a region block: a further opening, a summary, or a blank.
    Unknown,
}

impl ParserState {
    /// What the parser expected to find, for error messages.
    #[must_use]
    pub const fn expected(self) -> &'static str {
        match self {
            Self::Header => "report header",
            Self::Blank => "blank separator",
            Self::Starlist => "region definition",
            Self::Opening => "opening window",
            Self::Unknown => "opening, summary, or blank",
        }
    }
}

/// Fatal parse failures. No partial [`RegionSet`] survives any of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// A line did not match the grammar for the current state.
    #[error("line {line}: expected {expected}, cannot parse {text:?}")]
    GrammarMismatch {
        line: usize,
        expected: &'static str,
        text: String,
    },

    /// A stated opening duration disagrees with the computed interval.
    #[error(
        "line {line}: stated opening duration {stated} s does not match \
         computed {computed} s in {text:?}"
    )]
    DurationMismatch {
        line: usize,
        text: String,
        stated: i64,
        computed: i64,
    },

    /// A window or derived closure would have `end <= start`.
    #[error("region {region:?}: {source}")]
    InvalidInterval {
        region: String,
        #[source]
        source: InvalidInterval,
    },
}

/// The last opening line of the current region block, buffered so a
/// trailing `Closure(sec) N` annotation can be resolved once the block
/// ends.
#[derive(Debug, Clone, Copy)]
struct PendingOpening {
    end: DateTime<Utc>,
    trailing: Option<Duration>,
}

/// Line-by-line closure report parser.
#[derive(Debug)]
pub struct ReportParser {
    date: NaiveDate,
    day_boundary: Duration,
    state: ParserState,
    regions: RegionSet,
    current: Option<usize>,
    pending: Option<PendingOpening>,
    line_number: usize,
}

impl ReportParser {
    /// Creates a parser whose wall-clock opening times are resolved
    /// against `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day_boundary: Duration::hours(12),
            state: ParserState::Header,
            regions: RegionSet::new(),
            current: None,
            pending: None,
            line_number: 0,
        }
    }

    /// Overrides the report's nominal day boundary, the span past a
    /// region's first opening at which a synthesized trailing opening
    /// ends. The report-format convention is 12 hours.
    #[must_use]
    pub const fn with_day_boundary(mut self, day_boundary: Duration) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    /// The state the next line will be interpreted in.
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    /// Consumes one line of the report.
    pub fn feed_line(&mut self, raw: &str) -> Result<(), ParseError> {
        self.line_number += 1;
        let line = raw.trim_end();
        match self.state {
            ParserState::Header => {
                tracing::trace!(line, "skipping report header");
                self.state = ParserState::Blank;
            }
            ParserState::Blank => {
                self.state = ParserState::Starlist;
            }
            ParserState::Starlist => self.handle_starlist(line)?,
            ParserState::Opening => self.handle_opening(line)?,
            ParserState::Unknown => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    self.finalize_pending()?;
                    self.state = ParserState::Starlist;
                } else if trimmed.starts_with("First") {
                    self.finalize_pending()?;
                    self.handle_summary(trimmed)?;
                } else {
                    self.handle_opening(line)?;
                }
            }
        }
        Ok(())
    }

    /// Finalizes the trailing region and returns the completed set.
    ///
    /// A report that ends without a trailing blank line is finalized
    /// here, so a dangling `Closure(sec)` annotation is never dropped.
    pub fn finish(mut self) -> Result<RegionSet, ParseError> {
        self.finalize_pending()?;
        Ok(self.regions)
    }

    fn handle_starlist(&mut self, line: &str) -> Result<(), ParseError> {
        let region = Region::from_starlist(line).map_err(|_| self.mismatch(line))?;
        tracing::debug!(region = %region.name(), "region defined");
        self.current = Some(self.regions.insert(region));
        self.state = ParserState::Opening;
        Ok(())
    }

    fn handle_opening(&mut self, line: &str) -> Result<(), ParseError> {
        // Only the human format's trailing annotation participates in the
        // finalize rule; the compact format's fourth field is a stated
        // closure duration, not a dangling remainder.
        let (record, trailing) = match parse_opening_line(line, self.date) {
            Some(record) => (record, record.closure),
            None => match parse_opening_compact(line) {
                Some(record) => (record, None),
                None => return Err(self.mismatch(line)),
            },
        };

        let computed = record.end - record.start;
        if (computed - record.opening).num_seconds().abs() > 1 {
            return Err(ParseError::DurationMismatch {
                line: self.line_number,
                text: line.to_string(),
                stated: record.opening.num_seconds(),
                computed: computed.num_seconds(),
            });
        }

        let Some(at) = self.current else {
            return Err(self.mismatch(line));
        };
        let Some(region) = self.regions.get_index_mut(at) else {
            return Err(self.mismatch(line));
        };
        let opening = Opening::new(record.start, record.end).map_err(|source| {
            ParseError::InvalidInterval {
                region: region.name().to_string(),
                source,
            }
        })?;
        region.add(opening);

        self.pending = Some(PendingOpening {
            end: opening.end(),
            trailing,
        });
        self.state = ParserState::Unknown;
        Ok(())
    }

    fn handle_summary(&mut self, line: &str) -> Result<(), ParseError> {
        let record = parse_summary_line(line).ok_or_else(|| ParseError::GrammarMismatch {
            line: self.line_number,
            expected: "closure summary",
            text: line.to_string(),
        })?;
        tracing::debug!(ordinal = %record.ordinal, objects = record.objects, "summary recorded");
        self.regions.record_summary(record);
        self.state = ParserState::Unknown;
        Ok(())
    }

    /// Applies the finalize-trailing-opening rule for the region block
    /// that just ended, then validates the region's gaps.
    ///
    /// Runs at most once per block: the pending buffer is taken, so a
    /// second trigger is a no-op.
    fn finalize_pending(&mut self) -> Result<(), ParseError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let Some(at) = self.current else {
            return Ok(());
        };
        let Some(region) = self.regions.get_index_mut(at) else {
            return Ok(());
        };

        if let Some(remaining) = pending.trailing {
            let Some(first) = region.openings().first().copied() else {
                return Ok(());
            };
            let start = pending.end + remaining;
            let end = first.start() + self.day_boundary;
            let opening =
                Opening::new(start, end).map_err(|source| ParseError::InvalidInterval {
                    region: region.name().to_string(),
                    source,
                })?;
            tracing::debug!(
                region = %region.name(),
                %start,
                %end,
                "synthesized trailing opening"
            );
            region.add(opening);
        }

        region
            .validate_gaps()
            .map_err(|source| ParseError::InvalidInterval {
                region: region.name().to_string(),
                source,
            })
    }

    fn mismatch(&self, line: &str) -> ParseError {
        ParseError::GrammarMismatch {
            line: self.line_number,
            expected: self.state.expected(),
            text: line.to_string(),
        }
    }
}

/// A parser resolving wall-clock times against today's UTC date.
impl Default for ReportParser {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

/// Parses a whole closure report from a sequence of text lines.
///
/// Either every line parses and the completed [`RegionSet`] is returned,
/// or the first failure aborts with its line number and raw text.
pub fn parse_report<I>(lines: I, date: NaiveDate) -> Result<RegionSet, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut parser = ReportParser::new(date);
    for line in lines {
        parser.feed_line(line.as_ref())?;
    }
    parser.finish()
}
