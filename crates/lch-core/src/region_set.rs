//! The complete collection of regions parsed from one closure report.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::coords::EquatorialCoord;
use crate::grammar::{SummaryDetail, SummaryRecord};
use crate::region::Region;
use crate::window::{Closure, Window};

/// Insertion-ordered mapping from region name to [`Region`], plus the
/// cross-region query operations.
///
/// Built once by the parser, then read-mostly. Name lookup and positional
/// lookup are distinct operations.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
    index: HashMap<String, usize>,
    summaries: Vec<SummaryRecord>,
}

/// A recorded summary line that disagrees with the derived statistics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummaryMismatch {
    #[error("summary states {stated} closures, derived {derived}")]
    ClosureCount { stated: u32, derived: usize },

    #[error("summary states {stated:.1} s of closures, derived {derived:.1} s")]
    ClosureDuration { stated: f64, derived: f64 },
}

impl RegionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a region, returning its position.
    ///
    /// Re-defining an existing name replaces the region in place,
    /// preserving its original position.
    pub fn insert(&mut self, region: Region) -> usize {
        match self.index.get(region.name()) {
            Some(&at) => {
                self.regions[at] = region;
                at
            }
            None => {
                let at = self.regions.len();
                self.index.insert(region.name().to_string(), at);
                self.regions.push(region);
                at
            }
        }
    }

    /// Looks a region up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.index.get(name).map(|&at| &self.regions[at])
    }

    /// Looks a region up by insertion position.
    #[must_use]
    pub fn get_index(&self, at: usize) -> Option<&Region> {
        self.regions.get(at)
    }

    pub(crate) fn get_index_mut(&mut self, at: usize) -> Option<&mut Region> {
        self.regions.get_mut(at)
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(Region::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// True iff any region covers `location`.
    #[must_use]
    pub fn contains(&self, location: &EquatorialCoord) -> bool {
        self.regions.iter().any(|r| r.contains(location))
    }

    /// Whether laser propagation toward `location` is allowed at `time`.
    ///
    /// Every region covering the location must report open. An uncovered
    /// location has no applicable schedule and conservatively reports
    /// `false`; the first covering region that reports closed settles the
    /// query.
    #[must_use]
    pub fn open(&self, location: &EquatorialCoord, time: DateTime<Utc>) -> bool {
        let mut covered = false;
        for region in &self.regions {
            if region.contains(location) {
                if region.closed(time) {
                    return false;
                }
                covered = true;
            }
        }
        covered
    }

    #[must_use]
    pub fn closed(&self, location: &EquatorialCoord, time: DateTime<Utc>) -> bool {
        !self.open(location, time)
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Total number of derived closures across all regions.
    #[must_use]
    pub fn total_closure_count(&self) -> usize {
        self.regions
            .iter()
            .map(|r| r.openings().len().saturating_sub(1))
            .sum()
    }

    /// Summed duration of every derived closure across all regions.
    #[must_use]
    pub fn total_closure_duration(&self) -> Duration {
        self.regions
            .iter()
            .flat_map(Region::closures)
            .fold(Duration::zero(), |total, c| total + c.duration())
    }

    /// Every closure whose start or end falls within
    /// `(reference, reference + limit)`, across all regions, sorted by
    /// start time.
    #[must_use]
    pub fn upcoming_closures(&self, limit: Duration, reference: DateTime<Utc>) -> Vec<Closure> {
        upcoming_closures(&self.regions, limit, reference)
    }

    /// Folds a parsed summary line into the set's verification state.
    pub fn record_summary(&mut self, record: SummaryRecord) {
        self.summaries.push(record);
    }

    /// The summary lines recorded during parse, in order.
    #[must_use]
    pub fn summaries(&self) -> &[SummaryRecord] {
        &self.summaries
    }

    /// Checks recorded summary lines against the derived statistics.
    ///
    /// Only summaries claiming to cover the whole set are checkable;
    /// partial-block summaries are skipped. Durations are compared with a
    /// one-second tolerance, matching the opening-line rule.
    #[must_use]
    pub fn verify(&self) -> Vec<SummaryMismatch> {
        let mut mismatches = Vec::new();
        for summary in &self.summaries {
            if summary.objects as usize != self.region_count() {
                tracing::debug!(
                    objects = summary.objects,
                    regions = self.region_count(),
                    "skipping partial-block summary"
                );
                continue;
            }
            match summary.detail {
                SummaryDetail::TotalClosureCount { count } => {
                    let derived = self.total_closure_count();
                    if derived != count as usize {
                        mismatches.push(SummaryMismatch::ClosureCount {
                            stated: count,
                            derived,
                        });
                    }
                }
                SummaryDetail::TotalClosureTime { seconds } => {
                    #[expect(clippy::cast_precision_loss, reason = "durations are small")]
                    let derived = self.total_closure_duration().num_milliseconds() as f64 / 1e3;
                    if (derived - seconds).abs() > 1.0 {
                        mismatches.push(SummaryMismatch::ClosureDuration {
                            stated: seconds,
                            derived,
                        });
                    }
                }
            }
        }
        mismatches
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Upcoming closures across any collection of regions: every derived
/// closure with an endpoint strictly inside `(reference, reference +
/// limit)`, sorted ascending by start.
pub fn upcoming_closures<'a, I>(
    regions: I,
    limit: Duration,
    reference: DateTime<Utc>,
) -> Vec<Closure>
where
    I: IntoIterator<Item = &'a Region>,
{
    let mut upcoming: Vec<Closure> = regions
        .into_iter()
        .flat_map(Region::closures)
        .filter(|c| c.upcoming_within(limit, reference))
        .collect();
    upcoming.sort_by_key(Window::start);
    upcoming
}
