//! A named sky region and its opening schedule.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coords::EquatorialCoord;
use crate::starlist::{StarlistError, parse_starlist_line};
use crate::window::{Closure, InvalidInterval, Opening, Window, WindowEvent};

/// A sky region subject to its own opening/closure schedule.
///
/// Openings are kept sorted by start time; closures are never stored and
/// are derived on demand from the gaps between consecutive openings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    name: String,
    center: EquatorialCoord,
    radius_deg: f64,
    openings: Vec<Opening>,
}

impl Region {
    /// Clearance radius around a region center: 2 arcminutes.
    pub const DEFAULT_RADIUS_DEG: f64 = 2.0 / 60.0;

    #[must_use]
    pub fn new(name: impl Into<String>, center: EquatorialCoord) -> Self {
        Self {
            name: name.into(),
            center,
            radius_deg: Self::DEFAULT_RADIUS_DEG,
            openings: Vec::new(),
        }
    }

    /// Overrides the containment radius, in degrees.
    #[must_use]
    pub fn with_radius(mut self, radius_deg: f64) -> Self {
        self.radius_deg = radius_deg;
        self
    }

    /// Builds a region from a starlist-formatted definition line.
    pub fn from_starlist(line: &str) -> Result<Self, StarlistError> {
        let target = parse_starlist_line(line)?;
        Ok(Self::new(target.name, target.position))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn center(&self) -> EquatorialCoord {
        self.center
    }

    #[must_use]
    pub const fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    /// The openings of this region, sorted by start time.
    #[must_use]
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    /// Inserts an opening at its sorted position.
    ///
    /// Re-adding an opening with identical endpoints is a no-op.
    pub fn add(&mut self, opening: Opening) {
        if self.openings.contains(&opening) {
            return;
        }
        let at = self
            .openings
            .partition_point(|existing| existing.start() <= opening.start());
        self.openings.insert(at, opening);
    }

    /// True iff some opening strictly contains `time`.
    ///
    /// Boundary instants are not open: a query at an opening's exact
    /// start or end reports closed.
    #[must_use]
    pub fn open(&self, time: DateTime<Utc>) -> bool {
        self.openings
            .iter()
            .any(|o| time > o.start() && time < o.end())
    }

    #[must_use]
    pub fn closed(&self, time: DateTime<Utc>) -> bool {
        !self.open(time)
    }

    /// Whether `location` falls within this region's radius of its center.
    ///
    /// Total over all inputs: an unresolvable separation degrades to
    /// `false` so clearance queries stay answerable.
    #[must_use]
    pub fn contains(&self, location: &EquatorialCoord) -> bool {
        let sep = self.center.separation_deg(location);
        if !sep.is_finite() {
            tracing::warn!(
                region = %self.name,
                %location,
                "unresolvable separation, treating location as not contained"
            );
            return false;
        }
        sep < self.radius_deg
    }

    /// Derived closures: the gaps between consecutive openings.
    ///
    /// A region with fewer than two openings yields nothing.
    pub fn closures(&self) -> impl Iterator<Item = Closure> + '_ {
        self.openings
            .windows(2)
            .map(|pair| Closure::gap(&pair[0], &pair[1]))
    }

    /// Chronological schedule: openings interleaved with the closures
    /// between them.
    ///
    /// Empty for a region with no openings; a single opening yields just
    /// that opening.
    pub fn events(&self) -> impl Iterator<Item = WindowEvent> + '_ {
        self.openings.iter().enumerate().flat_map(move |(i, opening)| {
            let gap = self
                .openings
                .get(i + 1)
                .map(|next| WindowEvent::Closure(Closure::gap(opening, next)));
            std::iter::once(WindowEvent::Opening(*opening)).chain(gap)
        })
    }

    /// Checks that every pair of consecutive openings leaves a real gap.
    ///
    /// A violation means the report carried overlapping or touching
    /// openings; the parser surfaces it as a parse error rather than
    /// letting a derived closure invert.
    pub fn validate_gaps(&self) -> Result<(), InvalidInterval> {
        for pair in self.openings.windows(2) {
            if pair[0].end() >= pair[1].start() {
                return Err(InvalidInterval {
                    start: pair[0].end(),
                    end: pair[1].start(),
                });
            }
        }
        Ok(())
    }
}

/// Batch append: all openings are inserted, then sorted once.
impl Extend<Opening> for Region {
    fn extend<I: IntoIterator<Item = Opening>>(&mut self, iter: I) {
        for opening in iter {
            if !self.openings.contains(&opening) {
                self.openings.push(opening);
            }
        }
        self.openings.sort_by_key(Window::start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 7, h, m, s).unwrap()
    }

    fn opening(start: (u32, u32, u32), end: (u32, u32, u32)) -> Opening {
        Opening::new(at(start.0, start.1, start.2), at(end.0, end.1, end.2)).unwrap()
    }

    fn zenith() -> Region {
        Region::new("lazer_zenith", EquatorialCoord::new(187.5, 40.0))
    }

    #[test]
    fn add_keeps_openings_sorted() {
        let mut region = zenith();
        region.add(opening((13, 0, 0), (13, 30, 0)));
        region.add(opening((11, 0, 0), (11, 50, 30)));
        region.add(opening((12, 0, 0), (12, 45, 0)));

        let starts: Vec<_> = region.openings().iter().map(Window::start).collect();
        assert_eq!(starts, vec![at(11, 0, 0), at(12, 0, 0), at(13, 0, 0)]);
    }

    #[test]
    fn add_is_idempotent() {
        let mut region = zenith();
        region.add(opening((11, 0, 0), (11, 50, 30)));
        region.add(opening((11, 0, 0), (11, 50, 30)));
        assert_eq!(region.openings().len(), 1);
    }

    #[test]
    fn extend_sorts_once() {
        let mut region = zenith();
        region.extend([
            opening((13, 0, 0), (13, 30, 0)),
            opening((11, 0, 0), (11, 50, 30)),
            opening((11, 0, 0), (11, 50, 30)),
        ]);
        assert_eq!(region.openings().len(), 2);
        assert_eq!(region.openings()[0].start(), at(11, 0, 0));
    }

    #[test]
    fn open_is_strict_interior() {
        let mut region = zenith();
        region.add(opening((11, 0, 0), (11, 50, 30)));

        assert!(region.open(at(11, 30, 0)));
        assert!(!region.open(at(11, 0, 0)));
        assert!(!region.open(at(11, 50, 30)));
        assert!(!region.open(at(11, 55, 0)));
    }

    #[test]
    fn open_and_closed_are_complements() {
        let mut region = zenith();
        region.add(opening((11, 0, 0), (11, 50, 30)));
        region.add(opening((12, 0, 0), (12, 45, 0)));

        for time in [
            at(10, 0, 0),
            at(11, 0, 0),
            at(11, 30, 0),
            at(11, 55, 0),
            at(12, 30, 0),
            at(13, 0, 0),
        ] {
            assert_eq!(region.open(time), !region.closed(time));
        }
    }

    #[test]
    fn closure_count_is_openings_minus_one() {
        let mut region = zenith();
        assert_eq!(region.closures().count(), 0);

        region.add(opening((11, 0, 0), (11, 50, 30)));
        assert_eq!(region.closures().count(), 0);

        region.add(opening((12, 0, 0), (12, 45, 0)));
        region.add(opening((13, 0, 0), (13, 30, 0)));
        assert_eq!(region.closures().count(), 2);
    }

    #[test]
    fn closures_span_the_gaps() {
        let mut region = zenith();
        region.add(opening((11, 0, 0), (11, 50, 30)));
        region.add(opening((11, 51, 15), (12, 45, 0)));

        let closures: Vec<_> = region.closures().collect();
        assert_eq!(closures.len(), 1);
        assert_eq!(closures[0].start(), at(11, 50, 30));
        assert_eq!(closures[0].end(), at(11, 51, 15));
    }

    #[test]
    fn events_interleave_and_alternate() {
        let mut region = zenith();
        region.add(opening((11, 0, 0), (11, 30, 0)));
        region.add(opening((12, 0, 0), (12, 30, 0)));
        region.add(opening((13, 0, 0), (13, 30, 0)));

        let events: Vec<_> = region.events().collect();
        assert_eq!(events.len(), 5);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.propagate(), i % 2 == 0);
        }
    }

    #[test]
    fn events_for_zero_or_one_openings() {
        let mut region = zenith();
        assert_eq!(region.events().count(), 0);

        region.add(opening((11, 0, 0), (11, 30, 0)));
        let events: Vec<_> = region.events().collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].propagate());
    }

    #[test]
    fn contains_uses_radius() {
        let region = zenith();
        assert!(region.contains(&EquatorialCoord::new(187.5, 40.01)));
        assert!(!region.contains(&EquatorialCoord::new(190.0, 40.0)));
    }

    #[test]
    fn contains_is_fail_safe_for_bad_locations() {
        let region = zenith();
        assert!(!region.contains(&EquatorialCoord::new(f64::NAN, f64::NAN)));
    }

    #[test]
    fn validate_gaps_rejects_touching_openings() {
        let mut region = zenith();
        region.add(opening((11, 0, 0), (12, 0, 0)));
        region.add(opening((12, 0, 0), (13, 0, 0)));
        assert!(region.validate_gaps().is_err());

        let mut ok = zenith();
        ok.add(opening((11, 0, 0), (12, 0, 0)));
        ok.add(opening((12, 0, 1), (13, 0, 0)));
        assert!(ok.validate_gaps().is_ok());
    }

    #[test]
    fn from_starlist_builds_named_region() {
        let region =
            Region::from_starlist("lazer_zenith    12 30 00.0 +40 00 00.0 2000 lgs=1").unwrap();
        assert_eq!(region.name(), "lazer_zenith");
        assert!((region.center().ra_deg - 187.5).abs() < 1e-9);
        assert!((region.radius_deg() - Region::DEFAULT_RADIUS_DEG).abs() < f64::EPSILON);
    }
}
