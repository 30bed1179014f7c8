//! Opening and closure time windows.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

/// A window whose end does not come after its start.
///
/// Unreachable from well-formed report input; raised when parsed or
/// synthesized interval endpoints are inverted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("window end {end} is not after start {start}")]
pub struct InvalidInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Common behavior of laser clearance windows.
///
/// A window is a time interval during which laser propagation toward a
/// region is either permitted (an [`Opening`]) or forbidden (a
/// [`Closure`]). Point queries treat the endpoints themselves as
/// closed.
pub trait Window {
    /// When the window begins.
    fn start(&self) -> DateTime<Utc>;

    /// When the window ends.
    fn end(&self) -> DateTime<Utc>;

    /// Whether laser propagation is permitted during this window.
    fn propagate(&self) -> bool;

    /// Length of the window. Positive for any validly constructed window.
    fn duration(&self) -> Duration {
        self.end() - self.start()
    }

    /// Time from `reference` until this window starts.
    ///
    /// Negative once the window has already begun.
    fn time_until(&self, reference: DateTime<Utc>) -> Duration {
        self.start() - reference
    }

    /// True when either endpoint falls strictly within
    /// `(reference, reference + limit)`.
    ///
    /// A window already in progress qualifies as long as its end is still
    /// inside the horizon.
    fn upcoming_within(&self, limit: Duration, reference: DateTime<Utc>) -> bool {
        let till_start = self.start() - reference;
        let till_end = self.end() - reference;
        let zero = Duration::zero();
        (till_start > zero && till_start < limit) || (till_end > zero && till_end < limit)
    }
}

/// A time interval during which laser propagation is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Opening {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Opening {
    /// Creates an opening, rejecting inverted or empty intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidInterval> {
        if end <= start {
            return Err(InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }
}

impl Window for Opening {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }

    fn propagate(&self) -> bool {
        true
    }
}

impl std::fmt::Display for Opening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "open {} to {} ({} s)",
            self.start.format("%H:%M:%S"),
            self.end.format("%H:%M:%S"),
            self.duration().num_seconds()
        )
    }
}

/// A time interval during which laser propagation is forbidden.
///
/// Never stored: always derived as the gap between two consecutive
/// openings of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Closure {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Closure {
    /// Creates a closure, rejecting inverted or empty intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidInterval> {
        if end <= start {
            return Err(InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// The gap between two consecutive openings.
    ///
    /// Callers must have established `prev.end() < next.start()`; the
    /// parser validates this for every region it finalizes.
    pub(crate) fn gap(prev: &Opening, next: &Opening) -> Self {
        debug_assert!(prev.end() < next.start(), "openings overlap or touch");
        Self {
            start: prev.end(),
            end: next.start(),
        }
    }
}

impl Window for Closure {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }

    fn propagate(&self) -> bool {
        false
    }
}

impl std::fmt::Display for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "closed {} to {} ({} s)",
            self.start.format("%H:%M:%S"),
            self.end.format("%H:%M:%S"),
            self.duration().num_seconds()
        )
    }
}

/// One entry in a region's chronological schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowEvent {
    Opening(Opening),
    Closure(Closure),
}

impl Window for WindowEvent {
    fn start(&self) -> DateTime<Utc> {
        match self {
            Self::Opening(o) => o.start(),
            Self::Closure(c) => c.start(),
        }
    }

    fn end(&self) -> DateTime<Utc> {
        match self {
            Self::Opening(o) => o.end(),
            Self::Closure(c) => c.end(),
        }
    }

    fn propagate(&self) -> bool {
        matches!(self, Self::Opening(_))
    }
}
