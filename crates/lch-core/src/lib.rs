//! Laser clearance closure reports: model, parser, and query engine.
//!
//! A closure report lists, per named sky region, the time windows during
//! which a ground-based laser may propagate ("openings"). The gaps
//! between consecutive openings are "closures", during which the laser
//! must not fire. This crate:
//! - parses the loosely structured line-oriented report format into a
//!   [`RegionSet`] ([`parse_report`], [`ReportParser`]),
//! - answers point-in-time and coverage queries ("is propagation toward
//!   location L allowed at time T?"),
//! - enumerates upcoming closures across regions, merged and
//!   time-ordered ([`upcoming_closures`]).
//!
//! Parsing is a single-threaded line fold with no I/O; the caller supplies
//! the lines and a reference date. After a successful parse the set is
//! read-mostly and safe to share as an immutable snapshot.

pub mod coords;
pub mod grammar;
pub mod parser;
pub mod region;
pub mod region_set;
pub mod starlist;
pub mod window;

pub use coords::EquatorialCoord;
pub use grammar::{OpeningRecord, SummaryDetail, SummaryRecord};
pub use parser::{ParseError, ParserState, ReportParser, parse_report};
pub use region::Region;
pub use region_set::{RegionSet, SummaryMismatch, upcoming_closures};
pub use starlist::{StarlistError, StarlistTarget, parse_starlist_line};
pub use window::{Closure, InvalidInterval, Opening, Window, WindowEvent};
