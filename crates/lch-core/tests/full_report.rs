//! End-to-end parse of a multi-region closure report, exercising the
//! query engine against the completed set.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use lch_core::{EquatorialCoord, Window, parse_report};

const REPORT: &str = "\
lasers cleared for propagation on the night of 2015-08-07

lazer_zenith    12 30 00.0 +40 00 00.0 2000 lgs=1
11:00:00  11:50:30  open(min:sec) 50:30  Closure(sec) 45
11:51:15  12:45:00  open(min:sec) 53:45

eng341          13 10 00.0 +20 00 00.0 2000
11:00:00  11:20:00  open(min:sec) 20:00  Closure(sec) 120
First 2 objects: total time of closures: 165.0
First 2 objects: total number of closures: 2
";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 8, 7).unwrap()
}

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 8, 7, h, m, s).unwrap()
}

#[test]
fn parses_regions_in_report_order() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();
    let names: Vec<_> = regions.names().collect();
    assert_eq!(names, vec!["lazer_zenith", "eng341"]);
    assert_eq!(regions.region_count(), 2);
}

#[test]
fn zenith_schedule_matches_the_report() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();
    let zenith = regions.get("lazer_zenith").unwrap();

    assert_eq!(zenith.openings().len(), 2);
    assert!(zenith.open(at(11, 50, 29)));
    assert!(!zenith.open(at(11, 50, 30)));
    assert!(!zenith.open(at(11, 50, 32)));
    assert!(zenith.open(at(11, 52, 0)));

    let closures: Vec<_> = zenith.closures().collect();
    assert_eq!(closures.len(), 1);
    assert_eq!(closures[0].start(), at(11, 50, 30));
    assert_eq!(closures[0].end(), at(11, 51, 15));
}

#[test]
fn dangling_annotation_extends_the_last_region() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();
    let eng = regions.get("eng341").unwrap();

    // Closed for 120 s after the stated opening, then clear until 12 h
    // past the region's first opening.
    assert_eq!(eng.openings().len(), 2);
    assert!(!eng.open(at(11, 21, 0)));
    assert!(eng.open(at(15, 0, 0)));
    assert!(!eng.open(at(23, 30, 0)));
}

#[test]
fn derived_statistics_match_the_summary_lines() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();
    assert_eq!(regions.total_closure_count(), 2);
    assert_eq!(regions.total_closure_duration(), Duration::seconds(165));
    assert_eq!(regions.summaries().len(), 2);
    assert!(regions.verify().is_empty());
}

#[test]
fn location_queries_compose_across_regions() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();
    let zenith_center = EquatorialCoord::new(187.5, 40.0);
    let eng_center = EquatorialCoord::new(197.5, 20.0);
    let nowhere = EquatorialCoord::new(0.0, -40.0);

    assert!(regions.contains(&zenith_center));
    assert!(regions.contains(&eng_center));
    assert!(!regions.contains(&nowhere));

    assert!(regions.open(&zenith_center, at(11, 30, 0)));
    assert!(!regions.open(&zenith_center, at(11, 51, 0)));
    // Uncovered locations are conservatively not cleared.
    assert!(!regions.open(&nowhere, at(11, 30, 0)));
    assert!(regions.closed(&nowhere, at(11, 30, 0)));
}

#[test]
fn upcoming_closures_merge_across_regions() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();

    // From just inside the zenith gap with a 2 h horizon, that closure
    // comes back first.
    let upcoming = regions.upcoming_closures(Duration::hours(2), at(11, 50, 40));
    assert!(!upcoming.is_empty());
    assert_eq!(upcoming[0].start(), at(11, 50, 30));

    // From before both gaps, everything within the horizon is returned
    // ordered by start: eng341's 11:20 closure, then zenith's 11:50:30.
    let upcoming = regions.upcoming_closures(Duration::hours(2), at(11, 5, 0));
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].start(), at(11, 20, 0));
    assert_eq!(upcoming[1].start(), at(11, 50, 30));
}

#[test]
fn free_function_matches_method_over_all_regions() {
    let regions = parse_report(REPORT.lines(), date()).unwrap();
    let reference = at(11, 5, 0);
    let limit = Duration::hours(2);
    assert_eq!(
        lch_core::upcoming_closures(&regions, limit, reference),
        regions.upcoming_closures(limit, reference)
    );
}
