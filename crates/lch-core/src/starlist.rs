//! Keck starlist region-definition lines.
//!
//! Format reference: <https://www2.keck.hawaii.edu/observing/starlist.html>.
//! A line carries a name in the first fifteen columns, sexagesimal right
//! ascension and declination, an optional equinox, and trailing
//! `keyword=value` pairs. Only the pieces the closure engine needs are
//! interpreted; the equinox is carried as an opaque field.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::coords::EquatorialCoord;

static STARLIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<name>.{1,15})\s+                 # name fills the first 15 columns
        (?P<ra>(?:\d{1,2}[\s:h][\s\d]?\d[\s:m][\s\d]?\d(?:\.\d+)?s?)|(?:\d+\.\d+))\s+
        (?P<dec>(?:[+-]?\d{1,2}[\s:d][\s\d]?\d[\s:m][\s\d]?\d(?:\.\d+)?s?)|(?:[+-]?\d+\.\d+))
        (?:\s+(?P<equinox>(?:\d{4}(?:\.\d+)?)|(?:[A-Za-z]+)))?\s*
        (?P<keywords>.+)?$",
    )
    .expect("starlist regex is valid")
});

/// Failures parsing a starlist line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StarlistError {
    #[error("cannot parse {text:?} as a starlist line")]
    NoMatch { text: String },

    #[error("starlist name field is blank in {text:?}")]
    BlankName { text: String },

    #[error("bad right ascension {text:?}")]
    BadRightAscension { text: String },

    #[error("bad declination {text:?}")]
    BadDeclination { text: String },
}

/// One parsed starlist entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarlistTarget {
    pub name: String,
    pub position: EquatorialCoord,
    /// Equinox field as written, e.g. `2000` or `APP`. Not interpreted.
    pub equinox: Option<String>,
    pub keywords: Vec<(String, String)>,
}

/// Parses one starlist-formatted line into a named sky position.
pub fn parse_starlist_line(line: &str) -> Result<StarlistTarget, StarlistError> {
    let caps = STARLIST_RE
        .captures(line)
        .ok_or_else(|| StarlistError::NoMatch {
            text: line.to_string(),
        })?;

    let name = caps["name"].trim().to_string();
    if name.is_empty() {
        return Err(StarlistError::BlankName {
            text: line.to_string(),
        });
    }

    let ra_text = &caps["ra"];
    let ra = parse_sexagesimal(ra_text).ok_or_else(|| StarlistError::BadRightAscension {
        text: ra_text.to_string(),
    })?;

    let dec_text = &caps["dec"];
    let (negative, dec_body) = match dec_text.trim().strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, dec_text.trim().trim_start_matches('+')),
    };
    let dec = parse_sexagesimal(dec_body).ok_or_else(|| StarlistError::BadDeclination {
        text: dec_text.to_string(),
    })?;

    Ok(StarlistTarget {
        name,
        position: EquatorialCoord::from_sexagesimal(ra, negative, dec),
        equinox: caps.name("equinox").map(|m| m.as_str().to_string()),
        keywords: caps
            .name("keywords")
            .map(|m| parse_keywords(m.as_str()))
            .unwrap_or_default(),
    })
}

/// Splits a sexagesimal field on whitespace, colons, or unit letters.
///
/// A single bare number is treated as whole hours (RA) or degrees (Dec),
/// matching how the report's starlist lines are resolved downstream.
fn parse_sexagesimal(text: &str) -> Option<(f64, f64, f64)> {
    let cleaned = text.trim().trim_end_matches('s');
    let parts: Vec<f64> = cleaned
        .split(|c: char| c.is_whitespace() || matches!(c, ':' | 'h' | 'd' | 'm'))
        .filter(|p| !p.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts[..] {
        [major, minute, second] => Some((major, minute, second)),
        [major, minute] => Some((major, minute, 0.0)),
        [major] => Some((major, 0.0, 0.0)),
        _ => None,
    }
}

fn parse_keywords(text: &str) -> Vec<(String, String)> {
    text.split_whitespace()
        .filter_map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                Some((key.to_string(), value.to_string()))
            }
            _ => {
                tracing::warn!(token, "ignoring malformed starlist keyword");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_separated_line() {
        let target =
            parse_starlist_line("lazer_zenith    12 30 00.0 +40 00 00.0 2000 lgs=1").unwrap();
        assert_eq!(target.name, "lazer_zenith");
        assert!((target.position.ra_deg - 187.5).abs() < 1e-9);
        assert!((target.position.dec_deg - 40.0).abs() < 1e-9);
        assert_eq!(target.equinox.as_deref(), Some("2000"));
        assert_eq!(target.keywords, vec![("lgs".to_string(), "1".to_string())]);
    }

    #[test]
    fn parses_name_containing_spaces() {
        let target = parse_starlist_line(
            "PG 0026+129     00 29 13.7000 13 16 03.720 2000 lgs=1 skip=3",
        )
        .unwrap();
        assert_eq!(target.name, "PG 0026+129");
        assert_eq!(target.keywords.len(), 2);
    }

    #[test]
    fn parses_single_digit_components() {
        let target = parse_starlist_line("PG 0026+129     0 2 1 3 1 3 2000 lgs=1").unwrap();
        assert!((target.position.ra_deg - (2.0 / 60.0 + 1.0 / 3600.0) * 15.0).abs() < 1e-9);
        assert!((target.position.dec_deg - (3.0 + 1.0 / 60.0 + 3.0 / 3600.0)).abs() < 1e-9);
    }

    #[test]
    fn parses_colon_separated_coordinates() {
        let target = parse_starlist_line("eng341          8:47:42.5 -34:45:04.3 2000").unwrap();
        assert!((target.position.ra_deg - (8.0 + 47.0 / 60.0 + 42.5 / 3600.0) * 15.0).abs() < 1e-9);
        assert!(target.position.dec_deg < 0.0);
    }

    #[test]
    fn negative_dec_under_one_degree_keeps_sign() {
        let target = parse_starlist_line("southern        10 00 00.0 -0 30 00.0 2000").unwrap();
        assert!((target.position.dec_deg + 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_lines_without_coordinates() {
        assert!(matches!(
            parse_starlist_line("First 15 objects: total number of closures: 42"),
            Err(StarlistError::NoMatch { .. })
        ));
        assert!(parse_starlist_line("").is_err());
    }

    #[test]
    fn malformed_keywords_are_dropped() {
        let target =
            parse_starlist_line("lazer_zenith    12 30 00.0 +40 00 00.0 2000 lgs=1 nonsense")
                .unwrap();
        assert_eq!(target.keywords, vec![("lgs".to_string(), "1".to_string())]);
    }
}
