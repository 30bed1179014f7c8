//! Minimal equatorial sky positions for region containment tests.
//!
//! This is deliberately not an astrometry library: no frame algebra, no
//! epoch propagation. Positions are bare ICRS-style (RA, Dec) pairs in
//! degrees, with just enough arithmetic to answer "is this location
//! within a region's radius of its center".

use serde::{Deserialize, Serialize};

/// A sky position as right ascension and declination, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoord {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl EquatorialCoord {
    #[must_use]
    pub const fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self { ra_deg, dec_deg }
    }

    /// Builds a position from sexagesimal right ascension (in hours) and
    /// declination (in degrees).
    ///
    /// `dec_negative` carries the sign separately so that `-00 30 00`
    /// keeps its sign.
    #[must_use]
    pub fn from_sexagesimal(
        ra_hms: (f64, f64, f64),
        dec_negative: bool,
        dec_dms: (f64, f64, f64),
    ) -> Self {
        let ra_hours = ra_hms.0 + ra_hms.1 / 60.0 + ra_hms.2 / 3600.0;
        let dec_abs = dec_dms.0 + dec_dms.1 / 60.0 + dec_dms.2 / 3600.0;
        let dec_deg = if dec_negative { -dec_abs } else { dec_abs };
        Self {
            ra_deg: ra_hours * 15.0,
            dec_deg,
        }
    }

    /// Angular separation from `other` in degrees, by the haversine
    /// formula on the unit sphere.
    #[must_use]
    pub fn separation_deg(&self, other: &Self) -> f64 {
        let dec1 = self.dec_deg.to_radians();
        let dec2 = other.dec_deg.to_radians();
        let half_ddec = ((dec2 - dec1) / 2.0).sin();
        let half_dra = ((other.ra_deg - self.ra_deg).to_radians() / 2.0).sin();

        let h = half_ddec * half_ddec + dec1.cos() * dec2.cos() * half_dra * half_dra;
        (2.0 * h.sqrt().asin()).to_degrees()
    }

    /// Whether `other` lies strictly within `radius_deg` of this position.
    ///
    /// Total over all inputs: a non-finite separation (NaN coordinates)
    /// yields `false` rather than an error.
    #[must_use]
    pub fn within(&self, radius_deg: f64, other: &Self) -> bool {
        let sep = self.separation_deg(other);
        sep.is_finite() && sep < radius_deg
    }
}

impl std::fmt::Display for EquatorialCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:+.4})", self.ra_deg, self.dec_deg)
    }
}
