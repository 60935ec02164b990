//! Coordinate text formatting
//!
//! KML encodes coordinates as whitespace separated `lon,lat,alt` triples. Every
//! coordinate string produced by this crate goes through these functions so the
//! longitude-first ordering is decided in exactly one place.

use crate::GeoPoint;
use std::fmt::Write;

/// Format a single point as a `lon,lat,alt` triple
#[inline]
pub fn format_triple(point: &GeoPoint) -> String {
    let mut out = String::with_capacity(32);
    push_triple(&mut out, point);
    out
}

/// Format a sequence of points as space separated triples
pub fn format_coordinates<'a, I>(points: I) -> String
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let mut out = String::new();
    for point in points {
        if !out.is_empty() {
            out.push(' ');
        }
        push_triple(&mut out, point);
    }
    out
}

/// Append one triple to `out`
#[inline]
pub fn push_triple(out: &mut String, point: &GeoPoint) {
    // Writing into a String never fails
    let _ = write!(
        out,
        "{},{},{}",
        point.longitude(),
        point.latitude(),
        point.elevation()
    );
}
