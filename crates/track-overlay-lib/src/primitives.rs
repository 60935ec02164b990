//! Stateless shape constructors
//!
//! Every function here validates its input and returns a finished [`Placemark`];
//! nothing is appended anywhere, so a failed construction leaves the caller's
//! document untouched.

use crate::{
    Config, DestinationProvider, GeoPoint, Geometry, OverlayError, Placemark, Polygon, Result,
    StyleTag,
};

/// Smallest vertex count of a circle approximation
pub const MIN_CIRCLE_SEGMENTS: usize = 3;

const DEFAULT_SEGMENT_NAME: &str = "segment";
const DEFAULT_CIRCLE_NAME: &str = "circle";
const DEFAULT_POLYGON_NAME: &str = "polygon";

/// A single line from `a` to `b`
pub fn segment(
    style_tag: impl Into<StyleTag>,
    a: GeoPoint,
    b: GeoPoint,
    name: Option<&str>,
) -> Placemark {
    Placemark::new(Geometry::multi_line(vec![a, b]))
        .with_style_tag(style_tag)
        .with_name(name.unwrap_or(DEFAULT_SEGMENT_NAME))
}

/// Axis-aligned box from two opposite corners
///
/// The ring runs NE, SE, SW, NW and back to NE. Corners are used as given: swapped
/// or coincident corners produce a mirrored or zero-area box rather than an error.
pub fn bounding_box(
    style_tag: impl Into<StyleTag>,
    north_east: GeoPoint,
    south_west: GeoPoint,
) -> Placemark {
    let (north, east) = (north_east.latitude(), north_east.longitude());
    let (south, west) = (south_west.latitude(), south_west.longitude());

    let ring = Polygon::closed(vec![
        GeoPoint::new(north, east),
        GeoPoint::new(south, east),
        GeoPoint::new(south, west),
        GeoPoint::new(north, west),
    ]);
    let geometry = Geometry::Polygon(ring);

    Placemark::new(geometry).with_style_tag(style_tag)
}

/// Polygon through `points`, closed by repeating the first point
pub fn polygon(
    style_tag: impl Into<StyleTag>,
    points: &[GeoPoint],
    name: Option<&str>,
) -> Result<Placemark> {
    if points.is_empty() {
        return Err(OverlayError::EmptyInput("polygon needs at least one point"));
    }

    let geometry = Geometry::Polygon(Polygon::closed(points.to_vec()));

    Ok(Placemark::new(geometry)
        .with_name(name.unwrap_or(DEFAULT_POLYGON_NAME))
        .with_style_tag(style_tag))
}

/// Regular polygon with `segments` vertices at `radius` meters around `center`
///
/// Vertices start due north and advance clockwise by `360 / segments` degrees. The
/// ring holds exactly `segments` points and closes by wrapping around, unlike
/// [`polygon`] which repeats its first point.
pub fn circle<D: DestinationProvider + ?Sized>(
    style_tag: impl Into<StyleTag>,
    center: GeoPoint,
    radius: f64,
    segments: usize,
    name: Option<&str>,
    earth: &D,
) -> Result<Placemark> {
    #[cfg(feature = "profiling")]
    profiling::scope!("primitives::circle");

    if segments < MIN_CIRCLE_SEGMENTS {
        return Err(OverlayError::InvalidSegmentCount { segments });
    }

    let step = 360.0 / segments as f64;
    let ring: Vec<GeoPoint> = (0..segments)
        .map(|i| center.destination(earth, i as f64 * step, radius))
        .collect();

    let geometry = Geometry::Polygon(Polygon::wraparound(ring));

    Ok(Placemark::new(geometry)
        .with_style_tag(style_tag)
        .with_name(name.unwrap_or(DEFAULT_CIRCLE_NAME)))
}

/// [`circle`] using the configured vertex count and earth model
pub fn circle_with_config(
    style_tag: impl Into<StyleTag>,
    center: GeoPoint,
    radius: f64,
    name: Option<&str>,
    config: &Config,
) -> Result<Placemark> {
    config.validate()?;
    let (segments, earth) = (config.circle_segments, config.earth());
    circle(style_tag, center, radius, segments, name, &earth)
}

/// Decimated line over a finite point list
///
/// A segment is emitted from the running anchor to every `stride`-th point after the
/// first. When the stride never triggers, one segment joins the first point to the
/// last. A single input point yields a zero-length segment.
pub fn strided_polyline(
    style_tag: impl Into<StyleTag>,
    points: &[GeoPoint],
    stride: usize,
) -> Result<Placemark> {
    #[cfg(feature = "profiling")]
    profiling::scope!("primitives::strided_polyline");

    if stride == 0 {
        return Err(OverlayError::InvalidConfiguration(
            "stride must be at least 1".to_string(),
        ));
    }
    let Some((&first, rest)) = points.split_first() else {
        return Err(OverlayError::EmptyInput(
            "polyline needs at least one point",
        ));
    };

    let mut anchor = first;
    let mut coords = Vec::with_capacity(2 * (rest.len() / stride).max(1));

    for point in rest.iter().skip(stride - 1).step_by(stride) {
        coords.push(anchor);
        coords.push(*point);
        anchor = *point;
    }

    if coords.is_empty() {
        let last = rest.last().copied().unwrap_or(first);
        coords.push(first);
        coords.push(last);
    }

    let geometry = Geometry::multi_line(coords);
    Ok(Placemark::new(geometry).with_style_tag(style_tag))
}
