//! Placemark geometries

use crate::GeoPoint;
use geo::BoundingRect;

/// An ordered run of points drawn as a line
///
/// Lines built by segment accumulation store every segment as its two endpoints,
/// so a chain `A -> B -> C` is held as `[A, B, B, C]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineString {
    pub points: Vec<GeoPoint>,
    /// Follow the terrain when drawn
    pub tessellate: bool,
    /// Ignore point altitude and draw on the ground
    pub clamp_to_ground: bool,
}

impl LineString {
    /// Tessellated, ground-clamped line through `points`
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            tessellate: true,
            clamp_to_ground: true,
        }
    }

    /// Consecutive endpoint pairs of a segment-pair encoded line
    pub fn segment_pairs(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

/// A polygon described by its outer boundary
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    outer_ring: Vec<GeoPoint>,
    pub tessellate: bool,
    pub clamp_to_ground: bool,
}

impl Polygon {
    /// Ring closed explicitly: the first point is appended again at the end
    pub fn closed(points: Vec<GeoPoint>) -> Self {
        let mut outer_ring = points;
        if let Some(&first) = outer_ring.first() {
            outer_ring.push(first);
        }
        Self::from_ring(outer_ring)
    }

    /// Ring closed by wraparound: the last point connects back to the first without
    /// being repeated
    pub fn wraparound(points: Vec<GeoPoint>) -> Self {
        Self::from_ring(points)
    }

    fn from_ring(outer_ring: Vec<GeoPoint>) -> Self {
        Self {
            outer_ring,
            tessellate: true,
            clamp_to_ground: true,
        }
    }

    #[inline]
    pub fn outer_ring(&self) -> &[GeoPoint] {
        &self.outer_ring
    }

    /// Whether the ring repeats its first point at the end
    pub fn is_explicitly_closed(&self) -> bool {
        match (self.outer_ring.first(), self.outer_ring.last()) {
            (Some(first), Some(last)) => self.outer_ring.len() > 1 && first == last,
            _ => false,
        }
    }
}

/// Geometry attached to a placemark
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    LineString(LineString),
    Polygon(Polygon),
    MultiGeometry(Vec<Geometry>),
}

impl Geometry {
    /// A multi-geometry wrapping a single line, the shape used for tracks
    pub fn multi_line(points: Vec<GeoPoint>) -> Self {
        Geometry::MultiGeometry(vec![Geometry::LineString(LineString::new(points))])
    }

    /// All points of the geometry in document order
    pub fn points(&self) -> Vec<GeoPoint> {
        let mut out = Vec::new();
        self.collect_points(&mut out);
        out
    }

    fn collect_points(&self, out: &mut Vec<GeoPoint>) {
        match self {
            Geometry::LineString(line) => out.extend_from_slice(&line.points),
            Geometry::Polygon(polygon) => out.extend_from_slice(polygon.outer_ring()),
            Geometry::MultiGeometry(parts) => {
                for part in parts {
                    part.collect_points(out);
                }
            }
        }
    }

    /// The first line string found in document order
    pub fn first_line(&self) -> Option<&LineString> {
        match self {
            Geometry::LineString(line) => Some(line),
            Geometry::Polygon(_) => None,
            Geometry::MultiGeometry(parts) => parts.iter().find_map(Geometry::first_line),
        }
    }

    /// Longitude/latitude extent, `None` for an empty geometry
    pub fn bounding_rect(&self) -> Option<geo::Rect<f64>> {
        let points: Vec<geo::Point<f64>> = self.points().into_iter().map(Into::into).collect();
        geo::MultiPoint::new(points).bounding_rect()
    }
}
