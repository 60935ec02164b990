//! Geographic point value and the geodesic offset capability

/// Equatorial radius of the WGS84 ellipsoid in meters, used as a sphere radius
pub const WGS84_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// An immutable geographic position in decimal degrees
///
/// Elevation is in meters and defaults to 0. Two points with equal coordinates are
/// interchangeable; there is no identity beyond the values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

impl GeoPoint {
    /// Create a point at ground level
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: 0.0,
        }
    }

    /// Create a point with an explicit elevation in meters
    #[inline]
    pub const fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Project this point along `bearing` (decimal degrees, clockwise from north)
    /// for `distance` meters using the given provider
    #[inline]
    pub fn destination<D: DestinationProvider + ?Sized>(
        &self,
        provider: &D,
        bearing: f64,
        distance: f64,
    ) -> GeoPoint {
        provider.destination(self, bearing, distance)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    /// geo points store longitude in `x` and latitude in `y`
    fn from(point: geo::Point<f64>) -> Self {
        GeoPoint::new(point.y(), point.x())
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Coord {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

/// Computes the point reached from an origin after travelling along a bearing
///
/// Circle construction depends only on this trait, so tests can substitute a
/// deterministic stub for the spherical model.
pub trait DestinationProvider {
    /// Destination from `origin` along `bearing` degrees for `distance` meters
    fn destination(&self, origin: &GeoPoint, bearing: f64, distance: f64) -> GeoPoint;
}

/// Direct geodesic solution on a sphere
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphericalEarth {
    /// Sphere radius in meters
    pub radius_m: f64,
}

impl Default for SphericalEarth {
    fn default() -> Self {
        Self {
            radius_m: WGS84_EQUATORIAL_RADIUS_M,
        }
    }
}

impl SphericalEarth {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }
}

impl DestinationProvider for SphericalEarth {
    fn destination(&self, origin: &GeoPoint, bearing: f64, distance: f64) -> GeoPoint {
        let angular = distance / self.radius_m;
        let bearing = bearing.to_radians();
        let lat1 = origin.latitude.to_radians();
        let lon1 = origin.longitude.to_radians();

        let sin_lat2 = lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos();
        let lat2 = sin_lat2.asin();
        let y = bearing.sin() * angular.sin() * lat1.cos();
        let x = angular.cos() - lat1.sin() * lat2.sin();
        let lon2 = lon1 + y.atan2(x);

        // Normalize to [-180, 180)
        let lon = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;

        GeoPoint::with_elevation(lat2.to_degrees(), lon, origin.elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_elevation_is_zero() {
        let point = GeoPoint::new(41.164, -104.843);
        assert_eq!(point.latitude(), 41.164);
        assert_eq!(point.longitude(), -104.843);
        assert_eq!(point.elevation(), 0.0);
    }

    #[test]
    fn test_geo_point_conversion_swaps_axes() {
        let point = GeoPoint::new(51.5074, -0.1278);
        let geo_point: geo::Point<f64> = point.into();
        assert_eq!(geo_point.x(), -0.1278);
        assert_eq!(geo_point.y(), 51.5074);
        assert_eq!(GeoPoint::from(geo_point), point);
    }

    #[test]
    fn test_destination_due_north() {
        let earth = SphericalEarth::default();
        let origin = GeoPoint::new(0.0, 0.0);
        // A quarter of the circumference lands on the pole
        let quarter = std::f64::consts::FRAC_PI_2 * earth.radius_m;
        let pole = origin.destination(&earth, 0.0, quarter);
        assert!((pole.latitude() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_destination_due_east_on_equator() {
        let earth = SphericalEarth::default();
        let origin = GeoPoint::new(0.0, 10.0);
        let one_degree = earth.radius_m * 1f64.to_radians();
        let east = origin.destination(&earth, 90.0, one_degree);
        assert!(east.latitude().abs() < 1e-9);
        assert!((east.longitude() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let earth = SphericalEarth::default();
        let origin = GeoPoint::new(0.0, 179.5);
        let one_degree = earth.radius_m * 1f64.to_radians();
        let wrapped = origin.destination(&earth, 90.0, one_degree);
        assert!((wrapped.longitude() + 179.5).abs() < 1e-9);
    }

    #[test]
    fn test_destination_keeps_elevation() {
        let earth = SphericalEarth::default();
        let origin = GeoPoint::with_elevation(45.0, 7.0, 1200.0);
        let moved = origin.destination(&earth, 45.0, 500.0);
        assert_eq!(moved.elevation(), 1200.0);
        assert!(moved.latitude() > 45.0);
        assert!(moved.longitude() > 7.0);
    }

    #[test]
    fn test_zero_distance_is_identity() {
        let earth = SphericalEarth::default();
        let origin = GeoPoint::new(-33.86, 151.21);
        let same = origin.destination(&earth, 123.0, 0.0);
        assert!((same.latitude() - origin.latitude()).abs() < 1e-12);
        assert!((same.longitude() - origin.longitude()).abs() < 1e-12);
    }
}
