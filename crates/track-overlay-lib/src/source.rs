//! Input fixes and GPX adapters

use crate::{GeoPoint, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

/// One geographic sample as delivered by an upstream reader
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the reference surface
    pub elevation: Option<f64>,
    /// Meters per second
    pub speed: Option<f64>,
    /// Degrees clockwise from north
    pub heading: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            speed: None,
            heading: None,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Position of the fix, at elevation 0 when none was recorded
    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::with_elevation(self.latitude, self.longitude, self.elevation.unwrap_or(0.0))
    }
}

/// GPX times are RFC 3339 text once formatted
fn gpx_timestamp(time: &gpx::Time) -> Option<DateTime<Utc>> {
    let text = time.format().ok()?;
    let parsed = DateTime::parse_from_rfc3339(&text).ok()?;
    Some(parsed.with_timezone(&Utc))
}

impl From<&gpx::Waypoint> for Fix {
    fn from(waypoint: &gpx::Waypoint) -> Self {
        let point = waypoint.point();
        Self {
            elevation: waypoint.elevation,
            speed: waypoint.speed,
            timestamp: waypoint.time.as_ref().and_then(gpx_timestamp),
            ..Fix::new(point.y(), point.x())
        }
    }
}

/// Flatten every track segment of a GPX file into fixes, in file order
pub fn fixes_from_gpx(gpx: &gpx::Gpx) -> Vec<Fix> {
    let fixes: Vec<Fix> = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(Fix::from)
        .collect();

    tracing::debug!(
        "Read {} fixes from {} GPX tracks",
        fixes.len(),
        gpx.tracks.len()
    );
    fixes
}

/// Parse a GPX file and return its fixes
pub fn load_gpx_fixes<P: AsRef<Path>>(path: P) -> Result<Vec<Fix>> {
    let file = std::fs::File::open(path.as_ref())?;
    let reader = std::io::BufReader::new(file);
    let gpx = gpx::read(reader)?;
    Ok(fixes_from_gpx(&gpx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx::{Gpx, Track, TrackSegment, Waypoint};

    fn create_test_waypoint(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(geo::Point::new(lon, lat))
    }

    fn create_test_gpx() -> Gpx {
        let mut gpx = Gpx::default();
        for t in 0..2 {
            let mut track = Track::default();
            let mut segment = TrackSegment::default();
            for i in 0..3 {
                let (lat, lon) = (51.5 + t as f64, -0.1 + i as f64 * 0.01);
                segment.points.push(create_test_waypoint(lat, lon));
            }
            track.segments.push(segment);
            gpx.tracks.push(track);
        }
        gpx
    }

    #[test]
    fn test_fix_point_defaults_elevation() {
        let fix = Fix::new(41.164, -104.843);
        assert_eq!(fix.point(), GeoPoint::new(41.164, -104.843));
    }

    #[test]
    fn test_fix_from_waypoint() {
        let mut waypoint = create_test_waypoint(51.5074, -0.1278);
        waypoint.elevation = Some(35.0);

        let fix = Fix::from(&waypoint);
        assert_eq!(fix.latitude, 51.5074);
        assert_eq!(fix.longitude, -0.1278);
        assert_eq!(fix.point().elevation(), 35.0);
    }

    #[test]
    fn test_fixes_from_gpx_keeps_order() {
        let fixes = fixes_from_gpx(&create_test_gpx());
        assert_eq!(fixes.len(), 6);
        assert_eq!(fixes[0].latitude, 51.5);
        assert_eq!(fixes[3].latitude, 52.5);
    }

    #[test]
    fn test_gpx_timestamps_are_kept() {
        let data = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="41.1" lon="-104.1"><time>2017-07-14T02:40:00Z</time></trkpt>
    <trkpt lat="41.2" lon="-104.2"></trkpt>
  </trkseg></trk>
</gpx>"#;
        let gpx = gpx::read(data.as_bytes()).unwrap();
        let fixes = fixes_from_gpx(&gpx);

        assert_eq!(fixes.len(), 2);
        let timestamp = fixes[0].timestamp.map(|t| t.timestamp());
        assert_eq!(timestamp, Some(1_500_000_000));
        assert!(fixes[1].timestamp.is_none());
    }

    #[test]
    fn test_load_gpx_file() {
        let name = format!("track-overlay-source-{}.gpx", std::process::id());
        let path = std::env::temp_dir().join(name);
        let data = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="41.1" lon="-104.1"><ele>1900</ele></trkpt>
    <trkpt lat="41.2" lon="-104.2"><ele>1910</ele></trkpt>
  </trkseg></trk>
</gpx>"#;
        std::fs::write(&path, data).unwrap();
        let fixes = load_gpx_fixes(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[1].latitude, 41.2);
        assert_eq!(fixes[1].elevation, Some(1910.0));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_gpx_fixes("/nonexistent/track.gpx");
        assert!(matches!(result, Err(crate::OverlayError::Io(_))));
    }
}
