//! Engine configuration

use crate::{OverlayError, Result, SphericalEarth, WGS84_EQUATORIAL_RADIUS_M, primitives};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings read by [`TrackDecimator::from_config`](crate::TrackDecimator::from_config)
/// and [`circle_with_config`](crate::primitives::circle_with_config)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Number of points between two emitted decimated segments (>= 1)
    pub stride: usize,
    /// Number of vertices used to approximate a circle (>= 3)
    pub circle_segments: usize,
    /// Sphere radius in meters for geodesic offsets
    pub earth_radius_m: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stride: 50,
            circle_segments: 50,
            earth_radius_m: WGS84_EQUATORIAL_RADIUS_M,
        }
    }
}

impl Config {
    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(OverlayError::InvalidConfiguration(
                "stride must be at least 1".to_string(),
            ));
        }
        if self.circle_segments < primitives::MIN_CIRCLE_SEGMENTS {
            return Err(OverlayError::InvalidSegmentCount {
                segments: self.circle_segments,
            });
        }
        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            return Err(OverlayError::InvalidConfiguration(format!(
                "earth radius must be a positive number of meters, got {}",
                self.earth_radius_m
            )));
        }
        Ok(())
    }

    /// The spherical destination model for this configuration
    pub fn earth(&self) -> SphericalEarth {
        SphericalEarth::new(self.earth_radius_m)
    }
}
