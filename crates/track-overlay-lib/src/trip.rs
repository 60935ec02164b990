//! Incremental track decimation
//!
//! A [`TrackDecimator`] consumes the fixes of one moving object and keeps only the
//! segments that join every `stride`-th point. Placemarks are materialized on demand,
//! and each one starts where the previous one ended so the flushed pieces form a
//! continuous line.

use crate::{Config, GeoPoint, Geometry, OverlayError, Placemark, PlacemarkContainer, Result};
use crate::{StyleTag, TimeSpan};
use chrono::{DateTime, Utc};

/// Stateful stride decimator for a single track
///
/// Not meant to be shared between producers: build one decimator per track.
#[derive(Debug, Clone)]
pub struct TrackDecimator {
    /// Style applied to placemarks created from now on
    style_tag: Option<StyleTag>,
    /// Time span applied to placemarks created from now on
    time_span: Option<TimeSpan>,
    /// Points between two emitted segments
    stride: usize,
    /// Most recently added point
    current: Option<GeoPoint>,
    /// Origin of the next emitted segment
    anchor: Option<GeoPoint>,
    /// Segment endpoint pairs accumulated since the last flush
    pending: Vec<GeoPoint>,
    /// Points added since the last flush, not counting the very first point
    points_since_flush: usize,
    /// Whether the most recent point closed a stride segment
    last_was_stride: bool,
    /// Every point ever added
    total_points: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrackDecimator {
    /// Create a decimator emitting one segment every `stride` points
    pub fn new(stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(OverlayError::InvalidConfiguration(
                "stride must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            style_tag: None,
            time_span: None,
            stride,
            current: None,
            anchor: None,
            pending: Vec::new(),
            points_since_flush: 0,
            last_was_stride: false,
            total_points: 0,
        })
    }

    /// Create a decimator using the configured stride
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.stride)
    }

    pub fn with_style_tag(mut self, tag: impl Into<StyleTag>) -> Self {
        self.style_tag = Some(tag.into());
        self
    }

    /// Style for placemarks created after this call
    pub fn set_style_tag(&mut self, tag: impl Into<StyleTag>) {
        self.style_tag = Some(tag.into());
    }

    /// Time span for placemarks created after this call
    pub fn set_time_span(&mut self, begin: DateTime<Utc>, end: DateTime<Utc>) {
        self.time_span = Some(TimeSpan::new(begin, end));
    }

    pub fn clear_time_span(&mut self) {
        self.time_span = None;
    }

    /// Add a ground-level fix
    #[inline]
    pub fn add_point(&mut self, latitude: f64, longitude: f64) {
        self.push(GeoPoint::new(latitude, longitude));
    }

    /// Add a fix
    pub fn push(&mut self, point: GeoPoint) {
        self.total_points += 1;
        self.current = Some(point);

        let Some(anchor) = self.anchor else {
            // First point ever: it only becomes the anchor
            self.anchor = Some(point);
            self.last_was_stride = false;
            return;
        };

        self.points_since_flush += 1;
        if self.points_since_flush.is_multiple_of(self.stride) {
            self.pending.push(anchor);
            self.pending.push(point);
            self.anchor = Some(point);
            self.last_was_stride = true;
        } else {
            self.last_was_stride = false;
        }
    }

    /// Materialize the accumulated segments into a placemark
    ///
    /// Returns `None` when nothing was added since the last flush. Otherwise a trailing
    /// segment to the latest point is added if needed, the state is reset and the
    /// latest point becomes the anchor of the next batch.
    pub fn take_placemark(&mut self) -> Option<Placemark> {
        if self.points_since_flush == 0 && self.pending.is_empty() {
            return None;
        }
        let (anchor, current) = (self.anchor?, self.current?);

        if !self.last_was_stride {
            self.pending.push(anchor);
            self.pending.push(current);
        }

        let points = std::mem::take(&mut self.pending);
        tracing::debug!(
            "Flushing decimated placemark: {} points, {} segments",
            self.points_since_flush,
            points.len() / 2
        );

        let mut placemark = Placemark::new(Geometry::multi_line(points));
        placemark.style_tag = self.style_tag.clone();
        placemark.time_span = self.time_span;

        self.points_since_flush = 0;
        self.anchor = Some(current);

        Some(placemark)
    }

    /// Flush into `target`, returning whether a placemark was appended
    pub fn make_placemark<C: PlacemarkContainer + ?Sized>(&mut self, target: &mut C) -> bool {
        match self.take_placemark() {
            Some(placemark) => {
                target.append(placemark);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of points added over the decimator's lifetime
    #[inline]
    pub fn total_points(&self) -> usize {
        self.total_points
    }

    /// Segments waiting for the next flush
    #[inline]
    pub fn pending_segments(&self) -> usize {
        self.pending.len() / 2
    }

    /// Whether a flush would produce a placemark
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.points_since_flush > 0 || !self.pending.is_empty()
    }
}

impl Extend<GeoPoint> for TrackDecimator {
    fn extend<I: IntoIterator<Item = GeoPoint>>(&mut self, iter: I) {
        for point in iter {
            self.push(point);
        }
    }
}
