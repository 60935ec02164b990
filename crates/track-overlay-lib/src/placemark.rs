//! Placemarks and their time metadata

use crate::{Geometry, StyleTag};
use chrono::{DateTime, Utc};

/// Format used for `<begin>`/`<end>` timestamps
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The interval during which a placemark is visible
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSpan {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { begin, end }
    }

    /// Build from Unix seconds, `None` if either value is out of range
    pub fn from_unix(begin: i64, end: i64) -> Option<Self> {
        Some(Self {
            begin: DateTime::from_timestamp(begin, 0)?,
            end: DateTime::from_timestamp(end, 0)?,
        })
    }

    pub fn begin_text(&self) -> String {
        self.begin.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_text(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// One overlay feature: a geometry with optional name, style and time span
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placemark {
    pub name: Option<String>,
    pub style_tag: Option<StyleTag>,
    pub geometry: Geometry,
    pub time_span: Option<TimeSpan>,
}

impl Placemark {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            name: None,
            style_tag: None,
            geometry,
            time_span: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_style_tag(mut self, tag: impl Into<StyleTag>) -> Self {
        self.style_tag = Some(tag.into());
        self
    }

    pub fn with_time_span(mut self, time_span: TimeSpan) -> Self {
        self.time_span = Some(time_span);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoPoint;

    #[test]
    fn test_time_span_text() {
        let span = TimeSpan::from_unix(0, 86_400 + 3_661).unwrap();
        assert_eq!(span.begin_text(), "1970-01-01T00:00:00Z");
        assert_eq!(span.end_text(), "1970-01-02T01:01:01Z");
    }

    #[test]
    fn test_time_span_out_of_range() {
        assert!(TimeSpan::from_unix(0, i64::MAX).is_none());
    }

    #[test]
    fn test_builder() {
        let placemark = Placemark::new(Geometry::multi_line(vec![GeoPoint::new(0.0, 0.0)]))
            .with_name("trip")
            .with_style_tag("edges");
        assert_eq!(placemark.name.as_deref(), Some("trip"));
        assert_eq!(placemark.style_tag, Some(StyleTag::from("edges")));
        assert!(placemark.time_span.is_none());
    }
}
