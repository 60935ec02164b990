//! Track Overlay Library - Geometry Engine for KML Map Overlays
//!
//! This library turns streams of geographic fixes into structured overlay documents.
//! Long tracks are decimated incrementally at a fixed stride so that only a handful of
//! connecting segments end up in the output, while discrete shapes (segments, circles,
//! bounding boxes, polygons) are built by stateless constructors.
//!
//! # Architecture
//!
//! - **[`GeoPoint`]**: Immutable (latitude, longitude, elevation) value
//! - **[`coords`]**: Renders points as `lon,lat,alt` triples
//! - **[`StyleRegistry`]**: Named line/icon/polygon styles, referenced by tag
//! - **[`primitives`]**: Pure constructors for segment, box, polygon, circle, strided polyline
//! - **[`TrackDecimator`]**: Stateful stride decimation with continuity across flushes
//! - **[`Document`]**: Folders, placemarks and styles, serializable to KML via [`kml`]
//!
//! # Example
//!
//! ```
//! use track_overlay_lib::{Document, StyleKind, TrackDecimator};
//!
//! let mut doc = Document::new("I_80");
//! doc.styles_mut().create("edges", StyleKind::line("ff0000ff", 7.0));
//!
//! let mut trip = TrackDecimator::new(2)?.with_style_tag("edges");
//! for i in 0..5 {
//!     trip.add_point(0.0, i as f64);
//! }
//! trip.make_placemark(doc.add_folder("trip"));
//!
//! let text = doc.to_kml_string()?;
//! assert!(text.contains("<styleUrl>#edges</styleUrl>"));
//! # Ok::<(), track_overlay_lib::OverlayError>(())
//! ```

mod config;
pub mod coords;
mod document;
mod geometry;
pub mod kml;
mod placemark;
mod point;
pub mod primitives;
mod source;
mod style;
mod trip;

// Public API exports
pub use config::Config;
pub use document::{Document, Folder, PlacemarkContainer, TrackInput};
pub use geometry::{Geometry, LineString, Polygon};
pub use placemark::{Placemark, TimeSpan};
pub use point::{DestinationProvider, GeoPoint, SphericalEarth, WGS84_EQUATORIAL_RADIUS_M};
pub use source::{Fix, fixes_from_gpx, load_gpx_fixes};
pub use style::{Style, StyleKind, StyleRegistry, StyleTag};
pub use trip::TrackDecimator;

/// Error types for overlay construction and emission
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Invalid segment count: {segments} (a closed shape needs at least 3)")]
    InvalidSegmentCount { segments: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("KML emission error: {0}")]
    Xml(String),

    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
