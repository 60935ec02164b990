//! Overlay document tree
//!
//! A [`Document`] owns its style registry, its folders and any placemarks attached
//! directly at the root. Placemarks are immutable once appended.

use crate::kml::{self, KmlNode};
use crate::{GeoPoint, Placemark, Result, StyleRegistry, StyleTag, TimeSpan, TrackDecimator};
use rayon::prelude::*;

/// One independent track for [`PlacemarkContainer::append_tracks_parallel`]
#[derive(Debug, Clone, Default)]
pub struct TrackInput {
    pub name: Option<String>,
    pub style_tag: Option<StyleTag>,
    pub time_span: Option<TimeSpan>,
    pub points: Vec<GeoPoint>,
}

impl TrackInput {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }
}

/// Anything placemarks can be appended to
pub trait PlacemarkContainer {
    fn append(&mut self, placemark: Placemark);

    /// Decimate independent tracks in parallel and append the results in input order
    ///
    /// Each track gets its own [`TrackDecimator`] on the rayon pool; appending happens
    /// on the calling thread once every track is done. Tracks with fewer than two
    /// points produce nothing. Returns the number of placemarks appended.
    fn append_tracks_parallel(&mut self, tracks: Vec<TrackInput>, stride: usize) -> Result<usize> {
        #[cfg(feature = "profiling")]
        profiling::scope!("document::append_tracks_parallel");

        // Fail before any work is scheduled
        TrackDecimator::new(stride)?;

        let results: Result<Vec<Option<Placemark>>> = tracks
            .into_par_iter()
            .map(|track| {
                let mut trip = TrackDecimator::new(stride)?;
                if let Some(tag) = track.style_tag {
                    trip.set_style_tag(tag);
                }
                if let Some(span) = track.time_span {
                    trip.set_time_span(span.begin, span.end);
                }
                trip.extend(track.points);

                Ok(trip.take_placemark().map(|placemark| match track.name {
                    Some(name) => placemark.with_name(name),
                    None => placemark,
                }))
            })
            .collect();

        let mut appended = 0;
        for placemark in results?.into_iter().flatten() {
            self.append(placemark);
            appended += 1;
        }
        Ok(appended)
    }
}

impl PlacemarkContainer for Vec<Placemark> {
    fn append(&mut self, placemark: Placemark) {
        self.push(placemark);
    }
}

/// A named group of placemarks
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Folder {
    name: String,
    pub visibility: bool,
    pub open: bool,
    placemarks: Vec<Placemark>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: false,
            open: false,
            placemarks: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }
}

impl PlacemarkContainer for Folder {
    fn append(&mut self, placemark: Placemark) {
        self.placemarks.push(placemark);
    }
}

/// The root of an overlay
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    name: String,
    pub visibility: bool,
    pub open: bool,
    styles: StyleRegistry,
    folders: Vec<Folder>,
    placemarks: Vec<Placemark>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Document {
    /// Create an empty, hidden and collapsed document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    #[inline]
    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    /// Append a new folder and return it for filling
    pub fn add_folder(&mut self, name: impl Into<String>) -> &mut Folder {
        self.folders.push(Folder::new(name));
        let last = self.folders.len() - 1;
        &mut self.folders[last]
    }

    #[inline]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    #[inline]
    pub fn folder_mut(&mut self, index: usize) -> Option<&mut Folder> {
        self.folders.get_mut(index)
    }

    /// Placemarks attached directly to the document
    #[inline]
    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    /// Every placemark, root first, then folder by folder
    pub fn all_placemarks(&self) -> impl Iterator<Item = &Placemark> {
        let in_folders = self.folders.iter().flat_map(Folder::placemarks);
        self.placemarks.iter().chain(in_folders)
    }

    /// Longitude/latitude extent of every placemark
    pub fn bounding_rect(&self) -> Option<geo::Rect<f64>> {
        self.all_placemarks()
            .filter_map(|placemark| placemark.geometry.bounding_rect())
            .reduce(|acc, rect| {
                geo::Rect::new(
                    geo::Coord {
                        x: acc.min().x.min(rect.min().x),
                        y: acc.min().y.min(rect.min().y),
                    },
                    geo::Coord {
                        x: acc.max().x.max(rect.max().x),
                        y: acc.max().y.max(rect.max().y),
                    },
                )
            })
    }

    /// Structured KML tree ready for text emission
    pub fn serialize(&self) -> KmlNode {
        kml::document_node(self)
    }

    /// Render the document as KML text
    pub fn to_kml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        kml::write_kml(self, &mut buffer)?;
        String::from_utf8(buffer).map_err(kml::xml_error)
    }
}

impl PlacemarkContainer for Document {
    fn append(&mut self, placemark: Placemark) {
        self.placemarks.push(placemark);
    }
}
