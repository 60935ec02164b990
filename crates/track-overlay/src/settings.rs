use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use track_overlay_lib::Config;

/// How input fixes are turned into placemarks
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One named segment per consecutive pair of fixes
    Segments,
    /// A single strided polyline over all fixes
    Polyline,
    /// A decimated trip, flushed into a folder every `--flush-every` fixes
    Trip,
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Track Overlay - Build KML map overlays from GPS tracks
pub struct Settings {
    /// GPX or CSV file to read (CSV from stdin when omitted)
    #[clap(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// KML file to write
    #[clap(short, long, value_name = "FILE", default_value = "overlay.kml")]
    pub output: PathBuf,

    /// Document name
    #[clap(short, long, default_value = "track")]
    pub name: String,

    /// Overlay construction mode
    #[clap(short, long, value_enum, default_value = "trip")]
    pub mode: Mode,

    /// Decimation stride in points (>= 1)
    #[clap(short, long, default_value = "50")]
    pub stride: usize,

    /// Fixes per trip placemark (0 = one placemark for the whole track)
    #[clap(long, default_value = "0")]
    pub flush_every: usize,

    /// Style id referenced by every placemark
    #[clap(long, default_value = "edges")]
    pub style_tag: String,

    /// Line color in KML aabbggrr notation
    #[clap(long, default_value = "ffff0000")]
    pub color: String,

    /// Line width in pixels
    #[clap(long, default_value = "7")]
    pub width: f64,

    /// Zero-based CSV column holding latitudes
    #[clap(long, default_value = "2")]
    pub lat_column: usize,

    /// Zero-based CSV column holding longitudes
    #[clap(long, default_value = "3")]
    pub lng_column: usize,

    /// Zero-based CSV column holding Unix timestamps in seconds
    #[clap(long)]
    pub time_column: Option<usize>,
}

impl Settings {
    /// Engine configuration derived from the command line
    pub fn config(&self) -> Config {
        Config {
            stride: self.stride,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["track-overlay"]).unwrap();
        assert_eq!(settings.mode, Mode::Trip);
        assert_eq!(settings.stride, 50);
        assert_eq!(settings.lat_column, 2);
        assert_eq!(settings.lng_column, 3);
        assert!(settings.input.is_none());
        assert!(settings.time_column.is_none());
        assert_eq!(settings.output, PathBuf::from("overlay.kml"));
    }

    #[test]
    fn test_mode_and_stride() {
        let args = ["track-overlay", "--mode", "segments", "--stride", "3"];
        let settings = Settings::try_parse_from(args).unwrap();
        assert_eq!(settings.mode, Mode::Segments);
        assert_eq!(settings.config().stride, 3);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let args = ["track-overlay", "--mode", "circles"];
        assert!(Settings::try_parse_from(args).is_err());
    }
}
