//! Fix readers for CSV and GPX input

use crate::error::Result;
use crate::settings::Settings;
use chrono::DateTime;
use std::io::Read;
use track_overlay_lib::{Fix, load_gpx_fixes};

/// CSV column layout
#[derive(Debug, Clone, Copy)]
pub struct Columns {
    pub lat: usize,
    pub lng: usize,
    pub time: Option<usize>,
}

impl From<&Settings> for Columns {
    fn from(settings: &Settings) -> Self {
        Self {
            lat: settings.lat_column,
            lng: settings.lng_column,
            time: settings.time_column,
        }
    }
}

/// Read fixes from the configured input: a GPX file, a CSV file, or CSV on stdin
pub fn read_fixes(settings: &Settings) -> Result<Vec<Fix>> {
    let columns = Columns::from(settings);

    match &settings.input {
        Some(path)
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx")) =>
        {
            tracing::info!("Reading GPX fixes from {}", path.display());
            Ok(load_gpx_fixes(path)?)
        }
        Some(path) => {
            tracing::info!("Reading CSV fixes from {}", path.display());
            read_csv(std::fs::File::open(path)?, columns)
        }
        None => {
            tracing::info!("Reading CSV fixes from stdin");
            read_csv(std::io::stdin().lock(), columns)
        }
    }
}

/// Read a CSV stream with a header row
///
/// Rows with missing or non-numeric coordinates are skipped with a warning.
pub fn read_csv<R: Read>(reader: R, columns: Columns) -> Result<Vec<Fix>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut fixes = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = index + 2;

        let coordinate = |column: usize| -> Option<f64> { record.get(column)?.parse().ok() };
        let (Some(lat), Some(lng)) = (coordinate(columns.lat), coordinate(columns.lng)) else {
            tracing::warn!("Skipping CSV line {}: missing or invalid coordinates", line);
            continue;
        };

        let mut fix = Fix::new(lat, lng);
        if let Some(column) = columns.time {
            match record
                .get(column)
                .and_then(|value| value.parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
            {
                Some(timestamp) => fix = fix.with_timestamp(timestamp),
                None => tracing::warn!("CSV line {}: missing or invalid timestamp", line),
            }
        }
        fixes.push(fix);
    }

    tracing::debug!("Read {} fixes from CSV", fixes.len());
    Ok(fixes)
}
