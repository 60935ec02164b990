//! Turns fixes into an overlay document according to the selected mode

use crate::error::{CliError, Result};
use crate::settings::{Mode, Settings};
use track_overlay_lib::{
    Document, Fix, GeoPoint, PlacemarkContainer, StyleKind, StyleTag, TrackDecimator, primitives,
};

/// Build the document for `fixes`
pub fn build_document(settings: &Settings, fixes: &[Fix]) -> Result<Document> {
    let config = settings.config();
    config.validate()?;

    if fixes.is_empty() {
        return Err(CliError::NoFixes);
    }

    let mut doc = Document::new(settings.name.as_str());
    let tag = doc.styles_mut().create(
        settings.style_tag.as_str(),
        StyleKind::line(settings.color.as_str(), settings.width),
    );

    match settings.mode {
        Mode::Segments => {
            for (index, pair) in fixes.windows(2).enumerate() {
                let name = index.to_string();
                doc.append(primitives::segment(
                    &tag,
                    pair[0].point(),
                    pair[1].point(),
                    Some(name.as_str()),
                ));
            }
        }
        Mode::Polyline => {
            let points: Vec<GeoPoint> = fixes.iter().map(Fix::point).collect();
            doc.append(primitives::strided_polyline(&tag, &points, config.stride)?);
        }
        Mode::Trip => {
            let mut trip = TrackDecimator::from_config(&config)?.with_style_tag(&tag);
            build_trip(&mut doc, &mut trip, &tag, fixes, settings.flush_every);
        }
    }

    tracing::info!(
        "Built {} placemarks from {} fixes ({:?} mode)",
        doc.all_placemarks().count(),
        fixes.len(),
        settings.mode
    );
    Ok(doc)
}

/// Feed the trip in chunks of `flush_every` fixes, flushing a placemark per chunk
fn build_trip(
    doc: &mut Document,
    trip: &mut TrackDecimator,
    tag: &StyleTag,
    fixes: &[Fix],
    flush_every: usize,
) {
    let chunk_len = if flush_every == 0 {
        fixes.len().max(1)
    } else {
        flush_every
    };

    let folder = doc.add_folder(tag.as_str());
    let mut previous_end = None;
    for chunk in fixes.chunks(chunk_len) {
        trip.extend(chunk.iter().map(Fix::point));

        // Past the first chunk the geometry starts at the previous chunk's last fix
        let first = chunk.first().and_then(|fix| fix.timestamp);
        let begin = previous_end.or(first);
        let end = chunk.last().and_then(|fix| fix.timestamp);
        match (begin, end) {
            (Some(begin), Some(end)) => trip.set_time_span(begin, end),
            _ => trip.clear_time_span(),
        }
        previous_end = end;

        trip.make_placemark(&mut *folder);
    }
}
