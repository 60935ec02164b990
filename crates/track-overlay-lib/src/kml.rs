//! KML tree construction and text emission
//!
//! [`document_node`] lowers a [`Document`] into a small element tree whose tag names
//! are the ones KML consumers expect. [`write_kml`] streams that tree as XML with
//! `quick-xml`.

use crate::{
    Document, Folder, Geometry, LineString, OverlayError, Placemark, Polygon, Result, Style,
    StyleKind, coords,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const GX_NAMESPACE: &str = "http://www.google.com/kml/ext/2.2";

const CLAMP_TO_GROUND: &str = "clampToGround";

/// One element of the KML tree
#[derive(Clone, Debug, PartialEq)]
pub struct KmlNode {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<KmlNode>,
}

impl KmlNode {
    pub fn element(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn text_element(tag: &'static str, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::element(tag)
        }
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn with_child(mut self, child: KmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&KmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Follow a chain of direct children
    pub fn path(&self, tags: &[&str]) -> Option<&KmlNode> {
        tags.iter().try_fold(self, |node, tag| node.child(tag))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Shared head of `<Document>` and `<Folder>`
fn container_node(tag: &'static str, name: &str, visibility: bool, open: bool) -> KmlNode {
    let mut node = KmlNode::element(tag);
    node.children = vec![
        KmlNode::text_element("name", name),
        KmlNode::text_element("visibility", flag(visibility)),
        KmlNode::text_element("open", flag(open)),
    ];
    node
}

/// Lower a whole document, including the `<kml>` root
pub fn document_node(document: &Document) -> KmlNode {
    let (visibility, open) = (document.visibility, document.open);
    let mut node = container_node("Document", document.name(), visibility, open);

    let styles = document.styles().iter().map(style_node);
    let folders = document.folders().iter().map(folder_node);
    let placemarks = document.placemarks().iter().map(placemark_node);
    node.children.extend(styles);
    node.children.extend(folders);
    node.children.extend(placemarks);

    KmlNode::element("kml")
        .with_attribute("xmlns", KML_NAMESPACE)
        .with_attribute("xmlns:gx", GX_NAMESPACE)
        .with_child(node)
}

pub fn style_node(style: &Style) -> KmlNode {
    let body = match &style.kind {
        StyleKind::Line { color, width } => KmlNode::element("LineStyle")
            .with_child(KmlNode::text_element("color", color.as_str()))
            .with_child(KmlNode::text_element("width", width.to_string())),
        StyleKind::Icon { href } => {
            let href = KmlNode::text_element("href", href.as_str());
            let icon = KmlNode::element("Icon").with_child(href);
            KmlNode::element("IconStyle").with_child(icon)
        }
        StyleKind::Polygon { color, filled } => KmlNode::element("PolyStyle")
            .with_child(KmlNode::text_element("color", color.as_str()))
            .with_child(KmlNode::text_element("fill", flag(*filled))),
    };

    KmlNode::element("Style")
        .with_attribute("id", style.id.as_str())
        .with_child(body)
}

pub fn folder_node(folder: &Folder) -> KmlNode {
    let (visibility, open) = (folder.visibility, folder.open);
    let mut node = container_node("Folder", folder.name(), visibility, open);

    let placemarks = folder.placemarks().iter().map(placemark_node);
    node.children.extend(placemarks);
    node
}

/// Children follow the KML Feature order: name, TimeSpan, styleUrl, geometry
pub fn placemark_node(placemark: &Placemark) -> KmlNode {
    let mut node = KmlNode::element("Placemark");

    if let Some(name) = &placemark.name {
        let name = KmlNode::text_element("name", name.as_str());
        node.children.push(name);
    }
    if let Some(span) = &placemark.time_span {
        node.children.push(
            KmlNode::element("TimeSpan")
                .with_child(KmlNode::text_element("begin", span.begin_text()))
                .with_child(KmlNode::text_element("end", span.end_text())),
        );
    }
    if let Some(tag) = &placemark.style_tag {
        let style_url = KmlNode::text_element("styleUrl", tag.url());
        node.children.push(style_url);
    }
    node.children.push(geometry_node(&placemark.geometry));

    node
}

pub fn geometry_node(geometry: &Geometry) -> KmlNode {
    match geometry {
        Geometry::LineString(line) => line_node(line),
        Geometry::Polygon(polygon) => polygon_node(polygon),
        Geometry::MultiGeometry(parts) => {
            let mut node = KmlNode::element("MultiGeometry");
            node.children.extend(parts.iter().map(geometry_node));
            node
        }
    }
}

fn surface_flags(node: &mut KmlNode, tessellate: bool, clamp_to_ground: bool) {
    if tessellate {
        let tessellate = KmlNode::text_element("tessellate", "1");
        node.children.push(tessellate);
    }
    if clamp_to_ground {
        let mode = KmlNode::text_element("gx:altitudeMode", CLAMP_TO_GROUND);
        node.children.push(mode);
    }
}

fn line_node(line: &LineString) -> KmlNode {
    let mut node = KmlNode::element("LineString");
    surface_flags(&mut node, line.tessellate, line.clamp_to_ground);
    node.with_child(KmlNode::text_element(
        "coordinates",
        coords::format_coordinates(&line.points),
    ))
}

fn polygon_node(polygon: &Polygon) -> KmlNode {
    let mut node = KmlNode::element("Polygon");
    surface_flags(&mut node, polygon.tessellate, polygon.clamp_to_ground);
    let coordinates = KmlNode::text_element(
        "coordinates",
        coords::format_coordinates(polygon.outer_ring()),
    );
    let ring = KmlNode::element("LinearRing").with_child(coordinates);
    let boundary = KmlNode::element("outerBoundaryIs").with_child(ring);
    node.with_child(boundary)
}

pub(crate) fn xml_error<E: std::fmt::Display>(err: E) -> OverlayError {
    OverlayError::Xml(err.to_string())
}

/// Write the document as indented KML text
pub fn write_kml<W: Write>(document: &Document, writer: W) -> Result<()> {
    #[cfg(feature = "profiling")]
    profiling::scope!("kml::write_kml");

    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    write_node(&mut xml, &document.serialize())?;

    let mut inner = xml.into_inner();
    inner.write_all(b"\n")?;
    inner.flush()?;
    Ok(())
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &KmlNode) -> Result<()> {
    let start = BytesStart::new(node.tag).with_attributes(
        node.attributes
            .iter()
            .map(|(name, value)| (*name, value.as_str())),
    );

    if node.text.is_none() && node.children.is_empty() {
        xml.write_event(Event::Empty(start)).map_err(xml_error)?;
        return Ok(());
    }

    xml.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(text) = &node.text {
        xml.write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
    }
    for child in &node.children {
        write_node(xml, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new(node.tag)))
        .map_err(xml_error)?;

    Ok(())
}

/// Write the document to a file, replacing any existing content
pub fn write_kml_file<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_kml(document, BufWriter::new(file))?;

    tracing::info!(
        "Wrote KML document '{}' ({} placemarks) to {}",
        document.name(),
        document.all_placemarks().count(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GeoPoint, PlacemarkContainer, SphericalEarth, StyleKind, TimeSpan, TrackDecimator,
        primitives,
    };

    const RING_PATH: [&str; 4] = ["Polygon", "outerBoundaryIs", "LinearRing", "coordinates"];

    fn sample_document() -> Document {
        let mut doc = Document::new("I_80");
        let line = StyleKind::line("#ffff0000", 7.0);
        let pin = StyleKind::icon("http://maps.google.com/pin.png");
        let area = StyleKind::polygon("7f00ff00", true);
        let edges = doc.styles_mut().create("edges", line);
        doc.styles_mut().create("pin", pin);
        doc.styles_mut().create("area", area);

        let a = GeoPoint::new(41.164, -104.843);
        let b = GeoPoint::new(41.165, -104.844);
        doc.append(primitives::segment(&edges, a, b, Some("0")));
        doc
    }

    fn text_at<'a>(node: &'a KmlNode, path: &[&str]) -> Option<&'a str> {
        node.path(path)?.text.as_deref()
    }

    #[test]
    fn test_document_tree_shape() {
        let root = sample_document().serialize();
        assert_eq!(root.tag, "kml");
        assert_eq!(root.attribute("xmlns"), Some(KML_NAMESPACE));
        assert_eq!(root.attribute("xmlns:gx"), Some(GX_NAMESPACE));

        let document = root.child("Document").unwrap();
        assert_eq!(text_at(document, &["name"]), Some("I_80"));
        assert_eq!(text_at(document, &["visibility"]), Some("0"));
        assert_eq!(text_at(document, &["open"]), Some("0"));

        let line = document
            .path(&["Placemark", "MultiGeometry", "LineString"])
            .unwrap();
        assert_eq!(text_at(line, &["tessellate"]), Some("1"));
        assert_eq!(text_at(line, &["gx:altitudeMode"]), Some("clampToGround"));
        assert_eq!(
            text_at(line, &["coordinates"]),
            Some("-104.843,41.164,0 -104.844,41.165,0")
        );
    }

    #[test]
    fn test_style_nodes() {
        let root = sample_document().serialize();
        let document = root.child("Document").unwrap();
        let styles: Vec<_> = document
            .children
            .iter()
            .filter(|node| node.tag == "Style")
            .collect();
        assert_eq!(styles.len(), 3);

        assert_eq!(styles[0].attribute("id"), Some("edges"));
        assert_eq!(text_at(styles[0], &["LineStyle", "width"]), Some("7"));
        let href = text_at(styles[1], &["IconStyle", "Icon", "href"]);
        assert_eq!(href, Some("http://maps.google.com/pin.png"));
        assert_eq!(text_at(styles[2], &["PolyStyle", "fill"]), Some("1"));
    }

    #[test]
    fn test_polygon_ring_nodes() {
        let ne = GeoPoint::new(2.0, 3.0);
        let sw = GeoPoint::new(-1.0, -4.0);
        let node = placemark_node(&primitives::bounding_box("area", ne, sw));
        assert_eq!(
            text_at(&node, &RING_PATH),
            Some("3,2,0 3,-1,0 -4,-1,0 -4,2,0 3,2,0")
        );
        assert!(node.path(&["Polygon", "tessellate"]).is_some());
    }

    #[test]
    fn test_circle_ring_is_not_repeated() {
        let center = GeoPoint::new(10.0, 10.0);
        let earth = SphericalEarth::default();
        let result = primitives::circle("area", center, 250.0, 6, None, &earth);

        let node = placemark_node(&result.unwrap());
        let text = text_at(&node, &RING_PATH).unwrap();
        assert_eq!(text.split(' ').count(), 6);
    }

    #[test]
    fn test_placemark_child_order() {
        let span = TimeSpan::from_unix(1_500_000_000, 1_500_000_060).unwrap();
        let mut trip = TrackDecimator::new(2).unwrap().with_style_tag("trip");
        trip.set_time_span(span.begin, span.end);
        trip.add_point(0.0, 0.0);
        trip.add_point(0.0, 1.0);
        let placemark = trip.take_placemark().unwrap().with_name("leg");

        let node = placemark_node(&placemark);
        let tags: Vec<_> = node.children.iter().map(|child| child.tag).collect();
        assert_eq!(tags, vec!["name", "TimeSpan", "styleUrl", "MultiGeometry"]);
        assert_eq!(
            text_at(&node, &["TimeSpan", "begin"]),
            Some("2017-07-14T02:40:00Z")
        );
    }

    #[test]
    fn test_kml_text_output() {
        let mut doc = sample_document();
        doc.add_folder("trips");
        let text = doc.to_kml_string().unwrap();

        let declaration = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
        assert!(text.starts_with(declaration));
        assert!(text.trim_end().ends_with("</kml>"));

        let fragments = [
            r#"<kml xmlns="http://www.opengis.net/kml/2.2""#,
            "<name>I_80</name>",
            r#"<Style id="edges">"#,
            "<styleUrl>#edges</styleUrl>",
            "<tessellate>1</tessellate>",
            "<gx:altitudeMode>clampToGround</gx:altitudeMode>",
            "<coordinates>-104.843,41.164,0 -104.844,41.165,0</coordinates>",
            "<name>trips</name>",
        ];
        for fragment in fragments {
            assert!(text.contains(fragment), "missing {fragment}");
        }
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::new("roads & rails <draft>");
        let point = GeoPoint::default();
        doc.append(primitives::segment("s", point, point, None));
        let text = doc.to_kml_string().unwrap();
        assert!(text.contains("roads &amp; rails &lt;draft&gt;"));
    }

    #[test]
    fn test_write_kml_file() {
        let doc = sample_document();
        let name = format!("track-overlay-test-{}.kml", std::process::id());
        let path = std::env::temp_dir().join(name);

        write_kml_file(&doc, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, doc.to_kml_string().unwrap());
    }
}
