//! Named visual styles
//!
//! Styles are owned by the document's [`StyleRegistry`]. Placemarks only hold a
//! [`StyleTag`], which is resolved when the document is rendered. A tag does not need
//! to exist in the registry when the placemark is built.

use std::collections::HashMap;
use std::fmt;

/// Identifier of a style, rendered as `#tag` inside a placemark
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleTag(String);

impl StyleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `styleUrl` form of this tag
    pub fn url(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for StyleTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl From<&StyleTag> for StyleTag {
    fn from(tag: &StyleTag) -> Self {
        tag.clone()
    }
}

/// The visual parameters of a style
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleKind {
    /// Line color (`aabbggrr` hex) and width in pixels
    Line { color: String, width: f64 },
    /// Icon image reference
    Icon { href: String },
    /// Polygon fill color and whether the interior is filled
    Polygon { color: String, filled: bool },
}

impl StyleKind {
    pub fn line(color: impl Into<String>, width: f64) -> Self {
        StyleKind::Line {
            color: color.into(),
            width,
        }
    }

    pub fn icon(href: impl Into<String>) -> Self {
        StyleKind::Icon { href: href.into() }
    }

    pub fn polygon(color: impl Into<String>, filled: bool) -> Self {
        StyleKind::Polygon {
            color: color.into(),
            filled,
        }
    }
}

/// A registered style
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub id: StyleTag,
    pub kind: StyleKind,
}

/// Insertion-ordered set of styles keyed by tag
///
/// Registering an existing tag replaces the style in place. Because placemarks
/// resolve their tag at render time, the replacement also affects placemarks built
/// before it.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleRegistry {
    styles: Vec<Style>,
    index: HashMap<StyleTag, usize>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style and return the tag placemarks should reference
    pub fn create(&mut self, tag: impl Into<StyleTag>, kind: StyleKind) -> StyleTag {
        let id = tag.into();
        let style = Style {
            id: id.clone(),
            kind,
        };

        match self.index.get(&id) {
            Some(&slot) => {
                tracing::warn!("Style '{}' redefined, replacing the earlier definition", id);
                self.styles[slot] = style;
            }
            None => {
                self.index.insert(id.clone(), self.styles.len());
                self.styles.push(style);
            }
        }

        id
    }

    /// Look up the current style for a tag
    pub fn resolve(&self, tag: &StyleTag) -> Option<&Style> {
        self.index.get(tag).map(|&slot| &self.styles[slot])
    }

    #[inline]
    pub fn contains(&self, tag: &StyleTag) -> bool {
        self.index.contains_key(tag)
    }

    /// Styles in first-registration order
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
