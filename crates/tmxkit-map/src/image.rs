//! Image references on tilesets, tiles and image layers.

use std::path::{Path, PathBuf};

use tmxkit_common::Color;
use tmxkit_xml::XmlElement;

use crate::attributes::Attributes;
use crate::{Error, Result};

/// An `<image>` reference. Pixel data is never loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// `source` exactly as written in the document.
    pub source: String,
    /// `source` resolved against the owning document's directory.
    pub path: PathBuf,
    pub format: Option<String>,
    /// Color to treat as transparent.
    pub transparent_color: Option<Color>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub(crate) fn parse(
        element: &XmlElement,
        base_dir: &Path,
        kind: fn(String) -> Error,
    ) -> Result<Self> {
        let attrs = Attributes::new(element, kind);
        if element.child("data").is_some() {
            return Err(kind("embedded <image><data> is not supported".to_string()));
        }

        let source = attrs.required_str("source")?.to_string();
        Ok(Self {
            path: base_dir.join(&source),
            source,
            format: attrs.str("format").map(str::to_string),
            transparent_color: attrs.color("trans")?,
            width: attrs.optional("width")?,
            height: attrs.optional("height")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolves_source() {
        let element = XmlElement::new("image")
            .attr_value("source", "../gfx/tiles.png")
            .attr_value("trans", "ff00ff")
            .attr_value("width", "128")
            .attr_value("height", "64");

        let image = Image::parse(&element, Path::new("maps"), Error::MalformedTileset).unwrap();
        assert_eq!(image.source, "../gfx/tiles.png");
        assert_eq!(image.path, Path::new("maps/../gfx/tiles.png"));
        assert_eq!(image.transparent_color, Some(Color::rgb(0xFF, 0, 0xFF)));
        assert_eq!((image.width, image.height), (Some(128), Some(64)));
        assert_eq!(image.format, None);
    }

    #[test]
    fn test_missing_source() {
        let element = XmlElement::new("image").attr_value("width", "16");
        let result = Image::parse(&element, Path::new(""), Error::MalformedTileset);
        assert!(matches!(result, Err(Error::MalformedTileset(_))));
    }

    #[test]
    fn test_embedded_data_rejected() {
        let element = XmlElement::new("image")
            .attr_value("format", "png")
            .child_element(XmlElement::new("data").attr_value("encoding", "base64"));
        let result = Image::parse(&element, Path::new(""), Error::MalformedDocument);
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
    }
}
