//! Typed attribute access for XML elements.

use std::str::FromStr;

use tmxkit_common::Color;
use tmxkit_xml::XmlElement;

use crate::{Error, Result};

/// Reads typed attributes from one element.
///
/// `kind` selects which error variant a missing or unconvertible attribute
/// becomes, so the tileset parser reports `MalformedTileset`, the layer
/// parser `MalformedLayerData`, and so on.
pub(crate) struct Attributes<'a> {
    element: &'a XmlElement,
    kind: fn(String) -> Error,
}

impl<'a> Attributes<'a> {
    pub(crate) fn new(element: &'a XmlElement, kind: fn(String) -> Error) -> Self {
        Self { element, kind }
    }

    /// Raw attribute text.
    pub(crate) fn str(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }

    /// Raw attribute text, empty when absent.
    pub(crate) fn string(&self, name: &str) -> String {
        self.str(name).unwrap_or_default().to_string()
    }

    pub(crate) fn required_str(&self, name: &str) -> Result<&'a str> {
        self.str(name).ok_or_else(|| self.missing(name))
    }

    pub(crate) fn required<T: FromStr>(&self, name: &str) -> Result<T> {
        let value = self.required_str(name)?;
        value.parse().map_err(|_| self.invalid(name, value))
    }

    /// `None` when absent; an error when present but unconvertible.
    pub(crate) fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.str(name)
            .map(|value| value.parse().map_err(|_| self.invalid(name, value)))
            .transpose()
    }

    pub(crate) fn or<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        Ok(self.optional(name)?.unwrap_or(default))
    }

    /// Boolean attribute written as `0`/`1` (or `true`/`false`).
    pub(crate) fn flag(&self, name: &str, default: bool) -> Result<bool> {
        match self.str(name) {
            None => Ok(default),
            Some("1") | Some("true") => Ok(true),
            Some("0") | Some("false") => Ok(false),
            Some(value) => Err(self.invalid(name, value)),
        }
    }

    pub(crate) fn color(&self, name: &str) -> Result<Option<Color>> {
        self.str(name).map(|value| parse_color(name, value)).transpose()
    }

    fn missing(&self, name: &str) -> Error {
        (self.kind)(format!(
            "<{}> is missing required attribute `{}`",
            self.element.name(),
            name
        ))
    }

    fn invalid(&self, name: &str, value: &str) -> Error {
        (self.kind)(format!(
            "<{}> attribute `{}` has invalid value {:?}",
            self.element.name(),
            name,
            value
        ))
    }
}

/// Parse a hex color, reporting failures as [`Error::MalformedColor`].
pub(crate) fn parse_color(attribute: &str, value: &str) -> Result<Color> {
    value.parse().map_err(|_| Error::MalformedColor {
        attribute: attribute.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> XmlElement {
        XmlElement::new("layer")
            .attr_value("width", "10")
            .attr_value("opacity", "0.5")
            .attr_value("visible", "0")
            .attr_value("tintcolor", "#ff00ff")
            .attr_value("height", "ten")
    }

    #[test]
    fn test_required_and_optional() {
        let el = element();
        let attrs = Attributes::new(&el, Error::MalformedLayerData);

        assert_eq!(attrs.required::<u32>("width").unwrap(), 10);
        assert_eq!(attrs.optional::<f32>("opacity").unwrap(), Some(0.5));
        assert_eq!(attrs.optional::<u32>("id").unwrap(), None);
        assert_eq!(attrs.or("offsetx", 0.0f32).unwrap(), 0.0);
        assert_eq!(attrs.string("name"), "");
    }

    #[test]
    fn test_errors_use_selected_kind() {
        let el = element();
        let attrs = Attributes::new(&el, Error::MalformedTileset);

        let missing = attrs.required::<u32>("tilewidth").unwrap_err();
        assert!(matches!(missing, Error::MalformedTileset(ref m) if m.contains("tilewidth")));

        let invalid = attrs.optional::<u32>("height").unwrap_err();
        assert!(matches!(invalid, Error::MalformedTileset(ref m) if m.contains("\"ten\"")));
    }

    #[test]
    fn test_flag() {
        let el = element();
        let attrs = Attributes::new(&el, Error::MalformedDocument);

        assert!(!attrs.flag("visible", true).unwrap());
        assert!(attrs.flag("locked", true).unwrap());
        assert!(attrs.flag("width", true).is_err());
    }

    #[test]
    fn test_color() {
        let el = element();
        let attrs = Attributes::new(&el, Error::MalformedDocument);

        assert_eq!(attrs.color("tintcolor").unwrap(), Some(Color::rgb(0xFF, 0, 0xFF)));
        assert_eq!(attrs.color("backgroundcolor").unwrap(), None);

        let err = attrs.color("height").unwrap_err();
        assert!(matches!(err, Error::MalformedColor { ref attribute, .. } if attribute == "height"));
    }
}
