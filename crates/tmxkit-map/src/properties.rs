//! Custom properties attached to maps, layers, tilesets, tiles and objects.

use std::collections::btree_map;
use std::collections::BTreeMap;

use tmxkit_common::Color;
use tmxkit_xml::XmlElement;

use crate::attributes::{parse_color, Attributes};
use crate::{Error, Result};

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Empty color properties hold [`Color::TRANSPARENT`].
    Color(Color),
    /// Path exactly as written, relative to the owning document.
    File(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }
}

/// Property name to value, with names compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    values: BTreeMap<String, PropertyValue>,
}

impl Properties {
    /// Parse a `<properties>` element.
    ///
    /// A later `<property>` with the same name replaces an earlier one.
    pub fn parse(element: &XmlElement) -> Result<Self> {
        let mut values = BTreeMap::new();
        for property in element.children_named("property") {
            let attrs = Attributes::new(property, Error::MalformedDocument);
            let name = attrs.required_str("name")?.to_string();
            // Multi-line strings are stored as element text instead of `value`
            let raw = attrs.str("value").unwrap_or(property.text());
            let value = parse_value(attrs.str("type"), &name, raw)?;
            values.insert(name, value);
        }
        Ok(Self { values })
    }

    /// Parse the `<properties>` child of `parent`, if any.
    pub fn parse_child(parent: &XmlElement) -> Result<Self> {
        parent
            .child("properties")
            .map(Self::parse)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Add every property of `other`, replacing same-named ones.
    pub fn merge(&mut self, other: Properties) {
        self.values.extend(other.values);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Properties ordered by name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

fn parse_value(kind: Option<&str>, name: &str, raw: &str) -> Result<PropertyValue> {
    let invalid = || {
        Error::MalformedDocument(format!(
            "property {name:?} of type {} has invalid value {raw:?}",
            kind.unwrap_or("string")
        ))
    };

    let value = match kind {
        None | Some("string") => PropertyValue::String(raw.to_string()),
        Some("int") => PropertyValue::Int(raw.parse().map_err(|_| invalid())?),
        Some("float") => PropertyValue::Float(raw.parse().map_err(|_| invalid())?),
        Some("bool") => match raw {
            "true" | "1" => PropertyValue::Bool(true),
            "false" | "0" => PropertyValue::Bool(false),
            _ => return Err(invalid()),
        },
        Some("color") if raw.is_empty() => PropertyValue::Color(Color::TRANSPARENT),
        Some("color") => PropertyValue::Color(parse_color(name, raw)?),
        Some("file") => PropertyValue::File(raw.to_string()),
        // object references, class values and future types
        Some(_) => PropertyValue::String(raw.to_string()),
    };
    Ok(value)
}
