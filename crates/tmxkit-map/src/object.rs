//! Object groups and the shapes inside them.

use std::str::FromStr;

use tmxkit_common::Color;
use tmxkit_xml::XmlElement;

use crate::attributes::Attributes;
use crate::error::UnknownKeyword;
use crate::list::{Named, NamedList};
use crate::properties::Properties;
use crate::{Error, Result, TileRef};

/// Order in which a group's objects are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawOrder {
    /// Sorted by y coordinate.
    #[default]
    TopDown,
    /// Document order.
    Index,
}

impl FromStr for DrawOrder {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "topdown" => Ok(Self::TopDown),
            "index" => Ok(Self::Index),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

/// A vertex relative to its object's position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for HorizontalAlign {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "justify" => Ok(Self::Justify),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl FromStr for VerticalAlign {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

/// Contents and styling of a text object.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub font_family: String,
    pub pixel_size: u32,
    pub wrap: bool,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub kerning: bool,
    pub halign: HorizontalAlign,
    pub valign: VerticalAlign,
}

impl Text {
    fn parse(element: &XmlElement) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedObjectShape);
        Ok(Self {
            text: element.text().to_string(),
            font_family: attrs.str("fontfamily").unwrap_or("sans-serif").to_string(),
            pixel_size: attrs.or("pixelsize", 16)?,
            wrap: attrs.flag("wrap", false)?,
            color: attrs.color("color")?.unwrap_or(Color::rgb(0, 0, 0)),
            bold: attrs.flag("bold", false)?,
            italic: attrs.flag("italic", false)?,
            underline: attrs.flag("underline", false)?,
            strikeout: attrs.flag("strikeout", false)?,
            kerning: attrs.flag("kerning", true)?,
            halign: attrs.or("halign", HorizontalAlign::Left)?,
            valign: attrs.or("valign", VerticalAlign::Top)?,
        })
    }
}

/// The geometry of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle,
    Ellipse,
    Point,
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    /// A tile placed as an object, with its flip flags.
    Tile(TileRef),
    Text(Box<Text>),
}

/// An `<object>` inside an object group.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: Option<u32>,
    pub name: String,
    /// `type` (or `class` in newer documents), empty when unset.
    pub object_type: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
    pub visible: bool,
    pub shape: Shape,
    pub properties: Properties,
}

impl Object {
    pub(crate) fn parse(element: &XmlElement) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedDocument);
        let id = attrs.optional("id")?;
        let label = match id {
            Some(id) => format!("object {id}"),
            None => format!("object {:?}", attrs.string("name")),
        };

        Ok(Self {
            shape: parse_shape(element, &label)?,
            id,
            name: attrs.string("name"),
            object_type: attrs
                .str("type")
                .or(attrs.str("class"))
                .unwrap_or_default()
                .to_string(),
            x: attrs.or("x", 0.0)?,
            y: attrs.or("y", 0.0)?,
            width: attrs.or("width", 0.0)?,
            height: attrs.or("height", 0.0)?,
            rotation: attrs.or("rotation", 0.0)?,
            visible: attrs.flag("visible", true)?,
            properties: Properties::parse_child(element)?,
        })
    }

    /// Vertices of polygon and polyline shapes.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.shape {
            Shape::Polygon(points) | Shape::Polyline(points) => Some(points),
            _ => None,
        }
    }
}

impl Named for Object {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Pick the shape variant. Polygons and polylines win over `gid`, which
/// wins over `<ellipse>`; an object with no marker at all is a rectangle.
fn parse_shape(element: &XmlElement, label: &str) -> Result<Shape> {
    if let Some(polygon) = element.child("polygon") {
        return parse_points(polygon, label).map(Shape::Polygon);
    }
    if let Some(polyline) = element.child("polyline") {
        return parse_points(polyline, label).map(Shape::Polyline);
    }
    if let Some(gid) = element.attr("gid") {
        let raw = gid.parse().map_err(|_| {
            Error::MalformedObjectShape(format!("{label}: invalid gid {gid:?}"))
        })?;
        return Ok(Shape::Tile(TileRef::from_raw(raw)));
    }
    if element.child("ellipse").is_some() {
        return Ok(Shape::Ellipse);
    }
    if element.child("point").is_some() {
        return Ok(Shape::Point);
    }
    if let Some(text) = element.child("text") {
        return Text::parse(text).map(|t| Shape::Text(Box::new(t)));
    }
    Ok(Shape::Rectangle)
}

/// Parse a `points="x,y x,y ..."` attribute.
fn parse_points(element: &XmlElement, label: &str) -> Result<Vec<Point>> {
    let kind = element.name();
    let points = element.attr("points").ok_or_else(|| {
        Error::MalformedObjectShape(format!("{label}: <{kind}> has no points"))
    })?;

    let vertices = points
        .split_whitespace()
        .map(|pair| {
            pair.split_once(',')
                .and_then(|(x, y)| Some(Point { x: x.parse().ok()?, y: y.parse().ok()? }))
                .ok_or_else(|| {
                    Error::MalformedObjectShape(format!("{label}: invalid {kind} point {pair:?}"))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    if vertices.is_empty() {
        return Err(Error::MalformedObjectShape(format!("{label}: <{kind}> has no points")));
    }
    Ok(vertices)
}

/// An `<objectgroup>` layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub id: Option<u32>,
    pub name: String,
    pub color: Option<Color>,
    pub draw_order: DrawOrder,
    pub opacity: f32,
    pub visible: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub objects: NamedList<Object>,
    pub properties: Properties,
    /// Position among all drawable layers of the map.
    pub order_index: usize,
}

impl ObjectGroup {
    /// Parse an `<objectgroup>` element drawn at `order_index`.
    pub fn parse(element: &XmlElement, order_index: usize) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedDocument);

        let objects = element
            .children_named("object")
            .map(Object::parse)
            .collect::<Result<NamedList<_>>>()?;

        Ok(Self {
            id: attrs.optional("id")?,
            name: attrs.string("name"),
            color: attrs.color("color")?,
            draw_order: attrs.or("draworder", DrawOrder::TopDown)?,
            opacity: attrs.or("opacity", 1.0)?,
            visible: attrs.flag("visible", true)?,
            offset_x: attrs.or("offsetx", 0.0)?,
            offset_y: attrs.or("offsety", 0.0)?,
            objects,
            properties: Properties::parse_child(element)?,
            order_index,
        })
    }
}

impl Named for ObjectGroup {
    fn name(&self) -> &str {
        &self.name
    }
}
