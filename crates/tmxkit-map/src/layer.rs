//! Tile layers, image layers, and the draw-order view over all layer kinds.

use std::path::Path;

use tmxkit_xml::XmlElement;
use tracing::debug;

use crate::attributes::Attributes;
use crate::data::{self, Compression, Encoding, LayerTile};
use crate::image::Image;
use crate::list::Named;
use crate::object::ObjectGroup;
use crate::properties::Properties;
use crate::{Error, Result};

/// A `<layer>` of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub id: Option<u32>,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub visible: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub encoding: Encoding,
    pub compression: Compression,
    /// Row-major, exactly `width * height` long.
    pub tiles: Vec<LayerTile>,
    pub properties: Properties,
    /// Position among all drawable layers of the map.
    pub order_index: usize,
}

impl TileLayer {
    /// Parse a `<layer>` element. Its size defaults to the map's.
    pub fn parse(
        element: &XmlElement,
        map_width: u32,
        map_height: u32,
        order_index: usize,
    ) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedLayerData);
        let name = attrs.string("name");
        let width = attrs.or("width", map_width)?;
        let height = attrs.or("height", map_height)?;

        let data = element.child("data").ok_or_else(|| {
            Error::MalformedLayerData(format!("layer {name:?} has no <data> element"))
        })?;
        let decoded = data::decode(data, width, height, &name)?;

        debug!(
            layer = %name,
            width,
            height,
            encoding = %decoded.encoding,
            compression = %decoded.compression,
            "decoded tile layer"
        );

        Ok(Self {
            id: attrs.optional("id")?,
            width,
            height,
            opacity: attrs.or("opacity", 1.0)?,
            visible: attrs.flag("visible", true)?,
            offset_x: attrs.or("offsetx", 0.0)?,
            offset_y: attrs.or("offsety", 0.0)?,
            encoding: decoded.encoding,
            compression: decoded.compression,
            tiles: decoded.tiles,
            properties: Properties::parse_child(element)?,
            order_index,
            name,
        })
    }

    /// The cell at `(x, y)`, if inside the layer.
    pub fn tile(&self, x: u32, y: u32) -> Option<&LayerTile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y as usize * self.width as usize + x as usize)
    }

    /// Cells grouped by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[LayerTile]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}

impl Named for TileLayer {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An `<imagelayer>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub id: Option<u32>,
    pub name: String,
    /// Absent for image layers that have not been given an image yet.
    pub image: Option<Image>,
    pub opacity: f32,
    pub visible: bool,
    pub offset_x: f32,
    pub offset_y: f32,
    pub properties: Properties,
    /// Position among all drawable layers of the map.
    pub order_index: usize,
}

impl ImageLayer {
    /// Parse an `<imagelayer>`, resolving its image against `base_dir`.
    pub fn parse(element: &XmlElement, base_dir: &Path, order_index: usize) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedDocument);

        // pre-0.15 documents wrote x/y instead of offsets
        let offset_x = match attrs.optional("offsetx")? {
            Some(offset) => offset,
            None => attrs.or("x", 0.0)?,
        };
        let offset_y = match attrs.optional("offsety")? {
            Some(offset) => offset,
            None => attrs.or("y", 0.0)?,
        };

        Ok(Self {
            id: attrs.optional("id")?,
            name: attrs.string("name"),
            image: element
                .child("image")
                .map(|image| Image::parse(image, base_dir, Error::MalformedDocument))
                .transpose()?,
            opacity: attrs.or("opacity", 1.0)?,
            visible: attrs.flag("visible", true)?,
            offset_x,
            offset_y,
            properties: Properties::parse_child(element)?,
            order_index,
        })
    }
}

impl Named for ImageLayer {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Which typed list a drawable layer lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Tile,
    Objects,
    Image,
}

/// A borrowed drawable layer, as yielded by [`Map::draw_order`](crate::Map::draw_order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerRef<'a> {
    Tile(&'a TileLayer),
    Objects(&'a ObjectGroup),
    Image(&'a ImageLayer),
}

impl<'a> LayerRef<'a> {
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Tile(_) => LayerKind::Tile,
            Self::Objects(_) => LayerKind::Objects,
            Self::Image(_) => LayerKind::Image,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Self::Tile(layer) => &layer.name,
            Self::Objects(group) => &group.name,
            Self::Image(layer) => &layer.name,
        }
    }

    pub fn order_index(&self) -> usize {
        match self {
            Self::Tile(layer) => layer.order_index,
            Self::Objects(group) => group.order_index,
            Self::Image(layer) => layer.order_index,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Self::Tile(layer) => layer.visible,
            Self::Objects(group) => group.visible,
            Self::Image(layer) => layer.visible,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Self::Tile(layer) => layer.opacity,
            Self::Objects(group) => group.opacity,
            Self::Image(layer) => layer.opacity,
        }
    }

    pub fn as_tile_layer(&self) -> Option<&'a TileLayer> {
        match *self {
            Self::Tile(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_object_group(&self) -> Option<&'a ObjectGroup> {
        match *self {
            Self::Objects(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_image_layer(&self) -> Option<&'a ImageLayer> {
        match *self {
            Self::Image(layer) => Some(layer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_layer(xml: &str) -> Result<TileLayer> {
        TileLayer::parse(&XmlElement::parse_str(xml).unwrap(), 2, 2, 1)
    }

    #[test]
    fn test_tile_layer_defaults_to_map_size() {
        let layer = tile_layer(
            r#"<layer id="3" name="Ground" opacity="0.5" visible="0" offsetx="2" offsety="-4">
                <properties><property name="z" type="int" value="1"/></properties>
                <data encoding="csv">1,2,3,4</data>
            </layer>"#,
        )
        .unwrap();

        assert_eq!(layer.id, Some(3));
        assert_eq!((layer.width, layer.height), (2, 2));
        assert_eq!(layer.opacity, 0.5);
        assert!(!layer.visible);
        assert_eq!((layer.offset_x, layer.offset_y), (2.0, -4.0));
        assert_eq!(layer.encoding, Encoding::Csv);
        assert_eq!(layer.order_index, 1);
        assert_eq!(layer.properties.len(), 1);

        assert_eq!(layer.tile(1, 1).map(LayerTile::gid), Some(4));
        assert_eq!(layer.tile(2, 0), None);
        let rows: Vec<Vec<u32>> = layer
            .rows()
            .map(|row| row.iter().map(LayerTile::gid).collect())
            .collect();
        assert_eq!(rows, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_tile_layer_size_override() {
        let layer = tile_layer(
            r#"<layer name="Strip" width="3" height="1"><data encoding="csv">5,6,7</data></layer>"#,
        )
        .unwrap();
        assert_eq!((layer.width, layer.height), (3, 1));
        assert_eq!(layer.tiles.len(), 3);
    }

    #[test]
    fn test_tile_layer_errors() {
        assert!(matches!(
            tile_layer(r#"<layer name="x"/>"#),
            Err(Error::MalformedLayerData(_))
        ));
        assert!(matches!(
            tile_layer(r#"<layer name="x"><data encoding="csv">1,2,3</data></layer>"#),
            Err(Error::MalformedLayerData(_))
        ));
        assert!(matches!(
            tile_layer(r#"<layer name="x" width="two"><data/></layer>"#),
            Err(Error::MalformedLayerData(_))
        ));
    }

    #[test]
    fn test_image_layer() {
        let element = XmlElement::parse_str(
            r#"<imagelayer id="2" name="Sky" offsetx="10" opacity="0.8">
                <image source="sky.png" width="640" height="480"/>
            </imagelayer>"#,
        )
        .unwrap();
        let layer = ImageLayer::parse(&element, Path::new("maps"), 5).unwrap();

        assert_eq!(layer.name, "Sky");
        assert_eq!(layer.order_index, 5);
        assert_eq!((layer.offset_x, layer.offset_y), (10.0, 0.0));
        assert_eq!(layer.opacity, 0.8);
        assert_eq!(
            layer.image.as_ref().map(|i| i.path.as_path()),
            Some(Path::new("maps/sky.png"))
        );
    }

    #[test]
    fn test_image_layer_legacy_position_and_no_image() {
        let element = XmlElement::parse_str(r#"<imagelayer name="Old" x="3" y="4"/>"#).unwrap();
        let layer = ImageLayer::parse(&element, Path::new(""), 0).unwrap();
        assert_eq!((layer.offset_x, layer.offset_y), (3.0, 4.0));
        assert!(layer.image.is_none());
    }

    #[test]
    fn test_layer_ref_accessors() {
        let layer = tile_layer(r#"<layer name="G"><data encoding="csv">0,0,0,0</data></layer>"#).unwrap();
        let view = LayerRef::Tile(&layer);
        assert_eq!(view.kind(), LayerKind::Tile);
        assert_eq!(view.name(), "G");
        assert_eq!(view.order_index(), 1);
        assert!(view.visible());
        assert!(view.as_tile_layer().is_some());
        assert!(view.as_object_group().is_none());
        assert!(view.as_image_layer().is_none());
    }
}
