//! TMX tile map parsing.
//!
//! Builds an immutable [`Map`] from a TMX document: its tilesets (inline or
//! external `.tsx`), tile layers with decoded GIDs, object groups, image
//! layers, custom properties and the draw order across all layer kinds.
//!
//! Documents are fetched through a [`DocumentLoader`]. Use [`FsLoader`] for
//! files on disk or [`MemoryLoader`] for documents held in memory.
//!
//! # Tile data
//!
//! Layer data may be stored as XML `<tile>` elements, CSV, or base64. Base64
//! payloads may be gzip, zlib or (with the default `zstd` feature) zstd
//! compressed. Every cell becomes a [`TileRef`] with the flip flags split
//! from the GID.

mod attributes;
pub mod data;
mod error;
mod gid;
mod image;
mod layer;
mod list;
mod map;
mod object;
mod properties;
mod tileset;

pub use data::{Compression, Encoding, LayerTile, TileData};
pub use error::{Error, Result, UnknownKeyword};
pub use gid::{TileRef, FLIPPED_DIAGONALLY, FLIPPED_HORIZONTALLY, FLIPPED_VERTICALLY};
pub use image::Image;
pub use layer::{ImageLayer, LayerKind, LayerRef, TileLayer};
pub use list::{Named, NamedList};
pub use map::{Map, Orientation, RenderOrder, StaggerAxis, StaggerIndex};
pub use object::{
    DrawOrder, HorizontalAlign, Object, ObjectGroup, Point, Shape, Text, VerticalAlign,
};
pub use properties::{Properties, PropertyValue};
pub use tileset::{Frame, TileOffset, Tileset, TilesetTile};

pub use tmxkit_common::Color;
pub use tmxkit_xml::{DocumentLoader, FsLoader, MemoryLoader, XmlElement};
