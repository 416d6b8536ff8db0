//! tmxkit - Tiled TMX map loading library.
//!
//! This crate provides a single entry point to the tmxkit crates for reading
//! maps made with the Tiled editor.
//!
//! # Crates
//!
//! - [`tmxkit_common`] - Shared primitives (colors, little-endian reading)
//! - [`tmxkit_xml`] - XML element tree and document loaders
//! - [`tmxkit_map`] - The TMX model: maps, tilesets, layers, objects
//!
//! # Example
//!
//! ```no_run
//! use tmxkit::prelude::*;
//!
//! let map = Map::open("levels/first.tmx")?;
//! for layer in map.draw_order() {
//!     println!("{} ({:?})", layer.name(), layer.kind());
//! }
//!
//! if let Some(ground) = map.tile_layers().get("Ground") {
//!     let used = ground.tiles.iter().filter(|t| !t.is_empty()).count();
//!     println!("Ground uses {used} cells");
//! }
//! # Ok::<(), tmxkit::map::Error>(())
//! ```

pub use tmxkit_common as common;
pub use tmxkit_map as map;
pub use tmxkit_xml as xml;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tmxkit_common::Color;
    pub use tmxkit_map::{
        ImageLayer, LayerKind, LayerRef, Map, Object, ObjectGroup, Orientation, Properties,
        PropertyValue, Shape, TileLayer, TileRef, Tileset,
    };
    pub use tmxkit_xml::{DocumentLoader, FsLoader, MemoryLoader};
}

// Re-export the entry point at the crate root
pub use tmxkit_map::Map;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
