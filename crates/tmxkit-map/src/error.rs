//! Error types for TMX map parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing a TMX map.
///
/// Every error aborts the whole parse; no partially populated map is ever
/// returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid map-level structure or attributes.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Missing or invalid tileset attributes.
    #[error("malformed tileset: {0}")]
    MalformedTileset(String),

    /// Tile data that cannot be decoded into exactly width x height cells.
    #[error("malformed layer data: {0}")]
    MalformedLayerData(String),

    /// An object whose shape cannot be parsed.
    #[error("malformed object shape: {0}")]
    MalformedObjectShape(String),

    /// A color attribute that is not `RRGGBB` or `AARRGGBB` hex.
    #[error("malformed color in attribute `{attribute}`: {value:?}")]
    MalformedColor { attribute: String, value: String },

    /// An external document that the loader could not provide.
    #[error("unresolved reference {path}: {source}")]
    UnresolvedReference {
        path: PathBuf,
        #[source]
        source: tmxkit_xml::Error,
    },
}

/// Result type for map parsing.
pub type Result<T> = std::result::Result<T, Error>;

/// A keyword attribute (orientation, render order, alignment, ...) with a
/// value outside its vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown keyword {0:?}")]
pub struct UnknownKeyword(pub String);
