//! Error types for XML tree building and document loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading an XML document.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading a document.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The loader has no document at this path.
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document contains no root element.
    #[error("no root element found in XML")]
    NoRoot,
}

/// Result type for XML operations.
pub type Result<T> = std::result::Result<T, Error>;
