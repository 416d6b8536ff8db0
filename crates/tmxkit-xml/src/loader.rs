//! Document loaders.
//!
//! The map parser never touches the filesystem itself: whenever it needs a
//! document (the map, or an external tileset named by a `source` attribute)
//! it asks a [`DocumentLoader`].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::{Error, Result, XmlElement};

/// Something that can turn a document path into a parsed element tree.
pub trait DocumentLoader: Send + Sync {
    /// Load the document at `path` and return its root element.
    fn load(&self, path: &Path) -> Result<XmlElement>;
}

/// Loads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<XmlElement> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        XmlElement::parse_reader(BufReader::new(file))
    }
}

/// Serves documents from memory, keyed by path.
///
/// Paths are compared exactly as given, so fixtures should be registered under
/// the same joined path the parser will request (e.g. `maps/tiles.tsx` for a
/// `source="tiles.tsx"` reference inside `maps/level.tmx`).
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: FxHashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, replacing any previous one at the same path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, xml: impl Into<String>) {
        self.documents.insert(path.into(), xml.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, path: impl Into<PathBuf>, xml: impl Into<String>) -> Self {
        self.insert(path, xml);
        self
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no documents are registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<XmlElement> {
        let xml = self
            .documents
            .get(path)
            .ok_or_else(|| Error::NotFound(path.to_path_buf()))?;
        XmlElement::parse_str(xml)
    }
}
