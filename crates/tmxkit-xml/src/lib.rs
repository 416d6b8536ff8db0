//! XML element tree and document loading for TMX documents.
//!
//! TMX maps (`.tmx`) and external tilesets (`.tsx`) are plain XML. This crate
//! turns their text into an owned [`XmlElement`] tree and defines the
//! [`DocumentLoader`] seam the map parser uses to fetch documents by path.
//!
//! # Example
//!
//! ```
//! use tmxkit_xml::XmlElement;
//!
//! let root = XmlElement::parse_str(r#"<map version="1.10"><properties/></map>"#)?;
//! assert_eq!(root.name(), "map");
//! assert_eq!(root.attr("version"), Some("1.10"));
//! assert!(root.child("properties").is_some());
//! # Ok::<(), tmxkit_xml::Error>(())
//! ```

mod element;
mod error;
mod loader;
mod parser;

pub use element::XmlElement;
pub use error::{Error, Result};
pub use loader::{DocumentLoader, FsLoader, MemoryLoader};
