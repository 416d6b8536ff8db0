//! Tile layer `<data>` decoding.
//!
//! A layer's cells can be stored three ways:
//!
//! - no `encoding`: one `<tile gid="..."/>` child per cell
//! - `encoding="csv"`: comma separated GIDs
//! - `encoding="base64"`: little-endian `u32` GIDs, optionally compressed
//!   with `gzip`, `zlib` or `zstd` before encoding
//!
//! Whatever the encoding, every raw value goes through [`TileRef::from_raw`]
//! and the result must hold exactly `width * height` cells.

use std::fmt;
use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};
use tmxkit_common::BinaryReader;
use tmxkit_xml::XmlElement;

use crate::{Error, Result, TileRef};

/// How a layer's cells were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// One `<tile>` element per cell.
    #[default]
    Xml,
    Csv,
    Base64,
}

/// Compression applied under base64 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Zlib,
    Zstd,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xml => "xml",
            Self::Csv => "csv",
            Self::Base64 => "base64",
        })
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Zlib => "zlib",
            Self::Zstd => "zstd",
        })
    }
}

/// One decoded cell of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerTile {
    pub x: u32,
    pub y: u32,
    pub tile: TileRef,
}

impl LayerTile {
    /// Bare GID, 0 for an empty cell.
    #[inline]
    pub fn gid(&self) -> u32 {
        self.tile.gid
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tile.is_empty()
    }
}

/// The decoded contents of a `<data>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct TileData {
    pub encoding: Encoding,
    pub compression: Compression,
    /// Row-major, exactly `width * height` long.
    pub tiles: Vec<LayerTile>,
}

/// Decode a layer's `<data>` element into `width * height` cells.
///
/// `layer` names the owning layer in error messages.
pub fn decode(data: &XmlElement, width: u32, height: u32, layer: &str) -> Result<TileData> {
    let fail = |reason: String| Error::MalformedLayerData(format!("layer {layer:?}: {reason}"));

    if data.child("chunk").is_some() {
        return Err(fail("chunked (infinite map) data is not supported".to_string()));
    }

    let encoding = match data.attr("encoding") {
        None => Encoding::Xml,
        Some("csv") => Encoding::Csv,
        Some("base64") => Encoding::Base64,
        Some(other) => return Err(fail(format!("unknown encoding {other:?}"))),
    };
    let compression = match data.attr("compression") {
        None => Compression::None,
        Some(_) if encoding != Encoding::Base64 => {
            return Err(fail(format!("compression requires base64 encoding, found {encoding}")))
        }
        Some("gzip") => Compression::Gzip,
        Some("zlib") => Compression::Zlib,
        Some("zstd") => Compression::Zstd,
        Some(other) => return Err(fail(format!("unknown compression {other:?}"))),
    };

    let expected = u64::from(width) * u64::from(height);
    let raw = match encoding {
        Encoding::Xml => read_xml(data).map_err(fail)?,
        Encoding::Csv => read_csv(data.text()).map_err(fail)?,
        Encoding::Base64 => {
            read_base64(data.text(), compression, expected.saturating_mul(4)).map_err(fail)?
        }
    };

    if raw.len() as u64 != expected {
        return Err(fail(format!(
            "{encoding} data holds {} cells, expected {width}x{height} = {expected}",
            raw.len()
        )));
    }

    let tiles = raw
        .into_iter()
        .enumerate()
        .map(|(i, value)| LayerTile {
            x: (i % width as usize) as u32,
            y: (i / width as usize) as u32,
            tile: TileRef::from_raw(value),
        })
        .collect();

    Ok(TileData {
        encoding,
        compression,
        tiles,
    })
}

fn read_xml(data: &XmlElement) -> std::result::Result<Vec<u32>, String> {
    data.children_named("tile")
        .map(|tile| match tile.attr("gid") {
            // Tiled writes empty cells as a bare <tile/>
            None => Ok(0),
            Some(gid) => gid
                .parse()
                .map_err(|_| format!("<tile> has invalid gid {gid:?}")),
        })
        .collect()
}

fn read_csv(text: &str) -> std::result::Result<Vec<u32>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    text.strip_suffix(',')
        .unwrap_or(text)
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse()
                .map_err(|_| format!("invalid csv value {token:?}"))
        })
        .collect()
}

fn read_base64(
    text: &str,
    compression: Compression,
    expected_bytes: u64,
) -> std::result::Result<Vec<u32>, String> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("invalid base64: {e}"))?;

    let bytes = decompress(&bytes, compression, expected_bytes)
        .map_err(|e| format!("{compression} decompression failed: {e}"))?;
    if compression != Compression::None && bytes.len() as u64 > expected_bytes {
        return Err(format!(
            "{compression} data inflates to more than the {expected_bytes} bytes the layer holds"
        ));
    }

    BinaryReader::new(&bytes)
        .read_u32_to_end()
        .map_err(|_| format!("{} bytes is not a whole number of 32-bit tiles", bytes.len()))
}

/// Decompress at most `limit + 1` bytes; a longer output means the payload
/// does not fit the layer.
fn decompress(data: &[u8], compression: Compression, limit: u64) -> std::io::Result<Vec<u8>> {
    let cap = limit.saturating_add(1);
    let mut output = Vec::new();
    match compression {
        Compression::None => return Ok(data.to_vec()),
        Compression::Gzip => {
            GzDecoder::new(data).take(cap).read_to_end(&mut output)?;
        }
        Compression::Zlib => {
            ZlibDecoder::new(data).take(cap).read_to_end(&mut output)?;
        }
        #[cfg(feature = "zstd")]
        Compression::Zstd => {
            zstd::Decoder::new(data)?.take(cap).read_to_end(&mut output)?;
        }
        #[cfg(not(feature = "zstd"))]
        Compression::Zstd => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "built without the `zstd` feature",
            ))
        }
    }
    Ok(output)
}
