//! Binary reader for decoded tile buffers.
//!
//! This module provides [`BinaryReader`], a cursor over a byte slice that reads
//! the little-endian 32-bit words TMX uses for base64 layer data.

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result};

/// A binary reader over a byte slice.
///
/// # Example
///
/// ```
/// use tmxkit_common::BinaryReader;
///
/// let data = [0x01, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0xA0];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 1);
/// assert_eq!(reader.read_u32().unwrap(), 0xA000_0005);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read every remaining little-endian u32.
    ///
    /// Fails without consuming anything if the remaining length is not a
    /// multiple of four.
    pub fn read_u32_to_end(&mut self) -> Result<Vec<u32>> {
        let remaining = self.remaining();
        if remaining % 4 != 0 {
            return Err(Error::UnexpectedEof {
                needed: remaining.next_multiple_of(4),
                available: remaining,
            });
        }

        let mut words = Vec::with_capacity(remaining / 4);
        while !self.is_empty() {
            words.push(self.read_u32()?);
        }
        Ok(words)
    }
}
