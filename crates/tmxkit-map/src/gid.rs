//! Global tile ids and their packed flip flags.

/// Bit 31: the tile is mirrored horizontally.
pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
/// Bit 30: the tile is mirrored vertically.
pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
/// Bit 29: the tile is flipped along its diagonal.
pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;

const FLIP_MASK: u32 = FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY;

/// A tile reference with its flip flags separated from the GID.
///
/// A `gid` of 0 is an empty cell, whatever the flags say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileRef {
    pub gid: u32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub flip_diagonal: bool,
}

impl TileRef {
    /// Split a raw 32-bit tile reference into bare GID and flags.
    ///
    /// ```
    /// use tmxkit_map::TileRef;
    ///
    /// let tile = TileRef::from_raw(0xA000_0005);
    /// assert_eq!(tile.gid, 5);
    /// assert!(tile.flip_horizontal && tile.flip_diagonal && !tile.flip_vertical);
    /// ```
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            gid: raw & !FLIP_MASK,
            flip_horizontal: raw & FLIPPED_HORIZONTALLY != 0,
            flip_vertical: raw & FLIPPED_VERTICALLY != 0,
            flip_diagonal: raw & FLIPPED_DIAGONALLY != 0,
        }
    }

    /// Pack the GID and flags back into the raw form.
    #[inline]
    pub const fn to_raw(&self) -> u32 {
        let mut raw = self.gid & !FLIP_MASK;
        if self.flip_horizontal {
            raw |= FLIPPED_HORIZONTALLY;
        }
        if self.flip_vertical {
            raw |= FLIPPED_VERTICALLY;
        }
        if self.flip_diagonal {
            raw |= FLIPPED_DIAGONALLY;
        }
        raw
    }

    /// Check if this reference points at no tile.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.gid == 0
    }
}
