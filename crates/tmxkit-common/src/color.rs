//! RGBA color as written in TMX documents.
//!
//! TMX stores colors as `#RRGGBB` or `#AARRGGBB` hex strings. The leading `#`
//! is optional and the digits are case-insensitive.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black, used where a document leaves a color unset.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Create a color with an explicit alpha channel.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Check if this is the transparent sentinel.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);

        // from_str_radix alone would accept a leading '+'
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }

        let channel = |start: usize| -> Result<u8, Error> {
            u8::from_str_radix(&hex[start..start + 2], 16)
                .map_err(|_| Error::InvalidColor(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(2)?, channel(4)?, channel(6)?, channel(0)?)),
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_opaque() {
        let color: Color = "#FF0000".parse().unwrap();
        assert_eq!(color, Color::rgb(0xFF, 0, 0));
        assert_eq!(color.a, 0xFF);
    }

    #[test]
    fn test_argb_order() {
        let color: Color = "#80102030".parse().unwrap();
        assert_eq!(color, Color::rgba(0x10, 0x20, 0x30, 0x80));
    }

    #[test]
    fn test_without_hash_and_lowercase() {
        let upper: Color = "A0B0C0".parse().unwrap();
        let lower: Color = "#a0b0c0".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_display_roundtrip() {
        let original = "#ff336699";
        let color: Color = original.parse().unwrap();
        assert_eq!(color.to_string(), original);
    }

    #[test]
    fn test_invalid_colors() {
        for input in ["", "#", "#FFF", "#FF00000", "#GG0000", "+FF000", "#FF0000FF00", "red"] {
            assert!(input.parse::<Color>().is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_transparent_sentinel() {
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::rgb(0, 0, 0).is_transparent());
    }
}
