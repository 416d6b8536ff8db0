//! Error types for tmxkit-common.

use thiserror::Error;

/// Common error type for tmxkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Text is not a `RRGGBB` or `AARRGGBB` hex color.
    #[error("invalid color {0:?}: expected RRGGBB or AARRGGBB hex")]
    InvalidColor(String),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
