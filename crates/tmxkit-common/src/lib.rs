//! Common utilities for tmxkit.
//!
//! This crate provides foundational types used across the tmxkit crates:
//!
//! - [`BinaryReader`] - Little-endian word reading from decoded tile buffers
//! - [`Color`] - RGBA color parsed from TMX hex notation

mod color;
mod error;
mod reader;

pub use color::Color;
pub use error::{Error, Result};
pub use reader::BinaryReader;
