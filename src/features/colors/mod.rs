//! # Color Palette Feature
//!
//! Named embed colors read from the `color` section of `config.yml`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod palette;

pub use palette::{parse_hex_color, ColorPalette};
