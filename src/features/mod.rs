//! # Features
//!
//! Sections of `config.yml` that turn into typed lookups.

pub mod colors;
pub mod roles;

pub use colors::{parse_hex_color, ColorPalette};
pub use roles::{RoleDirectory, RoleIdentifier, RoleRegistry, RoleRequest};
