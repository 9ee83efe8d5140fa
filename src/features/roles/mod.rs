//! # Role Registry Feature
//!
//! Resolves the `roles` section of `config.yml` against the roles of the
//! first guild the bot is in.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Split role requests from resolution so config is checked before connecting
//! - 1.0.0: Initial registry with serenity role lookup

pub mod directory;
pub mod registry;

pub use directory::{RoleDirectory, RoleIdentifier};
pub use registry::{RoleRegistry, RoleRequest, ROLES_KEY};
