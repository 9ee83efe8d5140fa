// Core layer - configuration loading and the constants bundle
pub mod core;

// Features layer - colors and roles
pub mod features;

pub use core::{get_constants, load_configuration, BotCredentials, ConfigError, Constants};
pub use features::{ColorPalette, RoleDirectory, RoleRegistry};
