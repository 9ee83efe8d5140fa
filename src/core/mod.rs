//! # Core Module
//!
//! Configuration loading, error types and the startup constants bundle.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod config;
pub mod constants;
pub mod error;

#[cfg(test)]
pub(crate) mod log_capture;

// Re-export commonly used items
pub use config::{
    load_configuration, normalize_key, ConfigLoader, NormalizedConfig, RawConfig,
    DEFAULT_CONFIG_FILENAME, DEFAULT_LOG_TARGET, REQUIRED_KEYS,
};
pub use constants::{get_constants, BotCredentials, Constants};
pub use error::ConfigError;
