//! Configuration error taxonomy.
//!
//! Every variant is fatal at startup. Errors are logged where they arise and
//! returned unchanged to the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No {filename} file was found at {}. Please make sure the file is called '{filename}' and is in the top level directory",
        .path.display()
    )]
    ConfigNotFound { path: PathBuf, filename: String },

    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unexpected document shape in {}: {message}", .path.display())]
    InvalidDocument { path: PathBuf, message: String },

    #[error("Missing required key '{0}' from the configuration")]
    MissingRequiredKey(String),

    #[error("Invalid color value for '{name}': {raw:?} is not a hex color")]
    InvalidColorValue { name: String, raw: String },

    #[error("Invalid value for '{key}': expected {expected}")]
    InvalidValue { key: String, expected: &'static str },
}
