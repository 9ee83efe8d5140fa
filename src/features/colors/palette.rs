//! Hex color strings to integer colors.
//!
//! The `color` section is a single-element list wrapping the name → hex
//! mapping. Only the first element is read.

use crate::core::config::{scalar_to_string, value_kind};
use crate::core::error::ConfigError;
use log::{debug, error};
use serde_yaml::{Mapping, Value};
use serenity::utils::Colour;
use std::collections::BTreeMap;

/// Config key holding the palette, after normalization
pub const COLOR_KEY: &str = "COLOR";

/// The same key as written in `config.yml`, used in errors
const COLOR_FILE_KEY: &str = "color";

/// Parse `#RRGGBB`, `0xRRGGBB` or bare `RRGGBB` into an integer.
///
/// Any number of hex digits is accepted as long as the result fits in 32 bits.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Color name → integer value. Names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorPalette {
    colors: BTreeMap<String, u32>,
}

impl ColorPalette {
    /// Build from the normalized `COLOR` value.
    ///
    /// `None` and an empty list give an empty palette. A bare mapping is
    /// accepted as the palette itself. Diagnostics go to `log_target`.
    pub fn from_config(value: Option<&Value>, log_target: &str) -> Result<Self, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        match value {
            Value::Sequence(items) => match items.first() {
                None => Ok(Self::default()),
                Some(Value::Mapping(mapping)) => Self::from_mapping(mapping, log_target),
                Some(other) => Err(invalid_section(other, log_target)),
            },
            Value::Mapping(mapping) => Self::from_mapping(mapping, log_target),
            other => Err(invalid_section(other, log_target)),
        }
    }

    pub fn from_mapping(mapping: &Mapping, log_target: &str) -> Result<Self, ConfigError> {
        let mut colors = BTreeMap::new();
        for (name, raw) in mapping {
            let Some(name) = scalar_to_string(name) else {
                return Err(invalid_section(name, log_target));
            };

            let parsed = raw.as_str().and_then(parse_hex_color);
            let Some(color) = parsed else {
                let raw = scalar_to_string(raw).unwrap_or_else(|| value_kind(raw).to_string());
                error!(target: log_target, "Invalid color '{name}': {raw:?}");
                return Err(ConfigError::InvalidColorValue { name, raw });
            };

            debug!(target: log_target, "Loaded color '{name}' = {color:#08X}");
            colors.insert(name, color);
        }
        Ok(Self { colors })
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.colors.get(name).copied()
    }

    /// Color as the client's embed colour type
    pub fn colour(&self, name: &str) -> Option<Colour> {
        self.get(name).map(Colour::new)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

fn invalid_section(found: &Value, log_target: &str) -> ConfigError {
    error!(target: log_target, "Invalid color section: found {}", value_kind(found));
    ConfigError::InvalidValue {
        key: COLOR_FILE_KEY.to_string(),
        expected: "a list whose first element maps color names to hex strings",
    }
}
