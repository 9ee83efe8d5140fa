//! # Configuration Loading
//!
//! Opens `config.yml`, parses it as YAML, checks the required keys and
//! rewrites every key into upper snake case.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Log through an explicit target carried by the loader
//! - 1.0.0: Initial loader, parser, validator and normalizer

use crate::core::error::ConfigError;
use log::{debug, error, info, warn};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// File name looked up when no path is given
pub const DEFAULT_CONFIG_FILENAME: &str = "config.yml";

/// Log target used by [`ConfigLoader`] unless overridden
pub const DEFAULT_LOG_TARGET: &str = "smetch::config";

/// Keys that must be present, checked in this order
pub const REQUIRED_KEYS: [&str; 2] = ["bot-token", "prefix"];

/// Rewrite a kebab-case key into upper snake case.
pub fn normalize_key(key: &str) -> String {
    key.to_uppercase().replace('-', "_")
}

/// Parsed document before normalization, keys as written in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    entries: Vec<(String, Value)>,
}

impl RawConfig {
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for RawConfig {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RawConfig {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Validated configuration with upper-snake-case keys (`BOT_TOKEN`, `PREFIX`, ...)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedConfig {
    values: BTreeMap<String, Value>,
}

impl NormalizedConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Loads one configuration file.
///
/// Each stage can be called on its own; [`ConfigLoader::load`] runs them all.
/// Diagnostics go to `log_target` so the caller decides where they land.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    log_target: &'static str,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILENAME)
    }
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            log_target: DEFAULT_LOG_TARGET,
        }
    }

    pub fn with_log_target(mut self, target: &'static str) -> Self {
        self.log_target = target;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_target(&self) -> &'static str {
        self.log_target
    }

    fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Open the configuration file for reading.
    pub fn open(&self) -> Result<File, ConfigError> {
        let opened = File::open(&self.path).and_then(|file| {
            if file.metadata()?.is_dir() {
                return Err(io::Error::other("path is a directory"));
            }
            Ok(file)
        });

        match opened {
            Ok(file) => {
                info!(target: self.log_target, "Successfully opened the {} file", self.path.display());
                Ok(file)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let err = ConfigError::ConfigNotFound {
                    path: self.path.clone(),
                    filename: self.filename(),
                };
                error!(target: self.log_target, "{err}");
                error!(target: self.log_target, "Missing {}: {e}", self.path.display());
                Err(err)
            }
            Err(e) => {
                error!(target: self.log_target, "Failed to open {}: {e:?}", self.path.display());
                Err(ConfigError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        }
    }

    /// Parse YAML from `reader` into a [`RawConfig`].
    ///
    /// The reader is consumed and dropped before returning, on success and on failure.
    pub fn parse<R: Read>(&self, reader: R) -> Result<RawConfig, ConfigError> {
        let mut contents = String::new();
        BufReader::new(reader)
            .read_to_string(&mut contents)
            .map_err(|e| {
                error!(target: self.log_target, "Failed to read {}: {e:?}", self.path.display());
                ConfigError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            })?;

        if contents.trim().is_empty() {
            info!(target: self.log_target, "Config file is empty");
            return Ok(RawConfig::default());
        }

        let document: Value = serde_yaml::from_str(&contents).map_err(|e| {
            error!(target: self.log_target, "Failed YAML parsing: {e:?}");
            ConfigError::ConfigParseError {
                path: self.path.clone(),
                source: e,
            }
        })?;

        let mapping = match document {
            Value::Null => return Ok(RawConfig::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(self.invalid_document(format!(
                    "top level must be a mapping of keys, found {}",
                    value_kind(&other)
                )))
            }
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let Some(key) = scalar_to_string(&key) else {
                return Err(self.invalid_document(format!(
                    "top-level keys must be scalars, found {}",
                    value_kind(&key)
                )));
            };
            entries.push((key, value));
        }

        info!(target: self.log_target, "Successfully parsed the config file");
        Ok(RawConfig { entries })
    }

    fn invalid_document(&self, message: String) -> ConfigError {
        let err = ConfigError::InvalidDocument {
            path: self.path.clone(),
            message,
        };
        error!(target: self.log_target, "{err}");
        err
    }

    /// Check that every key in [`REQUIRED_KEYS`] is present.
    ///
    /// Stops at the first missing key, in declaration order.
    pub fn validate(&self, raw: &RawConfig) -> Result<(), ConfigError> {
        for key in REQUIRED_KEYS {
            if !raw.contains_key(key) {
                error!(target: self.log_target, "Missing {key} from {}", self.path.display());
                return Err(ConfigError::MissingRequiredKey(key.to_string()));
            }
            info!(target: self.log_target, "Successfully loaded the required constant: '{key}'");
        }
        Ok(())
    }

    /// Rewrite every key with [`normalize_key`]; values pass through.
    ///
    /// When two keys normalize to the same name the first one wins.
    pub fn normalize(&self, raw: RawConfig) -> NormalizedConfig {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            let normalized = normalize_key(&key);
            if values.contains_key(&normalized) {
                warn!(target: self.log_target, "Ignoring '{key}': {normalized} is already set");
                continue;
            }
            debug!(target: self.log_target, "Loaded '{key}' as {normalized}");
            values.insert(normalized, value);
        }
        NormalizedConfig { values }
    }

    /// Open, parse, validate and normalize the configuration file.
    pub fn load(&self) -> Result<NormalizedConfig, ConfigError> {
        let file = self.open()?;
        let raw = self.parse(file)?;
        self.validate(&raw)?;
        Ok(self.normalize(raw))
    }
}

/// Load `path` with a [`ConfigLoader`] logging to [`DEFAULT_LOG_TARGET`].
pub fn load_configuration(path: impl AsRef<Path>) -> Result<NormalizedConfig, ConfigError> {
    ConfigLoader::new(path.as_ref()).load()
}

/// Render a YAML scalar as text; `None` for null, sequences and mappings.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_normalizes_keys() {
        let file = write_config(
            r#"
bot-token: "abc.def"
prefix: "!"
welcome-channel: general
"#,
        );
        let config = load_configuration(file.path()).unwrap();

        assert_eq!(config.get("BOT_TOKEN").and_then(Value::as_str), Some("abc.def"));
        assert_eq!(config.get("PREFIX").and_then(Value::as_str), Some("!"));
        assert_eq!(
            config.get("WELCOME_CHANNEL").and_then(Value::as_str),
            Some("general")
        );
        assert!(config.keys().all(|k| !k.contains('-')));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_values_pass_through_unchanged() {
        let file = write_config(
            r##"
bot-token: t
prefix: "?"
color:
  - main: "#FF0000"
"##,
        );
        let config = load_configuration(file.path()).unwrap();
        let color = config.get("COLOR").unwrap();
        let first = &color.as_sequence().unwrap()[0];
        assert_eq!(first.get("main").and_then(Value::as_str), Some("#FF0000"));
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let err = load_configuration(&path).unwrap_err();
        match err {
            ConfigError::ConfigNotFound { path: p, filename } => {
                assert_eq!(p, path);
                assert_eq!(filename, "config.yml");
            }
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_path_is_not_parsed() {
        let dir = tempdir().unwrap();
        let err = load_configuration(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let file = write_config("bot-token: [unclosed\nprefix: !\n");
        let err = load_configuration(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));

        // The YAML error survives as the cause for anyhow chains
        let chain = anyhow::Error::from(err);
        let cause = chain.chain().nth(1);
        assert!(cause.is_some_and(|c| c.is::<serde_yaml::Error>()));
    }

    #[test]
    fn test_non_mapping_document_is_invalid_document() {
        let file = write_config("- bot-token\n- prefix\n");
        let err = load_configuration(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument { .. }));
    }

    #[test]
    fn test_missing_bot_token_reported_first() {
        let file = write_config("other: 1\n");
        let err = load_configuration(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKey(ref k) if k == "bot-token"));
    }

    #[test]
    fn test_missing_prefix() {
        let file = write_config("bot-token: abc\n");
        let err = load_configuration(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKey(ref k) if k == "prefix"));
    }

    #[test]
    fn test_empty_file_reports_missing_key() {
        let file = write_config("");
        let err = load_configuration(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKey(ref k) if k == "bot-token"));
    }

    #[test]
    fn test_null_required_value_counts_as_present() {
        let loader = ConfigLoader::default();
        let raw = loader.parse("bot-token:\nprefix: '!'\n".as_bytes()).unwrap();
        assert!(loader.validate(&raw).is_ok());
    }

    #[test]
    fn test_parse_reads_from_any_reader() {
        let loader = ConfigLoader::new("inline.yml").with_log_target("tests");
        let raw = loader.parse("bot-token: x\nprefix: y\n".as_bytes()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get("prefix").and_then(Value::as_str), Some("y"));
    }

    #[test]
    fn test_numeric_keys_become_strings() {
        let loader = ConfigLoader::default();
        let raw = loader.parse("1: one\nbot-token: x\n".as_bytes()).unwrap();
        assert!(raw.contains_key("1"));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("bot-token"), "BOT_TOKEN");
        assert_eq!(normalize_key("prefix"), "PREFIX");
        assert_eq!(normalize_key("a-b-c"), "A_B_C");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let loader = ConfigLoader::default();
        let raw = loader
            .parse("bot-token: x\nprefix: y\nlog-channel: z\n".as_bytes())
            .unwrap();
        let once = loader.normalize(raw);

        let again: RawConfig = once
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let twice = loader.normalize(again);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_collision_keeps_first() {
        let loader = ConfigLoader::default();
        let raw: RawConfig = vec![
            ("log-level".to_string(), Value::from("debug")),
            ("LOG_LEVEL".to_string(), Value::from("warn")),
        ]
        .into_iter()
        .collect();

        let config = loader.normalize(raw);
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("LOG_LEVEL").and_then(Value::as_str), Some("debug"));
    }

    #[test]
    fn test_default_loader_path() {
        assert_eq!(ConfigLoader::default().path(), Path::new("config.yml"));
    }
}
