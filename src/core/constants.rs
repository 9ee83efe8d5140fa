//! # Bot Constants
//!
//! Credentials, colors and roles assembled once at startup.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::config::{normalize_key, scalar_to_string, ConfigLoader, NormalizedConfig};
use crate::core::error::ConfigError;
use crate::features::colors::palette::{ColorPalette, COLOR_KEY};
use crate::features::roles::{RoleDirectory, RoleRegistry, RoleRequest, ROLES_KEY};
use log::{error, info};
use serenity::model::guild::Role;
use std::fmt;
use std::path::Path;

/// Credential keys as written in `config.yml`
pub const PREFIX_KEY: &str = "prefix";
pub const BOT_TOKEN_KEY: &str = "bot-token";

/// Command prefix and bot token
#[derive(Clone, PartialEq, Eq)]
pub struct BotCredentials {
    prefix: String,
    token: String,
}

impl BotCredentials {
    pub fn new(prefix: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            token: token.into(),
        }
    }

    pub fn from_config(config: &NormalizedConfig, log_target: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(
            required_string(config, PREFIX_KEY, log_target)?,
            required_string(config, BOT_TOKEN_KEY, log_target)?,
        ))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Token stays out of logs and panic messages
impl fmt::Debug for BotCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotCredentials")
            .field("prefix", &self.prefix)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Look `key` up under its normalized name; errors name it as the file does.
fn required_string(
    config: &NormalizedConfig,
    key: &str,
    log_target: &str,
) -> Result<String, ConfigError> {
    let Some(value) = config.get(&normalize_key(key)) else {
        error!(target: log_target, "Missing {key} from the configuration");
        return Err(ConfigError::MissingRequiredKey(key.to_string()));
    };
    scalar_to_string(value).ok_or_else(|| {
        error!(target: log_target, "{key} must be a string");
        ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "a string",
        }
    })
}

/// Everything the rest of the bot reads from `config.yml`
#[derive(Debug, Clone)]
pub struct Constants<R = Role> {
    pub bot: BotCredentials,
    pub color: ColorPalette,
    pub roles: RoleRegistry<R>,
}

impl<R> Constants<R> {
    /// Assemble from an already loaded configuration. The first failure aborts.
    pub fn from_config<D>(
        config: &NormalizedConfig,
        directory: &D,
        log_target: &str,
    ) -> Result<Self, ConfigError>
    where
        D: RoleDirectory<Role = R>,
    {
        let bot = BotCredentials::from_config(config, log_target)?;
        let color = ColorPalette::from_config(config.get(COLOR_KEY), log_target)?;
        let requests = RoleRequest::from_config(config.get(ROLES_KEY), log_target)?;
        let roles = RoleRegistry::resolve(directory, &requests, log_target);

        info!(
            target: log_target,
            "Loaded constants: prefix {:?}, {} colors, {}/{} roles resolved",
            bot.prefix(),
            color.len(),
            roles.len(),
            requests.len()
        );
        Ok(Self { bot, color, roles })
    }
}

/// Load `path` and assemble the constants, resolving roles through `directory`.
pub fn get_constants<D>(directory: &D, path: impl AsRef<Path>) -> Result<Constants<D::Role>, ConfigError>
where
    D: RoleDirectory,
{
    let loader = ConfigLoader::new(path.as_ref());
    let config = loader.load()?;
    Constants::from_config(&config, directory, loader.log_target())
}
