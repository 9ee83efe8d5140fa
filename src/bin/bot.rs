use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use smetch::core::{BotCredentials, ConfigLoader, Constants, DEFAULT_CONFIG_FILENAME};
use smetch::features::{ColorPalette, RoleRegistry, RoleRequest};
use smetch::features::colors::palette::COLOR_KEY;
use smetch::features::roles::ROLES_KEY;

/// Shared-data key holding the constants once roles are resolved
struct ConstantsKey;

impl TypeMapKey for ConstantsKey {
    type Value = Arc<Constants>;
}

struct Handler {
    log_target: &'static str,
    credentials: BotCredentials,
    color: ColorPalette,
    role_requests: Vec<RoleRequest>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        // Only the first guild is consulted for roles
        let guild_roles = match ready.guilds.first() {
            Some(guild) => match guild.id.roles(&ctx.http).await {
                Ok(roles) => roles,
                Err(e) => {
                    error!("Failed to fetch roles for guild {}: {e}", guild.id);
                    HashMap::new()
                }
            },
            None => {
                warn!("Bot is not in any guild; no roles will be resolved");
                HashMap::new()
            }
        };

        let roles = RoleRegistry::resolve(&guild_roles, &self.role_requests, self.log_target);
        info!(
            "🎭 Resolved {}/{} configured roles",
            roles.len(),
            self.role_requests.len()
        );

        let constants = Constants {
            bot: self.credentials.clone(),
            color: self.color.clone(),
            roles,
        };
        ctx.data
            .write()
            .await
            .insert::<ConstantsKey>(Arc::new(constants));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&log_level))
        .init();

    info!("Starting Smetch Discord Bot...");

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_FILENAME.to_string());

    // Everything except roles is checked before connecting
    let loader = ConfigLoader::new(&config_path);
    let log_target = loader.log_target();
    let config = loader.load()?;
    let credentials = BotCredentials::from_config(&config, log_target)?;
    let color = ColorPalette::from_config(config.get(COLOR_KEY), log_target)?;
    let role_requests = RoleRequest::from_config(config.get(ROLES_KEY), log_target)?;

    info!(
        "📄 Loaded {config_path}: prefix {:?}, {} colors, {} roles",
        credentials.prefix(),
        color.len(),
        role_requests.len()
    );

    let handler = Handler {
        log_target,
        credentials: credentials.clone(),
        color,
        role_requests,
    };

    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(credentials.token(), intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Establishing WebSocket connection to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
