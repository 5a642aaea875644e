// This is the entry point of the modmail bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): modes, plugins, configuration
// - `infra/` = Implementations of core traits (plugin directories, plugin index)
// - `discord/` = Discord-specific adapters (extensions, commands, responses)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Pick the extensions for the current mode
// 4. Set up the Discord framework

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::config::{BotConfig, Settings};
use crate::core::extensions::BotMode;
use crate::core::plugins::{ManifestSource, PluginService};
use crate::discord::extensions::{all_extensions, LoadedExtensions};
use crate::discord::{responses, Data, Error};
use crate::infra::plugins::{DirectoryManifestSource, PluginIndexClient};
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise the verbosity follows the bot mode.
fn init_logging(mode: BotMode) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(mode.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Local directories first, in the configured order, then the remote index.
fn plugin_sources(config: &BotConfig) -> anyhow::Result<Vec<Box<dyn ManifestSource>>> {
    let mut sources: Vec<Box<dyn ManifestSource>> = config
        .plugin_dirs
        .iter()
        .map(|dir| Box::new(DirectoryManifestSource::new(dir)) as Box<dyn ManifestSource>)
        .collect();

    if let Some(url) = &config.plugin_index_url {
        let client = PluginIndexClient::new(url.clone())
            .context("Failed to create plugin index client")?;
        sources.push(Box::new(client));
    }

    Ok(sources)
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                "Command failed: {}",
                error
            );
            if let Err(e) = responses::send_negatory_response(ctx, &error.to_string()).await {
                tracing::error!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env().context("Failed to load configuration")?;
    init_logging(config.mode);
    tracing::info!(mode = %config.mode, prefix = %config.prefix, "Starting modmail");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let sources = plugin_sources(&config)?;
    for source in &sources {
        tracing::debug!(source = %source.describe(), "Registered plugin source");
    }
    let plugin_service = Arc::new(
        PluginService::new(sources)
            .await
            .context("Failed to discover plugins")?,
    );

    let extensions = Arc::new(LoadedExtensions::load(config.mode, all_extensions()));
    for status in extensions.statuses() {
        if status.loaded {
            tracing::info!(extension = status.name, mask = status.mask, "Loaded extension");
        } else {
            tracing::debug!(extension = status.name, mask = status.mask, "Skipped extension");
        }
    }
    tracing::info!(
        mode = %extensions.mode(),
        extensions = ?extensions.loaded_names().collect::<Vec<_>>(),
        "Extensions ready"
    );

    let token = config.token.clone();
    let settings = Arc::new(Settings::new(config));

    let data = Data {
        settings,
        plugins: Arc::clone(&plugin_service),
        extensions: Arc::clone(&extensions),
        started_at: chrono::Utc::now(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: extensions.commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                // The prefix can change at runtime through `config set`.
                dynamic_prefix: Some(|ctx| {
                    Box::pin(async move { Ok(Some(ctx.data.settings.prefix().await)) })
                }),
                mention_as_prefix: true,
                ..Default::default()
            },
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    data.extensions.dispatch(ctx, event, data).await;
                    Ok(())
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    commands = framework.options().commands.len(),
                    "Commands registered"
                );
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
