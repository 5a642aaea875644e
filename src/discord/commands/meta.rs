// Meta commands: information about the bot itself.

use crate::core::extensions::ExtMetadata;
use crate::discord::commands::presence;
use crate::discord::extensions::Extension;
use crate::discord::{Context, Data, Error};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;

pub struct MetaExtension;

#[async_trait]
impl Extension for MetaExtension {
    fn name(&self) -> &'static str {
        "meta"
    }

    fn description(&self) -> &'static str {
        "Meta commands to get info about the bot itself."
    }

    fn metadata(&self) -> ExtMetadata {
        ExtMetadata {
            always_load: true,
            develop_mode: true,
            plugin_dev_mode: true,
        }
    }

    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![ping(), uptime(), prefix(), help()]
    }

    async fn on_event(
        &self,
        ctx: &serenity::Context,
        event: &serenity::FullEvent,
        data: &Data,
    ) -> Result<(), Error> {
        if let serenity::FullEvent::Ready { data_about_bot } = event {
            tracing::info!(
                user = %data_about_bot.user.name,
                guilds = data_about_bot.guilds.len(),
                mode = %data.extensions.mode(),
                "Bot is ready"
            );
            presence::on_ready(ctx, &data.settings.prefix().await);
        }
        Ok(())
    }
}

/// Title of the ping reply. Answers in kind when invoked as `pong`.
pub fn ping_title(invoked_with: &str) -> &'static str {
    if invoked_with.eq_ignore_ascii_case("pong") {
        "Ping!"
    } else {
        "Pong!"
    }
}

/// Discord timestamp markup showing both the full date and the relative time.
pub fn uptime_description(started_at_unix: i64) -> String {
    format!("<t:{0}:F> (<t:{0}:R>)", started_at_unix)
}

/// Ping the bot to see its latency and state.
#[poise::command(prefix_command, slash_command, aliases("pong"))]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;

    let embed = serenity::CreateEmbed::new()
        .title(ping_title(ctx.invoked_command_name()))
        .description(format!("`{}`ms", latency.as_millis()));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Get the current uptime of the bot.
#[poise::command(prefix_command, slash_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let started_at = ctx.data().started_at.timestamp();

    let embed = serenity::CreateEmbed::new()
        .title("Up since:")
        .description(uptime_description(started_at));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Return the configured prefix.
#[poise::command(prefix_command, slash_command)]
pub async fn prefix(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = ctx.data().settings.prefix().await;

    let embed = serenity::CreateEmbed::new()
        .title("Current Prefix")
        .description(format!("My currently configured prefix is `{}`.", prefix));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show help for all commands, or for one command.
#[poise::command(prefix_command, slash_command, track_edits)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to show help about"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: "Message me directly to reach the moderation team.",
        ..Default::default()
    };
    poise::builtins::help(ctx, command.as_deref(), config).await?;
    Ok(())
}
