// Extension manager: inspect which extensions loaded, refresh plugins and
// check manifests while developing them.

use crate::core::extensions::ExtMetadata;
use crate::core::plugins::{parse_plugin_toml_from_string, Plugin};
use crate::discord::extensions::{Extension, ExtensionStatus};
use crate::discord::responses;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

pub struct ExtensionManager;

impl Extension for ExtensionManager {
    fn name(&self) -> &'static str {
        "extension_manager"
    }

    fn description(&self) -> &'static str {
        "Inspect loaded extensions and reload plugins."
    }

    fn metadata(&self) -> ExtMetadata {
        ExtMetadata {
            develop_mode: true,
            plugin_dev_mode: true,
            ..Default::default()
        }
    }

    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![extensions(), reload_plugins(), validate_manifest()]
    }
}

pub fn format_extension_status(status: &ExtensionStatus) -> String {
    let state = if status.loaded { "loaded" } else { "skipped" };
    format!(
        "`{}` mask `{:03b}` {}: {}",
        status.name, status.mask, state, status.description
    )
}

/// Drop a surrounding code block, as pasted in Discord.
pub fn strip_code_block(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    // An optional language tag sits on the opening line.
    match inner.split_once('\n') {
        Some((tag, body)) if tag.chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => inner,
    }
}

pub fn manifest_summary(plugins: &[Plugin]) -> String {
    if plugins.is_empty() {
        return "The manifest is valid but declares no plugins.".to_string();
    }
    let names = plugins
        .iter()
        .map(|p| format!("`{}`", p.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("The manifest is valid. Declares {} plugin(s): {}", plugins.len(), names)
}

/// List every extension and whether it loaded in the current mode.
#[poise::command(prefix_command, slash_command, aliases("ext", "exts"))]
pub async fn extensions(ctx: Context<'_>) -> Result<(), Error> {
    let loaded = &ctx.data().extensions;

    let lines = loaded
        .statuses()
        .iter()
        .map(format_extension_status)
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title("Extensions")
        .description(lines)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Running in {} mode",
            loaded.mode()
        )))
        .color(serenity::Color::BLURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Rediscover plugins from every configured source.
#[poise::command(prefix_command, slash_command, owners_only, rename = "reload-plugins")]
pub async fn reload_plugins(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.data().plugins.reload().await {
        Ok(count) => {
            responses::send_positive_response(
                ctx,
                &format!("Reloaded plugins. {} plugin(s) registered.", count),
            )
            .await
        }
        Err(e) => {
            responses::send_negatory_response(
                ctx,
                &format!("Reload failed, keeping the previous plugin list.\n{}", e),
            )
            .await
        }
    }
}

/// Check a plugin manifest without installing it.
#[poise::command(prefix_command, slash_command, rename = "validate-manifest")]
pub async fn validate_manifest(
    ctx: Context<'_>,
    #[description = "Contents of a plugin.toml"]
    #[rest]
    manifest: String,
) -> Result<(), Error> {
    match parse_plugin_toml_from_string(strip_code_block(&manifest)) {
        Ok(plugins) => responses::send_positive_response(ctx, &manifest_summary(&plugins)).await,
        Err(e) => responses::send_negatory_response(ctx, &e.to_string()).await,
    }
}
