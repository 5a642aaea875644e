// Configuration manager commands.
//
// Thin layer over `core::config`: keys are converted with `convert_key`, values
// are read and written through `Settings`, and every outcome is reported with
// the shared response helpers.

use crate::core::config::{convert_key, visible_options, ConfigError, ConfigOption};
use crate::core::extensions::ExtMetadata;
use crate::discord::commands::presence;
use crate::discord::extensions::Extension;
use crate::discord::responses;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

pub struct ConfigurationExtension;

impl Extension for ConfigurationExtension {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn description(&self) -> &'static str {
        "Manage the bot configuration."
    }

    fn metadata(&self) -> ExtMetadata {
        ExtMetadata {
            always_load: true,
            develop_mode: true,
            ..Default::default()
        }
    }

    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![config()]
    }
}

fn capitalize_words(s: &str) -> String {
    s.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn describe_option(option: &ConfigOption) -> String {
    let default = match option.default {
        Some(default) => format!("Default: `{}`", default),
        None => "Required.".to_string(),
    };
    let mut lines = vec![
        format!("**{}**", option.name),
        default,
        option.description.to_string(),
    ];
    if option.frozen {
        lines.push("_Read-only while the bot is running._".to_string());
    }
    lines.join("\n")
}

/// Render options grouped by their table, one section per table, in the
/// order the tables first appear.
pub fn format_option_sections<'a>(
    options: impl IntoIterator<Item = &'a ConfigOption>,
) -> Vec<String> {
    let mut sections: Vec<(&str, String)> = Vec::new();

    for option in options {
        let table: &str = option.table();
        let index = match sections.iter().position(|(t, _)| *t == table) {
            Some(index) => index,
            None => {
                sections.push((table, format!("**__{} config__**\n", capitalize_words(table))));
                sections.len() - 1
            }
        };
        let body = &mut sections[index].1;
        body.push_str(&describe_option(option));
        body.push('\n');
    }

    sections.into_iter().map(|(_, body)| body.trim_end().to_string()).collect()
}

/// Message shown after a successful `config set`.
pub fn set_confirmation(key: &str, requested: &str, stored: &str) -> String {
    if requested == stored {
        format!("Successfully set `{}` to `{}`.", key, stored)
    } else {
        format!(
            "Successfully set `{}` to `{}` (converted from `{}`).",
            key, stored, requested
        )
    }
}

/// Manage the bot configuration.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    aliases("cfg", "conf"),
    subcommands("list_config", "set_config", "get_config"),
    subcommand_required
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// List the valid configuration options.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    rename = "list"
)]
pub async fn list_config(ctx: Context<'_>) -> Result<(), Error> {
    let sections = format_option_sections(visible_options());

    let embed = serenity::CreateEmbed::new()
        .title("Configuration Options")
        .description(sections.join("\n\n"))
        .color(serenity::Color::BLURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Modify an existing configuration value.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    rename = "set",
    aliases("edit")
)]
pub async fn set_config(
    ctx: Context<'_>,
    #[description = "Configuration key, e.g. bot.prefix"] option: String,
    #[description = "New value"] value: String,
) -> Result<(), Error> {
    let option = match convert_key(&option) {
        Ok(option) => option,
        Err(e) => return responses::send_negatory_response(ctx, &e.to_string()).await,
    };

    let settings = &ctx.data().settings;
    match settings.set(option, &value).await {
        Ok(stored) => {
            if option.key == "bot.prefix" {
                presence::reset_status(ctx.serenity_context(), &stored);
            }
            responses::send_positive_response(ctx, &set_confirmation(option.key, &value, &stored))
                .await
        }
        Err(ConfigError::Frozen(key)) => {
            responses::send_negatory_response(
                ctx,
                &format!(
                    "Unable to modify `{}` as it is frozen and cannot be edited during runtime.",
                    key
                ),
            )
            .await
        }
        Err(e) => responses::send_negatory_response(ctx, &e.to_string()).await,
    }
}

/// Display an existing configuration value.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    rename = "get",
    aliases("show")
)]
pub async fn get_config(
    ctx: Context<'_>,
    #[description = "Configuration key, e.g. bot.prefix"] option: String,
) -> Result<(), Error> {
    let option = match convert_key(&option) {
        Ok(option) => option,
        Err(e) => return responses::send_negatory_response(ctx, &e.to_string()).await,
    };

    let value = ctx.data().settings.value_of(option).await;
    responses::send_general_response(ctx, &format!("value: `{}`", value), Some(option.key)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_table_names() {
        assert_eq!(capitalize_words("bot"), "Bot");
        assert_eq!(capitalize_words("plugin_index"), "Plugin Index");
    }

    #[test]
    fn sections_group_options_by_table() {
        let sections = format_option_sections(visible_options());

        assert_eq!(sections.len(), 2);
        assert!(sections[0].starts_with("**__Bot config__**"));
        assert!(sections[0].contains("**Prefix**"));
        assert!(sections[0].contains("Default: `?`"));
        assert!(sections[1].starts_with("**__Plugins config__**"));
        assert!(sections[1].contains("**Plugin index**\nRequired."));
    }

    #[test]
    fn hidden_options_are_never_listed() {
        let sections = format_option_sections(visible_options()).join("\n");
        assert!(!sections.contains("Token"));
    }

    #[test]
    fn frozen_options_are_marked() {
        let sections = format_option_sections(visible_options());
        let bot = &sections[0];

        let prefix_block = bot.split("**Mode**").next().unwrap();
        assert!(!prefix_block.contains("Read-only"));
        assert!(bot.contains("Read-only"));
    }

    #[test]
    fn confirmation_mentions_conversion() {
        assert_eq!(
            set_confirmation("bot.prefix", "!", "!"),
            "Successfully set `bot.prefix` to `!`."
        );
        assert_eq!(
            set_confirmation("bot.prefix", " ! ", "!"),
            "Successfully set `bot.prefix` to `!` (converted from ` ! `)."
        );
    }
}
