// Plugin commands: browse the plugin registry and check plugin sources.

use crate::core::extensions::ExtMetadata;
use crate::core::plugins::{AddonSource, Plugin, PluginError};
use crate::discord::extensions::Extension;
use crate::discord::responses;
use crate::discord::{Context, Data, Error};
use poise::serenity_prelude as serenity;

const BOT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct PluginsExtension;

impl Extension for PluginsExtension {
    fn name(&self) -> &'static str {
        "plugins"
    }

    fn description(&self) -> &'static str {
        "List and inspect available plugins."
    }

    fn metadata(&self) -> ExtMetadata {
        ExtMetadata {
            always_load: true,
            plugin_dev_mode: true,
            ..Default::default()
        }
    }

    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![plugins()]
    }
}

/// One line per plugin in the listing.
pub fn format_plugin_line(plugin: &Plugin) -> String {
    let marker = if plugin.local { "local" } else { "index" };
    format!("**{}** ({}): {}", plugin.name, marker, plugin.description)
}

pub fn compatibility_label(plugin: &Plugin, bot_version: &str) -> String {
    if plugin.is_compatible_with(bot_version) {
        format!("`{}` (compatible)", plugin.min_bot_version)
    } else {
        format!(
            "`{}` (requires a newer bot than v{})",
            plugin.min_bot_version, bot_version
        )
    }
}

fn extra_option_keys(plugin: &Plugin) -> String {
    if plugin.extra_options.is_empty() {
        return "none".to_string();
    }
    plugin
        .extra_options
        .keys()
        .map(|key| format!("`{}`", key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_origin(plugin: &Plugin, origin: Option<&str>) -> String {
    match origin {
        Some(origin) if plugin.local => format!("local, `{}`", origin),
        Some(origin) => format!("index, `{}`", origin),
        None => "unknown".to_string(),
    }
}

/// Embed description for a parsed plugin source.
pub fn describe_source(source: &AddonSource) -> String {
    let mut lines = vec![format!("Type: `{}`", source.source_type)];
    if let Some(repo) = &source.repo {
        lines.push(format!("Repository: `{}/{}` on {}", repo.user, repo.repo, repo.host));
        if let Some(reflike) = &repo.reflike {
            lines.push(format!("Ref: `{}`", reflike));
        }
    }
    if let (Some(domain), Some(path)) = (&source.domain, &source.path) {
        lines.push(format!("Host: `{}`", domain));
        lines.push(format!("Path: `{}`", path));
    }
    if let Some(url) = source.download_url() {
        lines.push(format!("Archive: <{}>", url));
    }
    lines.join("\n")
}

/// Manage plugins.
#[poise::command(
    prefix_command,
    slash_command,
    aliases("plugin"),
    subcommands("list_plugins", "plugin_info", "plugin_source"),
    subcommand_required
)]
pub async fn plugins(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// List every known plugin.
#[poise::command(prefix_command, slash_command, rename = "list")]
pub async fn list_plugins(ctx: Context<'_>) -> Result<(), Error> {
    let registry = ctx.data().plugins.registry().await;

    if registry.is_empty() {
        return responses::send_general_response(ctx, "No plugins found.", Some("Plugins"))
            .await;
    }

    let lines = registry
        .plugins()
        .map(format_plugin_line)
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title(format!("Plugins ({})", registry.len()))
        .description(lines)
        .color(serenity::Color::BLURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show details about one plugin.
#[poise::command(prefix_command, slash_command, rename = "info")]
pub async fn plugin_info(
    ctx: Context<'_>,
    #[description = "Plugin name"]
    #[rest]
    name: String,
) -> Result<(), Error> {
    let service = &ctx.data().plugins;

    let plugin = match service.resolve(name.trim()).await {
        Ok(plugin) => plugin,
        Err(e @ PluginError::NotFound(_)) => {
            return responses::send_negatory_response(ctx, &e.to_string()).await;
        }
        Err(e) => return Err(e.into()),
    };

    // A reload between the two reads can drop the origin; that's just shown
    // as unknown.
    let origin = service.registry().await.origin_of(&plugin.name).map(str::to_string);
    let source = describe_origin(&plugin, origin.as_deref());

    let embed = serenity::CreateEmbed::new()
        .title(&plugin.name)
        .description(&plugin.description)
        .field("Folder", format!("`{}`", plugin.folder_name), true)
        .field(
            "Minimum bot version",
            compatibility_label(&plugin, BOT_VERSION),
            true,
        )
        .field("Source", source, false)
        .field("Extra options", extra_option_keys(&plugin), false)
        .color(serenity::Color::BLURPLE);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show where a plugin source would be downloaded from.
///
/// Accepts `user/repo`, `gitlab:user/repo`, either with an optional `@ref`,
/// or a link to a `.zip` file.
#[poise::command(prefix_command, slash_command, rename = "source")]
pub async fn plugin_source(
    ctx: Context<'_>,
    #[description = "user/repo[@ref], gitlab:user/repo or a zip url"] source: String,
) -> Result<(), Error> {
    match AddonSource::parse(&source) {
        Ok(parsed) => {
            let description = describe_source(&parsed);
            responses::send_general_response(ctx, &description, Some("Plugin source")).await
        }
        Err(e) => responses::send_negatory_response(ctx, &e.to_string()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extensions::{calc_mode, should_load, BotMode};

    fn plugin(local: bool, min_bot_version: &str) -> Plugin {
        Plugin {
            name: "Planet".to_string(),
            folder_name: "planet".to_string(),
            description: "Says hello to the planet.".to_string(),
            min_bot_version: min_bot_version.to_string(),
            extra_options: toml::Table::new(),
            local,
        }
    }

    #[test]
    fn listing_line_shows_where_the_plugin_comes_from() {
        assert_eq!(
            format_plugin_line(&plugin(true, "v0.2.0")),
            "**Planet** (local): Says hello to the planet."
        );
        assert_eq!(
            format_plugin_line(&plugin(false, "v0.2.0")),
            "**Planet** (index): Says hello to the planet."
        );
    }

    #[test]
    fn compatibility_is_checked_against_the_bot_version() {
        assert_eq!(
            compatibility_label(&plugin(true, "v0.2.0"), "0.2.0"),
            "`v0.2.0` (compatible)"
        );
        assert_eq!(
            compatibility_label(&plugin(true, "v9.0.0"), "0.2.0"),
            "`v9.0.0` (requires a newer bot than v0.2.0)"
        );
    }

    #[test]
    fn extra_options_are_listed_by_key() {
        let mut with_extras = plugin(true, "v0.2.0");
        assert_eq!(extra_option_keys(&with_extras), "none");

        with_extras
            .extra_options
            .insert("homepage".to_string(), toml::Value::from("https://example.com"));
        with_extras
            .extra_options
            .insert("author".to_string(), toml::Value::from("someone"));
        assert_eq!(extra_option_keys(&with_extras), "`author`, `homepage`");
    }

    #[test]
    fn origin_mentions_the_source_kind() {
        assert_eq!(
            describe_origin(&plugin(true, "v0.2.0"), Some("plugins/planet/plugin.toml")),
            "local, `plugins/planet/plugin.toml`"
        );
        assert_eq!(
            describe_origin(&plugin(false, "v0.2.0"), Some("https://example.com/index.toml")),
            "index, `https://example.com/index.toml`"
        );
        assert_eq!(describe_origin(&plugin(true, "v0.2.0"), None), "unknown");
    }

    #[test]
    fn repo_source_description_lists_archive() {
        let source = AddonSource::parse("discord-modmail/addons@v1.1").unwrap();

        assert_eq!(
            describe_source(&source),
            "Type: `repo`\n\
             Repository: `discord-modmail/addons` on github\n\
             Ref: `v1.1`\n\
             Host: `api.github.com`\n\
             Path: `repos/discord-modmail/addons/zipball/v1.1`\n\
             Archive: <https://api.github.com/repos/discord-modmail/addons/zipball/v1.1>"
        );
    }

    #[test]
    fn local_source_description_is_just_the_type() {
        assert_eq!(describe_source(&AddonSource::local()), "Type: `local`");
    }

    #[test]
    fn plugin_commands_skip_plain_develop_mode() {
        let mask = calc_mode(&PluginsExtension.metadata());

        assert!(should_load(mask, BotMode::Production));
        assert!(should_load(mask, BotMode::PluginDev));
        assert!(!should_load(mask, BotMode::Develop));
    }
}
