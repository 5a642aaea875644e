// Runtime view of the configuration, used by the configuration manager.
//
// Each option the bot knows about is described once in `CONFIG_OPTIONS`.
// Hidden options are never shown to users; frozen ones can't be changed while
// the bot runs. Only the prefix is editable at the moment.

use super::bot_config::{
    validate_prefix, BotConfig, ConfigError, DEFAULT_PLUGIN_DIR, DEFAULT_PREFIX,
};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigOption {
    /// Dotted key, e.g. `bot.prefix`.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    pub description: &'static str,
    /// `None` means the option is required.
    pub default: Option<&'static str>,
    pub hidden: bool,
    pub frozen: bool,
}

impl ConfigOption {
    /// The table the option is grouped under, e.g. `bot` for `bot.prefix`.
    pub fn table(&self) -> &'static str {
        self.key.rsplit_once('.').map(|(t, _)| t).unwrap_or("")
    }
}

pub const CONFIG_OPTIONS: &[ConfigOption] = &[
    ConfigOption {
        key: "bot.prefix",
        name: "Prefix",
        description: "Prefix used to invoke text commands.",
        default: Some(DEFAULT_PREFIX),
        hidden: false,
        frozen: false,
    },
    ConfigOption {
        key: "bot.mode",
        name: "Mode",
        description: "Which extensions load and how verbose logging is.",
        default: Some("production"),
        hidden: false,
        frozen: true,
    },
    ConfigOption {
        key: "bot.token",
        name: "Token",
        description: "Discord bot token.",
        default: None,
        hidden: true,
        frozen: true,
    },
    ConfigOption {
        key: "plugins.directories",
        name: "Plugin directories",
        description: "Directories scanned for plugin manifests.",
        default: Some(DEFAULT_PLUGIN_DIR),
        hidden: false,
        frozen: true,
    },
    ConfigOption {
        key: "plugins.index_url",
        name: "Plugin index",
        description: "Remote plugin index fetched after the local directories.",
        default: None,
        hidden: false,
        frozen: true,
    },
];

/// Normalise a user supplied key. Keys are lowercase and `.` delimited, but
/// spaces, `/` and backticks are accepted as delimiters too.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, ' ' | '/' | '`') { '.' } else { c })
        .collect()
}

/// Turn user input into a known, visible configuration option.
pub fn convert_key(raw: &str) -> Result<&'static ConfigOption, ConfigError> {
    let key = normalize_key(raw);

    CONFIG_OPTIONS
        .iter()
        .find(|opt| opt.key == key && !opt.hidden)
        .ok_or_else(|| ConfigError::UnknownKey {
            key: raw.to_string(),
            valid: visible_options()
                .map(|opt| opt.key)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

pub fn visible_options() -> impl Iterator<Item = &'static ConfigOption> {
    CONFIG_OPTIONS.iter().filter(|opt| !opt.hidden)
}

/// Configuration shared by every command, with the editable parts behind a lock.
pub struct Settings {
    config: BotConfig,
    prefix: RwLock<String>,
}

impl Settings {
    pub fn new(config: BotConfig) -> Self {
        let prefix = RwLock::new(config.prefix.clone());
        Self { config, prefix }
    }

    pub async fn prefix(&self) -> String {
        self.prefix.read().await.clone()
    }

    /// Current value of an option, formatted for display.
    pub async fn value_of(&self, option: &ConfigOption) -> String {
        match option.key {
            "bot.prefix" => self.prefix().await,
            "bot.mode" => self.config.mode.to_string(),
            "bot.token" => "<hidden>".to_string(),
            "plugins.directories" => self
                .config
                .plugin_dirs
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "plugins.index_url" => self
                .config
                .plugin_index_url
                .clone()
                .unwrap_or_else(|| "not set".to_string()),
            _ => "unknown".to_string(),
        }
    }

    /// Change an option. Returns the value that was stored.
    pub async fn set(&self, option: &ConfigOption, value: &str) -> Result<String, ConfigError> {
        if option.frozen {
            return Err(ConfigError::Frozen(option.key.to_string()));
        }

        match option.key {
            "bot.prefix" => {
                let value = value.trim();
                validate_prefix(value).map_err(|message| ConfigError::Invalid {
                    key: option.key.to_string(),
                    message,
                })?;
                *self.prefix.write().await = value.to_string();
                tracing::info!(prefix = value, "Command prefix changed");
                Ok(value.to_string())
            }
            other => Err(ConfigError::Frozen(other.to_string())),
        }
    }
}
