// Bot configuration.
//
// Everything is read from the environment once at startup (after `.env` has
// been loaded). Lookups go through a closure so tests don't have to touch the
// real process environment.

use crate::core::extensions::BotMode;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PREFIX: &str = "?";
pub const DEFAULT_PLUGIN_DIR: &str = "plugins";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot settings.")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("`{key}` is not a valid configuration key. Valid keys: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("`{0}` is frozen and cannot be edited during runtime.")]
    Frozen(String),
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub prefix: String,
    pub mode: BotMode,
    /// Directories scanned for plugin manifests, in priority order.
    pub plugin_dirs: Vec<PathBuf>,
    /// Remote plugin index, fetched after the local directories.
    pub plugin_index_url: Option<String>,
}

// Hand-written so the token never ends up in logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<hidden>")
            .field("prefix", &self.prefix)
            .field("mode", &self.mode)
            .field("plugin_dirs", &self.plugin_dirs)
            .field("plugin_index_url", &self.plugin_index_url)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values behave like unset ones.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let prefix = get("MODMAIL_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        validate_prefix(&prefix).map_err(|message| ConfigError::Invalid {
            key: "MODMAIL_PREFIX".to_string(),
            message,
        })?;

        let mode = match get("MODMAIL_MODE") {
            Some(raw) => raw.parse::<BotMode>().map_err(|e| ConfigError::Invalid {
                key: "MODMAIL_MODE".to_string(),
                message: e.to_string(),
            })?,
            None => BotMode::default(),
        };

        let plugin_dirs = match get("MODMAIL_PLUGIN_DIRS") {
            Some(raw) => std::env::split_paths(&raw)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => vec![PathBuf::from(DEFAULT_PLUGIN_DIR)],
        };

        let plugin_index_url = get("MODMAIL_PLUGIN_INDEX_URL").map(|v| v.trim().to_string());

        Ok(Self {
            token,
            prefix,
            mode,
            plugin_dirs,
            plugin_index_url,
        })
    }
}

/// Prefixes must be non-empty and can't contain whitespace, otherwise the
/// framework can never match them.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() {
        return Err("prefix must not be empty".to_string());
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err("prefix must not contain whitespace".to_string());
    }
    if prefix.chars().count() > 10 {
        return Err("prefix must be at most 10 characters".to_string());
    }
    Ok(())
}
