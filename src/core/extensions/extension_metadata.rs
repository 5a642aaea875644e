// Extension loading rules.
//
// Every extension declares which bot modes it wants to be loaded in. The flags
// are folded into a 3-bit mask and compared against the single mode the bot
// was started in. Nothing here knows about Discord.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bit set when an extension should load in production.
pub const ALWAYS_LOAD_BIT: u8 = 1;
/// Bit set when an extension should load in develop mode.
pub const DEVELOP_BIT: u8 = 1 << 1;
/// Bit set when an extension should load in plugin development mode.
pub const PLUGIN_DEV_BIT: u8 = 1 << 2;

/// Per-extension loading flags. Unset flags are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtMetadata {
    /// Load whenever the bot runs in production.
    pub always_load: bool,
    /// Load when the bot runs with its developer tooling enabled.
    pub develop_mode: bool,
    /// Load when the bot runs in plugin development mode.
    pub plugin_dev_mode: bool,
}

/// Fold the metadata flags into a mode mask in `[0, 7]`.
///
/// The bits are independent, so an extension can be eligible for several
/// modes at once.
pub fn calc_mode(metadata: &ExtMetadata) -> u8 {
    let mut mode = metadata.always_load as u8;
    mode |= (metadata.develop_mode as u8) << 1;
    mode |= (metadata.plugin_dev_mode as u8) << 2;
    mode
}

/// Whether an extension with `mask` loads while the bot runs in `mode`.
pub fn should_load(mask: u8, mode: BotMode) -> bool {
    mask & mode.bits() != 0
}

/// The mode the running bot was started in. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotMode {
    #[default]
    Production,
    Develop,
    PluginDev,
}

impl BotMode {
    pub fn bits(self) -> u8 {
        match self {
            BotMode::Production => ALWAYS_LOAD_BIT,
            BotMode::Develop => DEVELOP_BIT,
            BotMode::PluginDev => PLUGIN_DEV_BIT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BotMode::Production => "production",
            BotMode::Develop => "develop",
            BotMode::PluginDev => "plugin_dev",
        }
    }

    /// Default log filter for this mode when `RUST_LOG` is not set.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            BotMode::Production => "info",
            BotMode::Develop | BotMode::PluginDev => "debug",
        }
    }
}

impl fmt::Display for BotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown bot mode `{0}` (expected production, develop or plugin_dev)")]
pub struct UnknownBotMode(pub String);

impl FromStr for BotMode {
    type Err = UnknownBotMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(BotMode::Production),
            "develop" | "dev" => Ok(BotMode::Develop),
            "plugin_dev" | "plugin-dev" => Ok(BotMode::PluginDev),
            _ => Err(UnknownBotMode(s.to_string())),
        }
    }
}
