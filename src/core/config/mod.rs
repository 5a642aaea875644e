pub mod bot_config;
pub mod settings;

pub use bot_config::{BotConfig, ConfigError};
pub use settings::{convert_key, visible_options, ConfigOption, Settings};
