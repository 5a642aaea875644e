// Discord layer - commands, extensions and response helpers.
//
// Everything that touches poise/serenity lives here. Commands pull primitive
// data out of Discord types, call into the core, and format the result.

use crate::core::config::Settings;
use crate::core::plugins::PluginService;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "extensions/extension_catalog.rs"]
pub mod extensions;

pub mod responses;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command and listener.
pub struct Data {
    pub settings: Arc<Settings>,
    pub plugins: Arc<PluginService>,
    pub extensions: Arc<extensions::LoadedExtensions>,
    pub started_at: DateTime<Utc>,
}
