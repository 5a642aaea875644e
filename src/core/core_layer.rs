// The core module contains all business logic.
// Each feature gets its own submodule. Nothing in here talks to Discord.

#[path = "config/mod.rs"]
pub mod config;

#[path = "extensions/mod.rs"]
pub mod extensions;

#[path = "plugins/mod.rs"]
pub mod plugins;
