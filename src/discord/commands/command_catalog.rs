// Discord commands module.
// Each extension gets its own command file.

pub mod configuration;

pub mod extension_manager;

pub mod meta;

pub mod plugins;

// Bot presence management, used by the meta extension on startup
pub mod presence;
