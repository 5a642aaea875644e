pub mod addon_source;
pub mod plugin_models;
pub mod plugin_parser;
pub mod plugin_registry;
pub mod plugin_service;

pub use addon_source::AddonSource;
pub use plugin_models::{Plugin, PluginError};
pub use plugin_parser::parse_plugin_toml_from_string;
pub use plugin_service::{ManifestSource, PluginService, RawManifest};
