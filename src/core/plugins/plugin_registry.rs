use super::plugin_models::{Plugin, PluginError};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
struct RegistryEntry {
    plugin: Plugin,
    origin: String,
}

/// Every known plugin, keyed by name.
///
/// Names are unique. Inserting a second plugin with a name that is already
/// present fails instead of replacing the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin discovered at `origin`.
    pub fn insert(&mut self, plugin: Plugin, origin: &str) -> Result<(), PluginError> {
        if let Some(existing) = self.entries.get(&plugin.name) {
            return Err(PluginError::Duplicate {
                name: plugin.name,
                first: existing.origin.clone(),
                second: origin.to_string(),
            });
        }

        self.entries.insert(
            plugin.name.clone(),
            RegistryEntry {
                plugin,
                origin: origin.to_string(),
            },
        );
        Ok(())
    }

    /// Look a plugin up by its exact, case-sensitive name.
    pub fn resolve(&self, candidate: &str) -> Result<&Plugin, PluginError> {
        self.entries
            .get(candidate)
            .map(|entry| &entry.plugin)
            .ok_or_else(|| PluginError::NotFound(candidate.to_string()))
    }

    /// Where the named plugin was declared, if it is known.
    pub fn origin_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.origin.as_str())
    }

    /// Plugins sorted by name.
    pub fn plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.entries.values().map(|entry| &entry.plugin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
