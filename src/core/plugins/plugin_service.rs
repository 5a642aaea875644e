// Plugin discovery.
//
// The core only knows that manifests come from somewhere. Directories on disk
// and the remote plugin index are both `ManifestSource`s implemented in the
// infra layer, which keeps this file free of filesystem and HTTP details.

use super::plugin_models::{Plugin, PluginError};
use super::plugin_parser::parse_plugin_manifest;
use super::plugin_registry::PluginRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The raw text of one manifest plus where it came from.
#[derive(Debug, Clone)]
pub struct RawManifest {
    /// File path or URL, used to attribute errors.
    pub origin: String,
    pub text: String,
}

/// Somewhere plugin manifests can be loaded from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Short human readable description for logs.
    fn describe(&self) -> String;

    /// Whether plugins from this source are installed locally.
    fn is_local(&self) -> bool;

    /// Load every manifest this source knows about, in a stable order.
    /// A source that doesn't exist yields no manifests.
    async fn load_manifests(&self) -> Result<Vec<RawManifest>, PluginError>;
}

/// Load and parse every manifest from `sources` into one registry.
///
/// Sources are visited in order. The first duplicate plugin name or broken
/// manifest aborts discovery.
pub async fn find_plugins(
    sources: &[Box<dyn ManifestSource>],
) -> Result<PluginRegistry, PluginError> {
    let mut registry = PluginRegistry::new();

    for source in sources {
        let manifests = source.load_manifests().await?;
        tracing::debug!(
            source = %source.describe(),
            manifests = manifests.len(),
            "Loaded plugin manifests"
        );

        for manifest in manifests {
            let plugins =
                parse_plugin_manifest(&manifest.origin, &manifest.text, source.is_local())?;
            for plugin in plugins {
                registry.insert(plugin, &manifest.origin)?;
            }
        }
    }

    Ok(registry)
}

/// Owns the plugin sources and the registry built from them.
pub struct PluginService {
    sources: Vec<Box<dyn ManifestSource>>,
    registry: RwLock<Arc<PluginRegistry>>,
}

impl PluginService {
    /// Create a service and run discovery once.
    pub async fn new(sources: Vec<Box<dyn ManifestSource>>) -> Result<Self, PluginError> {
        let registry = find_plugins(&sources).await?;
        tracing::info!(plugins = registry.len(), "Plugin registry built");

        Ok(Self {
            sources,
            registry: RwLock::new(Arc::new(registry)),
        })
    }

    /// Snapshot of the current registry. Stays valid across reloads.
    pub async fn registry(&self) -> Arc<PluginRegistry> {
        Arc::clone(&*self.registry.read().await)
    }

    /// Resolve a plugin by name against the current registry.
    pub async fn resolve(&self, name: &str) -> Result<Plugin, PluginError> {
        let registry = self.registry().await;
        registry.resolve(name).cloned()
    }

    /// Run discovery again and swap in the new registry.
    ///
    /// On failure the previous registry stays in place. Returns the number of
    /// plugins now registered.
    pub async fn reload(&self) -> Result<usize, PluginError> {
        let fresh = match find_plugins(&self.sources).await {
            Ok(registry) => registry,
            Err(err) => {
                tracing::warn!("Plugin reload failed, keeping previous registry: {}", err);
                return Err(err);
            }
        };

        let count = fresh.len();
        *self.registry.write().await = Arc::new(fresh);
        tracing::info!(plugins = count, "Plugin registry reloaded");
        Ok(count)
    }
}
