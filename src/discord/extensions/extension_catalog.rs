// Extensions are groups of commands and listeners that load depending on the
// mode the bot runs in. Each one is a plain value implementing `Extension`;
// the catalog below is the single list of everything the bot ships with.

use crate::core::extensions::{calc_mode, should_load, BotMode, ExtMetadata};
use crate::discord::commands::{configuration, extension_manager, meta, plugins};
use crate::discord::{Data, Error};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;

/// A loadable unit of commands and listeners.
#[async_trait]
pub trait Extension: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Which modes this extension loads in.
    fn metadata(&self) -> ExtMetadata;

    fn commands(&self) -> Vec<poise::Command<Data, Error>>;

    /// Called for every gateway event while the extension is loaded.
    async fn on_event(
        &self,
        _ctx: &serenity::Context,
        _event: &serenity::FullEvent,
        _data: &Data,
    ) -> Result<(), Error> {
        Ok(())
    }
}

/// Every extension the bot knows about.
pub fn all_extensions() -> Vec<Box<dyn Extension>> {
    vec![
        Box::new(meta::MetaExtension),
        Box::new(configuration::ConfigurationExtension),
        Box::new(plugins::PluginsExtension),
        Box::new(extension_manager::ExtensionManager),
    ]
}

/// What happened to one extension at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionStatus {
    pub name: &'static str,
    pub description: &'static str,
    pub mask: u8,
    pub loaded: bool,
}

/// The extensions that passed the mode check, plus a record of every
/// extension that was considered.
pub struct LoadedExtensions {
    mode: BotMode,
    loaded: Vec<Box<dyn Extension>>,
    statuses: Vec<ExtensionStatus>,
}

impl LoadedExtensions {
    pub fn load(mode: BotMode, catalog: Vec<Box<dyn Extension>>) -> Self {
        let mut loaded = Vec::new();
        let mut statuses = Vec::new();

        for extension in catalog {
            let mask = calc_mode(&extension.metadata());
            let load = should_load(mask, mode);
            tracing::debug!(
                extension = extension.name(),
                mask,
                loaded = load,
                "Checked extension"
            );

            statuses.push(ExtensionStatus {
                name: extension.name(),
                description: extension.description(),
                mask,
                loaded: load,
            });
            if load {
                loaded.push(extension);
            }
        }

        Self {
            mode,
            loaded,
            statuses,
        }
    }

    pub fn mode(&self) -> BotMode {
        self.mode
    }

    pub fn statuses(&self) -> &[ExtensionStatus] {
        &self.statuses
    }

    pub fn loaded_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.loaded.iter().map(|ext| ext.name())
    }

    /// Commands of every loaded extension, ready to hand to the framework.
    pub fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        self.loaded.iter().flat_map(|ext| ext.commands()).collect()
    }

    /// Forward an event to every loaded extension. A failing listener is
    /// logged and doesn't stop the others.
    pub async fn dispatch(
        &self,
        ctx: &serenity::Context,
        event: &serenity::FullEvent,
        data: &Data,
    ) {
        for extension in &self.loaded {
            if let Err(e) = extension.on_event(ctx, event, data).await {
                tracing::error!(
                    extension = extension.name(),
                    "Extension listener failed: {}",
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeExtension {
        name: &'static str,
        metadata: ExtMetadata,
    }

    impl Extension for FakeExtension {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "fake"
        }

        fn metadata(&self) -> ExtMetadata {
            self.metadata
        }

        fn commands(&self) -> Vec<poise::Command<Data, Error>> {
            Vec::new()
        }
    }

    fn fake(
        name: &'static str,
        always: bool,
        develop: bool,
        plugin_dev: bool,
    ) -> Box<dyn Extension> {
        Box::new(FakeExtension {
            name,
            metadata: ExtMetadata {
                always_load: always,
                develop_mode: develop,
                plugin_dev_mode: plugin_dev,
            },
        })
    }

    fn catalog() -> Vec<Box<dyn Extension>> {
        vec![
            fake("core", true, false, false),
            fake("dev-tools", false, true, true),
            fake("plugin-debug", false, false, true),
            fake("disabled", false, false, false),
        ]
    }

    fn loaded(mode: BotMode) -> Vec<&'static str> {
        LoadedExtensions::load(mode, catalog()).loaded_names().collect()
    }

    #[test]
    fn production_loads_only_production_extensions() {
        assert_eq!(loaded(BotMode::Production), ["core"]);
    }

    #[test]
    fn develop_loads_develop_extensions() {
        assert_eq!(loaded(BotMode::Develop), ["dev-tools"]);
    }

    #[test]
    fn multi_mode_extension_loads_in_each_of_its_modes() {
        assert_eq!(loaded(BotMode::PluginDev), ["dev-tools", "plugin-debug"]);
    }

    #[test]
    fn statuses_cover_every_extension() {
        let extensions = LoadedExtensions::load(BotMode::Develop, catalog());

        assert_eq!(extensions.mode(), BotMode::Develop);
        let statuses = extensions.statuses();
        assert_eq!(statuses.len(), 4);
        assert_eq!(statuses[1].name, "dev-tools");
        assert_eq!(statuses[1].mask, 6);
        assert!(statuses[1].loaded);
        assert_eq!(statuses[3].mask, 0);
        assert!(!statuses[3].loaded);
    }

    #[test]
    fn shipped_extensions_have_unique_names() {
        let mut names: Vec<_> = all_extensions().iter().map(|e| e.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn every_mode_loads_something() {
        for mode in [BotMode::Production, BotMode::Develop, BotMode::PluginDev] {
            let extensions = LoadedExtensions::load(mode, all_extensions());
            assert!(extensions.loaded_names().any(|name| name == "meta"), "{mode}");
        }
    }
}
