pub mod extension_metadata;

pub use extension_metadata::{calc_mode, should_load, BotMode, ExtMetadata};
