// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "plugins/mod.rs"]
pub mod plugins;
