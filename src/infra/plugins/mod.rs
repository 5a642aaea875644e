// Plugin manifest sources.
// - `directory_source.rs` scans plugin directories on disk.
// - `index_client.rs` fetches the remote plugin index over HTTP.

pub mod directory_source;
pub mod index_client;

pub use directory_source::DirectoryManifestSource;
pub use index_client::PluginIndexClient;
