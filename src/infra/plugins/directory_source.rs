use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::plugins::{ManifestSource, PluginError, RawManifest};

/// Name of the manifest file inside a plugin directory.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Reads plugin manifests from a directory on disk.
///
/// The directory itself may hold a `plugin.toml` describing several plugins,
/// and every immediate subdirectory may hold its own.
pub struct DirectoryManifestSource {
    root: PathBuf,
}

impl DirectoryManifestSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn io_error(path: &Path, source: std::io::Error) -> PluginError {
        PluginError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Read a manifest, treating a missing file as "no manifest".
    async fn read_manifest(path: &Path) -> Result<Option<RawManifest>, PluginError> {
        match fs::read_to_string(path).await {
            Ok(text) => Ok(Some(RawManifest {
                origin: path.display().to_string(),
                text,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(path, e)),
        }
    }

    async fn plugin_dirs(&self) -> Result<Vec<PathBuf>, PluginError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(&self.root, e)),
        };

        let mut dirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::io_error(&self.root, e))?
        {
            let path = entry.path();
            // Follow symlinks so checkouts linked into the root are found.
            // A dangling link falls back to the entry's own type.
            let is_dir = match fs::metadata(&path).await {
                Ok(metadata) => metadata.is_dir(),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "Skipping dangling plugin link");
                    entry
                        .file_type()
                        .await
                        .map_err(|e| Self::io_error(&path, e))?
                        .is_dir()
                }
                Err(e) => return Err(Self::io_error(&path, e)),
            };
            if is_dir {
                dirs.push(path);
            }
        }

        // read_dir order is platform dependent.
        dirs.sort();
        Ok(dirs)
    }
}

#[async_trait]
impl ManifestSource for DirectoryManifestSource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn is_local(&self) -> bool {
        true
    }

    async fn load_manifests(&self) -> Result<Vec<RawManifest>, PluginError> {
        let mut manifests = Vec::new();

        if let Some(manifest) = Self::read_manifest(&self.root.join(MANIFEST_FILE)).await? {
            manifests.push(manifest);
        }

        for dir in self.plugin_dirs().await? {
            if let Some(manifest) = Self::read_manifest(&dir.join(MANIFEST_FILE)).await? {
                manifests.push(manifest);
            }
        }

        if manifests.is_empty() {
            tracing::debug!(root = %self.root.display(), "No plugin manifests found");
        }

        Ok(manifests)
    }
}
