use std::cmp::Ordering;
use thiserror::Error;

/// A plugin as declared by one entry of a plugin manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    /// Unique name users refer to the plugin by.
    pub name: String,
    /// Directory the plugin lives in, relative to its plugin root.
    pub folder_name: String,
    pub description: String,
    /// Oldest bot release the plugin works with, e.g. `v0.2.0`.
    pub min_bot_version: String,
    /// Keys the entry declared beyond the required ones. Newer manifests may
    /// carry options older bots don't understand yet.
    pub extra_options: toml::Table,
    /// Whether the entry came from a local plugin directory.
    pub local: bool,
}

impl Plugin {
    /// Check whether `bot_version` satisfies `min_bot_version`.
    ///
    /// Both sides may carry a leading `v`. Missing trailing components count
    /// as zero. A pre-release sorts before its release, so `0.2.0-rc.1` does
    /// not satisfy `v0.2.0`. Build metadata after `+` is ignored. Anything
    /// unparseable is treated as incompatible.
    pub fn is_compatible_with(&self, bot_version: &str) -> bool {
        let (Some(required), Some(available)) = (
            Version::parse(&self.min_bot_version),
            Version::parse(bot_version),
        ) else {
            return false;
        };

        available.cmp_precedence(&required) != Ordering::Less
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Version {
    core: Vec<u64>,
    /// Dot separated pre-release identifiers. Empty for a release.
    pre: Vec<String>,
}

impl Version {
    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let without_build = trimmed.split('+').next().unwrap_or_default();
        let (core, pre) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (without_build, None),
        };
        if core.is_empty() {
            return None;
        }

        let core = core
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let pre = match pre {
            Some(pre) if pre.split('.').any(str::is_empty) => return None,
            Some(pre) => pre.split('.').map(str::to_string).collect(),
            None => Vec::new(),
        };

        Some(Self { core, pre })
    }

    fn cmp_precedence(&self, other: &Self) -> Ordering {
        compare_cores(&self.core, &other.core).then_with(|| compare_pre(&self.pre, &other.pre))
    }
}

fn compare_cores(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

// Numeric identifiers compare numerically and sort before alphanumeric ones.
fn compare_pre(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (left, right) in a.iter().zip(b) {
        let ordering = match (left.parse::<u64>(), right.parse::<u64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => left.cmp(right),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

#[derive(Debug, Error)]
pub enum PluginError {
    /// The manifest is not valid TOML.
    #[error("Failed to parse plugin manifest {origin}: {message}")]
    Parse { origin: String, message: String },

    /// Valid TOML that doesn't describe plugins the way we expect.
    #[error("Invalid plugin manifest {origin}: {message}")]
    Schema { origin: String, message: String },

    #[error("Plugin `{name}` is declared by both {first} and {second}")]
    Duplicate {
        name: String,
        first: String,
        second: String,
    },

    #[error("Plugin `{0}` could not be found")]
    NotFound(String),

    #[error("Failed to read plugin manifests at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch plugin index {url}: {message}")]
    Fetch { url: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin_requiring(version: &str) -> Plugin {
        Plugin {
            name: "Planet".to_string(),
            folder_name: "planet".to_string(),
            description: "Planet.".to_string(),
            min_bot_version: version.to_string(),
            extra_options: toml::Table::new(),
            local: true,
        }
    }

    #[test]
    fn newer_or_equal_bot_is_compatible() {
        let plugin = plugin_requiring("v0.2.0");

        assert!(plugin.is_compatible_with("0.2.0"));
        assert!(plugin.is_compatible_with("v0.2.1"));
        assert!(plugin.is_compatible_with("1.0.0"));
    }

    #[test]
    fn older_bot_is_incompatible() {
        let plugin = plugin_requiring("v0.2.0");

        assert!(!plugin.is_compatible_with("0.1.9"));
        assert!(!plugin.is_compatible_with("v0.1"));
    }

    #[test]
    fn missing_components_count_as_zero() {
        assert!(plugin_requiring("v1").is_compatible_with("1.0.0"));
        assert!(plugin_requiring("1.0.0").is_compatible_with("v1"));
    }

    #[test]
    fn prerelease_sorts_before_its_release() {
        assert!(!plugin_requiring("v0.2.0").is_compatible_with("0.2.0-rc.1"));
        assert!(plugin_requiring("v0.2.0").is_compatible_with("0.2.1-rc.1"));
        assert!(plugin_requiring("v0.2.0-rc.1").is_compatible_with("0.2.0"));
    }

    #[test]
    fn prerelease_identifiers_are_ordered() {
        assert!(plugin_requiring("1.0.0-alpha").is_compatible_with("1.0.0-alpha.1"));
        assert!(plugin_requiring("1.0.0-alpha.2").is_compatible_with("1.0.0-alpha.10"));
        assert!(plugin_requiring("1.0.0-alpha.9").is_compatible_with("1.0.0-beta"));
        assert!(!plugin_requiring("1.0.0-beta").is_compatible_with("1.0.0-alpha.9"));
    }

    #[test]
    fn build_metadata_is_ignored() {
        assert!(plugin_requiring("v0.2.0").is_compatible_with("0.2.0+git.abc123"));
    }

    #[test]
    fn garbage_versions_are_incompatible() {
        assert!(!plugin_requiring("latest").is_compatible_with("1.0.0"));
        assert!(!plugin_requiring("v0.2.0").is_compatible_with(""));
    }

    #[test]
    fn not_found_error_names_the_plugin() {
        let err = PluginError::NotFound("Moon".into());
        assert_eq!(err.to_string(), "Plugin `Moon` could not be found");
    }
}
