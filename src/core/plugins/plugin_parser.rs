// Plugin manifest parsing.
//
// A manifest is a TOML document with a top-level `plugins` array:
//
//     [[plugins]]
//     name = "Planet"
//     folder = "planet"
//     description = "Planet. Tells you which planet you are probably on."
//     min_bot_version = "v0.2.0"
//
// Parsing happens in two steps so the caller can tell a broken document
// (`PluginError::Parse`) apart from a well-formed one with the wrong shape
// (`PluginError::Schema`).

use super::plugin_models::{Plugin, PluginError};
use serde::Deserialize;
use std::collections::HashSet;

/// Origin reported for manifests parsed straight from a string.
pub const STRING_ORIGIN: &str = "<string>";

/// Keys every entry must declare. Anything else ends up in `extra_options`.
const KNOWN_KEYS: &[&str] = &["name", "folder", "description", "min_bot_version"];

#[derive(Debug, Deserialize)]
struct ManifestDocument {
    plugins: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    folder: String,
    description: String,
    min_bot_version: String,
}

/// Parse a manifest that didn't come from a file.
pub fn parse_plugin_toml_from_string(text: &str) -> Result<Vec<Plugin>, PluginError> {
    parse_plugin_manifest(STRING_ORIGIN, text, true)
}

/// Parse a manifest, attributing any error to `origin`.
pub fn parse_plugin_manifest(
    origin: &str,
    text: &str,
    local: bool,
) -> Result<Vec<Plugin>, PluginError> {
    let table: toml::Table = toml::from_str(text).map_err(|e| PluginError::Parse {
        origin: origin.to_string(),
        message: e.message().to_string(),
    })?;

    // Taken from the raw table so values keep their TOML types (datetimes
    // included) instead of going through serde's buffering.
    let extras = extra_options(&table);

    let document: ManifestDocument =
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| PluginError::Schema {
                origin: origin.to_string(),
                message: e.message().to_string(),
            })?;

    let mut seen = HashSet::new();
    document
        .plugins
        .into_iter()
        .zip(extras.into_iter().chain(std::iter::repeat_with(toml::Table::new)))
        .map(|(entry, extra_options)| {
            validate_entry(origin, &entry)?;
            if !seen.insert(entry.name.clone()) {
                return Err(PluginError::Schema {
                    origin: origin.to_string(),
                    message: format!("plugin `{}` is declared more than once", entry.name),
                });
            }
            Ok(Plugin {
                name: entry.name,
                folder_name: entry.folder,
                description: entry.description,
                min_bot_version: entry.min_bot_version,
                extra_options,
                local,
            })
        })
        .collect()
}

fn extra_options(table: &toml::Table) -> Vec<toml::Table> {
    let Some(toml::Value::Array(entries)) = table.get("plugins") else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| match entry {
            toml::Value::Table(fields) => fields
                .iter()
                .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => toml::Table::new(),
        })
        .collect()
}

fn validate_entry(origin: &str, entry: &ManifestEntry) -> Result<(), PluginError> {
    let schema_error = |message: String| PluginError::Schema {
        origin: origin.to_string(),
        message,
    };

    if entry.name.trim().is_empty() {
        return Err(schema_error("plugin name must not be empty".to_string()));
    }

    if !is_safe_folder_name(&entry.folder) {
        return Err(schema_error(format!(
            "plugin `{}` has an unusable folder name `{}`",
            entry.name, entry.folder
        )));
    }

    Ok(())
}

/// Folder names end up as path components, so they can't escape their root.
fn is_safe_folder_name(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\'])
        && !folder.contains('\0')
}
