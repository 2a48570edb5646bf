//! Typed view of the project's `package.json`.
//!
//! Only the fields the shim cares about are modeled; the runner's own
//! configuration section is kept as raw JSON and forwarded verbatim.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// The runner-relevant subset of a `package.json` manifest.
#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    /// The package name, if present.
    #[serde(default)]
    pub name: Option<String>,

    /// The package version, if present.
    #[serde(default)]
    pub version: Option<String>,

    /// The `ava` configuration section, forwarded verbatim to the
    /// generated runner config. `None` if the manifest has no such key.
    #[serde(default)]
    pub ava: Option<serde_json::Value>,
}

impl PackageManifest {
    /// Returns the `ava` section, or JSON `null` if absent.
    ///
    /// The generated runner config embeds this value directly, so the
    /// absent case must render as `null` rather than being omitted.
    pub fn runner_section(&self) -> serde_json::Value {
        self.ava.clone().unwrap_or(serde_json::Value::Null)
    }
}

/// Loads `<project_dir>/package.json`.
pub fn load_manifest(project_dir: &Path) -> Result<PackageManifest, ConfigError> {
    let path = project_dir.join("package.json");
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path,
        source: e,
    })?;
    load_manifest_from_str(&content)
}

/// Parses a `package.json` manifest from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_manifest_from_str(content: &str) -> Result<PackageManifest, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::Parse {
        reason: e.to_string(),
    })
}
