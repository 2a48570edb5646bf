//! Project configuration for the tava shim.
//!
//! Discovers the project root (nearest `package.json`), exposes a typed
//! view of the manifest's runner-relevant fields, and renders the
//! temporary runner configuration file handed to the underlying test
//! runner.

#![warn(missing_docs)]

pub mod error;
pub mod manifest;
pub mod project;
pub mod runner_config;

pub use error::ConfigError;
pub use manifest::{load_manifest, load_manifest_from_str, PackageManifest};
pub use project::{find_project_root, project_config_path, tsconfig_path};
pub use runner_config::RunnerConfig;
