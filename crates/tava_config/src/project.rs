//! Project root discovery and well-known file detection.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Walks up from `start` looking for the nearest directory containing
/// `package.json`.
///
/// Returns the directory containing `package.json`, or an error if none
/// is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("package.json").is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::NoProjectRoot {
                start: start.to_path_buf(),
            });
        }
    }
}

/// Returns the path to the project's own `ava.config.js`, if one exists.
pub fn project_config_path(project_dir: &Path) -> Option<PathBuf> {
    let path = project_dir.join("ava.config.js");
    path.is_file().then_some(path)
}

/// Returns the path to the project's `tsconfig.json`, if one exists.
pub fn tsconfig_path(project_dir: &Path) -> Option<PathBuf> {
    let path = project_dir.join("tsconfig.json");
    path.is_file().then_some(path)
}
