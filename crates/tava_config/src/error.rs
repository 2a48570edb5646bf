//! Error types for configuration loading.

use std::path::PathBuf;

/// Errors that can occur while locating or parsing project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("configuration I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// `package.json` could not be parsed as JSON.
    #[error("failed to parse package.json: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// No `package.json` was found walking up from the start directory.
    #[error("could not find package.json in {start} or any parent directory")]
    NoProjectRoot {
        /// The directory the search started from.
        start: PathBuf,
    },
}
