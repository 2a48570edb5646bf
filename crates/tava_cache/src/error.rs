//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during precompilation and cache operations.
///
/// All variants are fatal and propagate unmodified to the caller of
/// [`precompile`](crate::Precompiler::precompile); the cache performs no
/// retries, logging, or user messaging of its own.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading a source file or touching
    /// the blob store.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The transform function failed for a source file.
    ///
    /// The blob store is guaranteed to contain no entry for the file's
    /// key after this error.
    #[error("transform failed for {path}: {reason}")]
    Transform {
        /// The source file being transformed.
        path: PathBuf,
        /// Description of the transform failure.
        reason: String,
    },

    /// A serialization error occurred while encoding a blob header.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The precompiler configuration was rejected at construction.
    #[error("invalid precompiler configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/project/test.ts"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("test.ts"));
    }

    #[test]
    fn transform_error_display() {
        let err = CacheError::Transform {
            path: PathBuf::from("bad.ts"),
            reason: "unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("transform failed"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn serialization_error_display() {
        let err = CacheError::Serialization {
            reason: "invalid bincode data".to_string(),
        };
        assert!(err.to_string().contains("invalid bincode data"));
    }

    #[test]
    fn invalid_config_display() {
        let err = CacheError::InvalidConfig {
            reason: "cache directory path is empty".to_string(),
        };
        assert!(err.to_string().contains("cache directory path is empty"));
    }
}
