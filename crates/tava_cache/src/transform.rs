//! The pluggable transform seam.
//!
//! The cache treats the transform as a black box: deterministic for a
//! given (content, path, salt), invoked synchronously, and free of side
//! effects beyond its return value.

use std::path::Path;

/// A transform failure. Fatal and propagated; never cached.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    /// Creates a transform error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns source text into executable text.
///
/// Implementations must be deterministic: the same source and path must
/// always produce the same output, since the cache key is derived from
/// the inputs and never from the output.
pub trait Transform: Send + Sync {
    /// Applies the transform to one file's source text.
    fn apply(&self, source: &str, path: &Path) -> Result<String, TransformError>;
}

/// A transform that returns the source unchanged.
///
/// This is the shim's production transform: the actual type stripping is
/// performed by the runner's register hook at require time, so the cache
/// only needs to key and persist the source as-is.
#[derive(Debug, Default)]
pub struct PassthroughTransform;

impl Transform for PassthroughTransform {
    fn apply(&self, source: &str, _path: &Path) -> Result<String, TransformError> {
        Ok(source.to_string())
    }
}
