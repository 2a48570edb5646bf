//! Shared foundational types for the tava shim.
//!
//! Currently this is just the [`CacheKey`] content hash used throughout the
//! compilation cache.

#![warn(missing_docs)]

pub mod hash;

pub use hash::CacheKey;
