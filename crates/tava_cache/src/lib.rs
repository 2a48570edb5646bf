//! Content-addressed compilation cache for precompiled test files.
//!
//! This crate is the core of the tava shim: it maps (file content, file
//! path, environment salt) to a cached transform result persisted in a
//! content-addressed disk store, guaranteeing each distinct input is
//! transformed at most once per process and reused indefinitely across
//! runs while inputs are unchanged.

#![warn(missing_docs)]

pub mod error;
pub mod precompiler;
pub mod salt;
pub mod store;
pub mod transform;

pub use error::CacheError;
pub use precompiler::{Precompiler, PrecompilerConfig};
pub use salt::{PackageDescriptor, Salt};
pub use store::BlobStore;
pub use transform::{PassthroughTransform, Transform, TransformError};
