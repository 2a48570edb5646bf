//! Process-lifetime salt for bulk cache invalidation.
//!
//! The salt is a fingerprint of the tool's own identity plus the current
//! values of every cache-relevant configuration entry. It is computed once
//! when a precompiler is constructed and folded into every cache key, so a
//! tool upgrade or a configuration change invalidates all prior entries
//! without touching the disk store.

use tava_common::CacheKey;

/// A canonical descriptor of the owning package.
///
/// Changing either field changes the salt and therefore every cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package name (normally `CARGO_PKG_NAME` of the binary crate).
    pub name: String,
    /// Package version (normally `CARGO_PKG_VERSION`).
    pub version: String,
}

impl PackageDescriptor {
    /// Creates a descriptor from name and version strings.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// The derived salt, constant for the lifetime of one precompiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt(CacheKey);

impl Salt {
    /// Derives a salt from a package descriptor and an ordered list of
    /// cache-relevant configuration entries.
    ///
    /// Pure and deterministic: the same descriptor and entries (in the
    /// same order) always produce the same salt. Identifier and value of
    /// each entry are hashed as separate framed parts, so entry
    /// boundaries cannot alias.
    pub fn derive(descriptor: &PackageDescriptor, entries: &[(String, String)]) -> Self {
        let mut parts: Vec<&[u8]> =
            Vec::with_capacity(2 + entries.len() * 2);
        parts.push(descriptor.name.as_bytes());
        parts.push(descriptor.version.as_bytes());
        for (ident, value) in entries {
            parts.push(ident.as_bytes());
            parts.push(value.as_bytes());
        }
        Self(CacheKey::from_parts(&parts))
    }

    /// Returns the salt as bytes for inclusion in key derivation.
    pub fn as_hex(&self) -> String {
        self.0.to_string()
    }
}
