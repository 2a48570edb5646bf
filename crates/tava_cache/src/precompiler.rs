//! The caching precompiler.
//!
//! Ties the salt, blob store, and transform seam together: given a file
//! path, returns the cache key for its transformed contents, transforming
//! and persisting on first request and reusing on subsequent requests,
//! both in-process (via the path→key index) and cross-process (via the
//! blob store).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tava_common::CacheKey;

use crate::error::CacheError;
use crate::salt::{PackageDescriptor, Salt};
use crate::store::BlobStore;
use crate::transform::Transform;

/// UTF-8 byte-order mark. A source artifact, not semantic content: two
/// files differing only by a leading BOM must hash identically.
const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Factory invoked lazily, at most once, when a cache miss first
/// requires an actual transform.
pub type TransformSelector = Box<dyn FnOnce() -> Box<dyn Transform> + Send>;

/// Configuration for constructing a [`Precompiler`].
pub struct PrecompilerConfig {
    /// Directory used by the blob store.
    pub cache_dir: PathBuf,

    /// Descriptor of the owning package, folded into the salt so that
    /// tool upgrades invalidate all prior entries.
    pub package: PackageDescriptor,

    /// Ordered cache-relevant configuration entries folded into the
    /// salt; changing any value invalidates all prior entries.
    pub cache_keys: Vec<(String, String)>,

    /// Returns the transform to apply on a cache miss. Never invoked if
    /// every requested file is already cached on disk.
    pub transform_selector: TransformSelector,
}

/// Mutable state guarded by the precompiler's lock.
struct State {
    /// Path→key index: each path is read, hashed, and transformed at
    /// most once per precompiler instance.
    file_hashes: HashMap<PathBuf, CacheKey>,

    /// The memoized transform, constructed on first miss.
    transform: Option<Box<dyn Transform>>,

    /// The unconsumed selector; `Some` exactly while `transform` is
    /// `None`.
    selector: Option<TransformSelector>,
}

/// Content-addressed compilation cache bound to one storage location and
/// one salt.
///
/// The whole read-check-transform-write sequence for a call runs under a
/// single lock, so concurrent `precompile` calls on a shared instance
/// never race the check-then-act between index lookup, store probe, and
/// store write; concurrent requests for the same path wait for the one
/// in-flight operation and then hit the index.
pub struct Precompiler {
    salt: Salt,
    store: BlobStore,
    state: Mutex<State>,
}

impl Precompiler {
    /// Constructs a precompiler, computing the salt exactly once.
    ///
    /// Rejects an empty cache directory path. The directory itself is
    /// created lazily by the store on first write.
    pub fn new(config: PrecompilerConfig) -> Result<Self, CacheError> {
        if config.cache_dir.as_os_str().is_empty() {
            return Err(CacheError::InvalidConfig {
                reason: "cache directory path is empty".to_string(),
            });
        }

        let salt = Salt::derive(&config.package, &config.cache_keys);
        let store = BlobStore::new(&config.cache_dir, &config.package.version);

        Ok(Self {
            salt,
            store,
            state: Mutex::new(State {
                file_hashes: HashMap::new(),
                transform: None,
                selector: Some(config.transform_selector),
            }),
        })
    }

    /// Returns the cache key for the file's transformed contents.
    ///
    /// On the first request for a path this reads the file, strips a
    /// leading BOM, derives the key from (content, path, salt), and if
    /// the store has no entry, lazily obtains the transform, applies it,
    /// and writes the output atomically. Subsequent requests for the
    /// same path return the indexed key without touching the file or
    /// the store.
    ///
    /// Unreadable files and transform failures are fatal and propagate;
    /// a failed transform leaves no entry in the store.
    pub fn precompile(&self, path: &Path) -> Result<CacheKey, CacheError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Fast path: no file read, no disk access, no transform.
        if let Some(key) = state.file_hashes.get(path) {
            return Ok(*key);
        }

        let raw = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = strip_bom(&raw);

        // Full path, not basename: same-named files in different
        // directories must get different keys.
        let salt_hex = self.salt.as_hex();
        let key = CacheKey::from_parts(&[
            content,
            path.to_string_lossy().as_bytes(),
            salt_hex.as_bytes(),
        ]);

        // Index before probing the store, as a side effect of hashing.
        state.file_hashes.insert(path.to_path_buf(), key);

        if !self.store.contains(&key) {
            if state.transform.is_none() {
                let selector =
                    state
                        .selector
                        .take()
                        .ok_or_else(|| CacheError::InvalidConfig {
                            reason: "transform selector already consumed".to_string(),
                        })?;
                state.transform = Some(selector());
            }
            let transform =
                state
                    .transform
                    .as_deref()
                    .ok_or_else(|| CacheError::InvalidConfig {
                        reason: "transform selector produced no transform".to_string(),
                    })?;

            let source = String::from_utf8_lossy(content);
            let output =
                transform
                    .apply(&source, path)
                    .map_err(|e| CacheError::Transform {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?;

            self.store.write(&key, output.as_bytes())?;
        }

        Ok(key)
    }

    /// Returns the blob store's path for a key, for callers that need to
    /// locate the transformed output on disk.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.store.entry_path(key)
    }
}

/// Strips a leading UTF-8 byte-order mark, if present.
fn strip_bom(raw: &[u8]) -> &[u8] {
    raw.strip_prefix(&UTF8_BOM).unwrap_or(raw)
}
