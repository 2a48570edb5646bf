//! Content-addressed blob storage for transformed output.
//!
//! Each cache entry is a binary file named by its cache key. Entries carry
//! a header with magic bytes, a format version, and a checksum so that
//! corrupt or stale files read as cache misses rather than errors. The
//! store may be shared by any number of independent process invocations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tava_common::CacheKey;

use crate::error::CacheError;

/// Magic bytes identifying a tava cache entry.
const BLOB_MAGIC: [u8; 4] = *b"TAVA";

/// Current entry format version. Increment on breaking changes to the
/// header or payload layout.
const BLOB_FORMAT_VERSION: u32 = 1;

/// File extension for stored entries (the transformed output is
/// executable script text).
const BLOB_EXT: &str = "js";

/// Header prepended to every stored entry for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobHeader {
    /// Magic bytes: must be `b"TAVA"`.
    magic: [u8; 4],

    /// Entry format version.
    format_version: u32,

    /// Tool version that produced this entry.
    tool_version: String,

    /// Content hash of the payload (for integrity checks).
    checksum: CacheKey,
}

/// Content-addressed key→blob store rooted at one directory.
///
/// Writes are atomic (staged to a temporary file and renamed into place),
/// so a crashed or failed transform never leaves a partial entry. Under
/// the write-once assumption, concurrent writers for the same key produce
/// identical bytes and last-writer-wins is benign; no locking is done
/// across processes.
pub struct BlobStore {
    /// Root directory for all entries.
    dir: PathBuf,

    /// Tool version recorded in entry headers.
    tool_version: String,
}

impl BlobStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory is created lazily on first write, not here, so a
    /// fully cached run never touches the filesystem beyond reads.
    pub fn new(dir: &Path, tool_version: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            tool_version: tool_version.to_string(),
        }
    }

    /// Returns the file path for the entry with the given key.
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{key}.{BLOB_EXT}"))
    }

    /// Returns `true` if a valid entry exists for the key.
    ///
    /// A present-but-corrupt entry (truncated, bad magic, wrong format
    /// version, checksum mismatch) reads as absent, degrading to a
    /// redundant transform rather than an error.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.read(key).is_some()
    }

    /// Writes an entry for the key atomically.
    ///
    /// The full header + payload is staged to a temporary file in the
    /// store directory and renamed into place, so readers never observe
    /// a partial entry.
    pub fn write(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let header = BlobHeader {
            magic: BLOB_MAGIC,
            format_version: BLOB_FORMAT_VERSION,
            tool_version: self.tool_version.clone(),
            checksum: CacheKey::from_bytes(data),
        };

        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // Layout: 4-byte header length (little-endian) + header + payload
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + data.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(data);

        let final_path = self.entry_path(key);
        let tmp_path = self.dir.join(format!(".{key}.tmp"));

        std::fs::write(&tmp_path, &output).map_err(|e| CacheError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &final_path).map_err(|e| CacheError::Io {
            path: final_path,
            source: e,
        })
    }

    /// Reads and validates the entry for the key.
    ///
    /// Returns `None` if the entry is missing or fails any validation.
    pub fn read(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        let raw = std::fs::read(&path).ok()?;

        // Need at least 4 bytes for the header length
        if raw.len() < 4 {
            return None;
        }

        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }

        let header: BlobHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;

        if header.magic != BLOB_MAGIC {
            return None;
        }
        if header.format_version != BLOB_FORMAT_VERSION {
            return None;
        }

        let payload = &raw[4 + header_len..];
        if CacheKey::from_bytes(payload) != header.checksum {
            return None;
        }

        Some(payload.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> (tempfile::TempDir, BlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path(), "0.1.0");
        (dir, store)
    }

    #[test]
    fn write_and_read_roundtrip() {
        let (_dir, store) = make_store();
        let data = b"const test = require('ava');";
        let key = CacheKey::from_bytes(data);
        store.write(&key, data).unwrap();

        let read_back = store.read(&key).unwrap();
        assert_eq!(read_back, data);
        assert!(store.contains(&key));
    }

    #[test]
    fn read_missing_returns_none() {
        let (_dir, store) = make_store();
        let key = CacheKey::from_bytes(b"never written");
        assert!(store.read(&key).is_none());
        assert!(!store.contains(&key));
    }

    #[test]
    fn missing_store_directory_reads_as_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(&dir.path().join("does-not-exist"), "0.1.0");
        assert!(!store.contains(&CacheKey::from_bytes(b"anything")));
    }

    #[test]
    fn corrupt_entry_reads_as_miss() {
        let (_dir, store) = make_store();
        let key = CacheKey::from_bytes(b"data");
        store.write(&key, b"data").unwrap();

        std::fs::write(store.entry_path(&key), b"garbage").unwrap();
        assert!(!store.contains(&key));
    }

    #[test]
    fn truncated_entry_reads_as_miss() {
        let (_dir, store) = make_store();
        let key = CacheKey::from_bytes(b"data");
        std::fs::create_dir_all(store.entry_path(&key).parent().unwrap()).unwrap();
        // Only 2 bytes, not enough for the header length
        std::fs::write(store.entry_path(&key), b"TA").unwrap();
        assert!(store.read(&key).is_none());
    }

    #[test]
    fn tampered_payload_reads_as_miss() {
        let (_dir, store) = make_store();
        let key = CacheKey::from_bytes(b"original");
        store.write(&key, b"original").unwrap();

        // Flip the last payload byte in place
        let path = store.entry_path(&key);
        let mut raw = std::fs::read(&path).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        std::fs::write(&path, &raw).unwrap();

        assert!(store.read(&key).is_none());
    }

    #[test]
    fn rewrite_same_key_is_benign() {
        let (_dir, store) = make_store();
        let data = b"same bytes";
        let key = CacheKey::from_bytes(data);
        store.write(&key, data).unwrap();
        store.write(&key, data).unwrap();
        assert_eq!(store.read(&key).unwrap(), data);
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (dir, store) = make_store();
        let data = b"payload";
        let key = CacheKey::from_bytes(data);
        store.write(&key, data).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("node_modules/.cache/tava");
        let store = BlobStore::new(&nested, "0.1.0");
        let key = CacheKey::from_bytes(b"x");
        store.write(&key, b"x").unwrap();
        assert!(store.contains(&key));
    }

    #[test]
    fn write_large_payload() {
        let (_dir, store) = make_store();
        let data: Vec<u8> = (0..10_000).map(|i| (i % 256) as u8).collect();
        let key = CacheKey::from_bytes(&data);
        store.write(&key, &data).unwrap();
        assert_eq!(store.read(&key).unwrap(), data);
    }

    #[test]
    fn entry_path_uses_hex_key() {
        let (_dir, store) = make_store();
        let key = CacheKey::from_bytes(b"abc");
        let path = store.entry_path(&key);
        assert!(path.ends_with(format!("{key}.js")));
    }
}
