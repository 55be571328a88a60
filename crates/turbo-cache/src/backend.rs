//! Storage backends for the key-value slot.
//!
//! A backend only moves bytes. Serialization lives in [`Cache`](crate::Cache).

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::CacheError;

const SLOT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// A durable key-value store holding raw bytes.
pub trait KvStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List every key in the store.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// In-process backend.
///
/// Clones share the same underlying map, so a second handle sees every
/// write made through the first one. That is how tests simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once the stored values
    /// would exceed `limit` bytes in total.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            slots: Rc::default(),
            quota: Some(limit),
        }
    }

    /// Another handle onto the same slots with a different quota.
    pub fn share_with_quota(&self, limit: Option<usize>) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
            quota: limit,
        }
    }

    /// Write bytes directly, bypassing the quota. Used to plant corrupt data.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.slots.borrow_mut().insert(key.into(), value.into());
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        if let Some(limit) = self.quota {
            let size = self.used_bytes_excluding(key) + value.len();
            if size > limit {
                return Err(CacheError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                });
            }
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.slots.borrow().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.slots.borrow().keys().cloned().collect())
    }
}

/// Filesystem backend: one file per key inside a directory.
///
/// Writes land in a temporary sibling first and are renamed into place, so a
/// reader never observes a partially written slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), SLOT_EXTENSION))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.slot_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.slot_path(key);
        let tmp = path.with_extension(TEMP_EXTENSION);
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        tracing::trace!(key, path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.slot_path(key).is_file())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(decode_key)
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Escape a key into a filesystem-safe file stem.
///
/// Percent-encoding keeps path separators out of the name and distinct keys
/// distinct.
fn encode_key(key: &str) -> Cow<'_, str> {
    urlencoding::encode(key)
}

fn decode_key(stem: &str) -> Option<String> {
    urlencoding::decode(stem).ok().map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("cart", b"[]").unwrap();
        assert_eq!(store.get("cart").unwrap(), Some(b"[]".to_vec()));
        assert!(store.exists("cart").unwrap());

        store.delete("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
        assert!(!store.exists("cart").unwrap());
    }

    #[test]
    fn test_memory_store_clones_share_slots() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("cart", b"1").unwrap();
        assert_eq!(b.get("cart").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(4);
        store.set("a", b"1234").unwrap();

        // Overwriting the same key only counts the new value.
        store.set("a", b"abcd").unwrap();

        let err = store.set("b", b"x").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { size: 5, limit: 4, .. }));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_memory_store_keys_sorted() {
        let store = MemoryStore::new();
        store.set("b", b"").unwrap();
        store.set("a", b"").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("cart"), "cart");
        assert_eq!(encode_key("cart:main"), "cart%3Amain");
        assert_eq!(encode_key("../x"), "..%2Fx");
        assert_eq!(encode_key("cart/main"), "cart%2Fmain");
        assert_eq!(decode_key("cart%3Amain").as_deref(), Some("cart:main"));
        assert_eq!(decode_key("bad%FF"), None);
        assert_ne!(encode_key("a:b"), encode_key("a_b"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("slots")).unwrap();

        assert_eq!(store.get("cart:main").unwrap(), None);
        store.set("cart:main", br#"[{"id":1}]"#).unwrap();
        assert_eq!(
            store.get("cart:main").unwrap(),
            Some(br#"[{"id":1}]"#.to_vec())
        );
        assert!(store.exists("cart:main").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["cart:main".to_string()]);

        store.delete("cart:main").unwrap();
        store.delete("cart:main").unwrap();
        assert!(!store.exists("cart:main").unwrap());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::open(dir.path()).unwrap().set("cart", b"[]").unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("cart").unwrap(), Some(b"[]".to_vec()));
    }
}
