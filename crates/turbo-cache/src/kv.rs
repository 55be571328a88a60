//! Typed cache over a [`KvStore`] backend with automatic serialization.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::{FileStore, KvStore, MemoryStore};
use crate::CacheError;

/// Type-safe cache backed by a key-value store.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
pub struct Cache {
    backend: Box<dyn KvStore>,
}

impl Cache {
    /// Wrap an arbitrary backend.
    pub fn new(backend: impl KvStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Cache over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open a file-backed cache rooted at `dir`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open(".cart")?;
    /// ```
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::new(FileStore::open(dir)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist and
    /// [`CacheError::SerializeError`] if the stored bytes don't decode as `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let entries: Option<Vec<CartEntry>> = cache.get("cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache, replacing whatever was there.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Get all keys in the cache, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```
/// let key = turbo_cache::cache_key!("cart", "storefront");
/// assert_eq!(key, "cart:storefront");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
