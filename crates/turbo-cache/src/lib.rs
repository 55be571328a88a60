//! Durable key-value slots for TurboCommerce.
//!
//! Provides a small, ergonomic API for keeping serializable data in a
//! key-value store with automatic JSON serialization. Two backends ship with
//! the crate: [`MemoryStore`] for tests and ephemeral sessions, and
//! [`FileStore`] for state that must survive a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::Cache;
//!
//! let cache = Cache::open(".cart")?;
//!
//! // Store a value under a namespaced key
//! let key = turbo_cache::cache_key!("cart", "kiosk");
//! cache.set(&key, &entries)?;
//!
//! // Retrieve a value
//! let entries: Option<Vec<CartEntry>> = cache.get(&key)?;
//!
//! // List saved slots
//! let keys = cache.keys()?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileStore, KvStore, MemoryStore};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
