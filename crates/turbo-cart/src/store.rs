//! The cart store: sole owner of cart state.
//!
//! Every change follows the same sequence before the call returns: update
//! the in-memory state, write the full entry list to the persisted slot,
//! then publish a snapshot to subscribers. Persistence faults are logged and
//! recorded but never interrupt that sequence.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use turbo_cache::Cache;

use crate::cart::{CartEntry, CartSnapshot, CartState, Product};
use crate::ids::ProductId;
use crate::subscription::{Bridge, Subscription};

/// Slot key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the persisted slot.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Use a custom slot key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// A failed write to the persisted slot.
///
/// The in-memory cart is unaffected; only durability is lost until the next
/// successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistWarning {
    /// Slot key that could not be written.
    pub key: String,
    /// Backend error message.
    pub message: String,
    /// Revision whose write failed.
    pub revision: u64,
}

impl fmt::Display for PersistWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cart not saved to '{}' (revision {}): {}",
            self.key, self.revision, self.message
        )
    }
}

struct StoreInner {
    cache: Cache,
    key: String,
    state: RefCell<CartState>,
    revision: Cell<u64>,
    warning: RefCell<Option<PersistWarning>>,
    bridge: Rc<Bridge>,
}

/// Handle to a cart store.
///
/// Cloning is cheap and every clone talks to the same cart. The application
/// root opens one store and passes handles to whatever needs the cart.
///
/// # Example
///
/// ```
/// use turbo_cart::prelude::*;
///
/// let store = CartStore::in_memory();
/// let _badge = store.subscribe(|s| println!("{} items", s.total_items));
///
/// store.add_to_cart(Product::new(1, "Mug", Price::from_minor(1200), "/mug.jpg"));
/// store.add_to_cart(Product::new(1, "Mug", Price::from_minor(1200), "/mug.jpg"));
///
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot.total_items, 2);
/// assert_eq!(snapshot.total_price, Price::from_minor(2400));
/// ```
#[derive(Clone)]
pub struct CartStore {
    inner: Rc<StoreInner>,
}

impl CartStore {
    /// Open a store over `cache`, restoring any saved cart.
    ///
    /// Never fails: a missing, unreadable or invalid slot yields an empty
    /// cart and a logged warning.
    pub fn open(cache: Cache, config: StoreConfig) -> Self {
        let state = read_saved(&cache, &config.storage_key).unwrap_or_default();
        Self {
            inner: Rc::new(StoreInner {
                cache,
                key: config.storage_key,
                state: RefCell::new(state),
                revision: Cell::new(0),
                warning: RefCell::new(None),
                bridge: Rc::new(Bridge::default()),
            }),
        }
    }

    /// Store over a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::open(Cache::in_memory(), StoreConfig::default())
    }

    /// Add one unit of `product`; appends a new line if it isn't in the cart.
    ///
    /// Returns the line's quantity after the add.
    pub fn add_to_cart(&self, product: Product) -> u32 {
        let id = product.id.clone();
        let quantity = self.inner.state.borrow_mut().add(product);
        tracing::debug!(product_id = %id, quantity, "added to cart");
        self.commit();
        quantity
    }

    /// Remove the line for `id`. Unknown ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove_from_cart(&self, id: &ProductId) -> bool {
        let removed = self.inner.state.borrow_mut().remove(id);
        if removed {
            tracing::debug!(product_id = %id, "removed from cart");
            self.commit();
        }
        removed
    }

    /// Set the quantity of `id` exactly. Zero or below removes the line;
    /// unknown ids are ignored.
    ///
    /// Returns whether the cart changed.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> bool {
        let changed = self.inner.state.borrow_mut().set_quantity(id, quantity);
        if changed {
            tracing::debug!(product_id = %id, quantity, "quantity updated");
            self.commit();
        }
        changed
    }

    /// Empty the cart. Returns whether anything was removed.
    pub fn clear_cart(&self) -> bool {
        let cleared = self.inner.state.borrow_mut().clear();
        if cleared {
            tracing::debug!("cart cleared");
            self.commit();
        }
        cleared
    }

    /// Current entries and totals.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.inner.state.borrow(), self.inner.revision.get())
    }

    /// Register `listener`. It is called immediately with the current
    /// snapshot and again after every change until unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&CartSnapshot) + 'static,
    {
        let current = self.snapshot();
        self.inner
            .bridge
            .subscribe(Rc::new(RefCell::new(listener)), &current)
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.bridge.len()
    }

    /// Re-read the persisted slot, picking up a write made by another
    /// context. Publishes a snapshot if the contents differ.
    ///
    /// A missing or unusable slot leaves the in-memory cart alone. Returns
    /// whether the in-memory cart changed.
    pub fn reload(&self) -> bool {
        let Some(restored) = read_saved(&self.inner.cache, &self.inner.key) else {
            return false;
        };
        {
            let mut state = self.inner.state.borrow_mut();
            if *state == restored {
                return false;
            }
            *state = restored;
        }
        let revision = self.bump_revision();
        tracing::info!(key = %self.inner.key, revision, "cart reloaded from storage");
        self.inner.bridge.publish(self.snapshot());
        true
    }

    /// The most recent persistence failure, cleared by the next successful
    /// write.
    pub fn persist_warning(&self) -> Option<PersistWarning> {
        self.inner.warning.borrow().clone()
    }

    /// Key of the persisted slot.
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    fn bump_revision(&self) -> u64 {
        let revision = self.inner.revision.get() + 1;
        self.inner.revision.set(revision);
        revision
    }

    fn commit(&self) {
        let revision = self.bump_revision();
        let snapshot = {
            let state = self.inner.state.borrow();
            self.persist(state.entries(), revision);
            CartSnapshot::capture(&state, revision)
        };
        self.inner.bridge.publish(snapshot);
    }

    fn persist(&self, entries: &[CartEntry], revision: u64) {
        let key = &self.inner.key;
        match self.inner.cache.set(key, entries) {
            Ok(()) => {
                self.inner.warning.borrow_mut().take();
            }
            Err(e) => {
                tracing::warn!(key = %key, revision, error = %e, "failed to persist cart");
                *self.inner.warning.borrow_mut() = Some(PersistWarning {
                    key: key.clone(),
                    message: e.to_string(),
                    revision,
                });
            }
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("revision", &self.inner.revision.get())
            .field("entries", &self.inner.state.borrow().len())
            .finish()
    }
}

/// Best-effort read of the saved cart.
///
/// `None` when the slot is empty or its contents can't be used; the reason
/// is logged.
fn read_saved(cache: &Cache, key: &str) -> Option<CartState> {
    let entries = match cache.get::<Vec<CartEntry>>(key) {
        Ok(Some(entries)) => entries,
        Ok(None) => {
            tracing::debug!(key, "no saved cart");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable saved cart");
            return None;
        }
    };

    match CartState::from_entries(entries) {
        Ok(state) => {
            tracing::info!(key, lines = state.len(), items = state.total_items(), "cart restored");
            Some(state)
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding invalid saved cart");
            None
        }
    }
}
