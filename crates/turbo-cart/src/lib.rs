//! Client-side shopping cart for TurboCommerce storefronts.
//!
//! This crate keeps a visitor's cart in memory, saves it to a key-value slot
//! after every change and tells subscribed views about each new state:
//!
//! - **Cart**: product payloads, entries, ordered state and snapshots
//! - **Store**: the single owner of cart state, with persistence
//! - **Subscriptions**: listeners that stay in sync with the store
//! - **Checkout**: order message and messaging deep link
//! - **Feedback**: add-to-cart control with a timed "added" state
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cart::prelude::*;
//! use turbo_cache::Cache;
//!
//! let store = CartStore::open(Cache::open(".cart")?, StoreConfig::default());
//!
//! let badge = store.subscribe(|snapshot| {
//!     render_badge(snapshot.badge_count());
//! });
//!
//! store.add_to_cart(Product::new(1, "Mug", Price::parse("12.00", 2)?, "/mug.jpg"));
//! store.update_quantity(&ProductId::from(1), 3);
//!
//! let handoff = checkout(&store, &CheckoutConfig::from_env()?)?;
//! open_link(&handoff.url);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod checkout;
pub mod feedback;
pub mod store;
pub mod subscription;

pub use error::CartError;
pub use ids::ProductId;
pub use money::{Currency, Price};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Price};

    // Cart
    pub use crate::cart::{CartEntry, CartSnapshot, CartState, Product};

    // Store
    pub use crate::store::{CartStore, PersistWarning, StoreConfig, DEFAULT_STORAGE_KEY};
    pub use crate::subscription::{Subscription, SubscriptionId};

    // Checkout
    pub use crate::checkout::{checkout, handoff_url, CheckoutConfig, Handoff, OrderMessage};

    // Feedback
    pub use crate::feedback::{AddToCartButton, FeedbackReset, FEEDBACK_DURATION};
}
