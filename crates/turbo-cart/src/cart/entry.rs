//! Product payloads and cart entries.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::Price;

/// What an add-to-cart control hands the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product key.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL or path.
    pub image: String,
}

impl Product {
    /// Create a product payload.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// One distinct product line in the cart.
///
/// Serialized flat as `{id, name, price, image, quantity}`, which is also the
/// persisted record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product key, unique within a cart.
    pub id: ProductId,
    /// Display name (denormalized for display).
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL or path.
    pub image: String,
    /// Quantity, at least 1.
    pub quantity: u32,
}

impl CartEntry {
    /// A fresh line for `product` with quantity 1.
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}
