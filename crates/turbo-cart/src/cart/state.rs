//! The ordered collection of cart entries and its mutation rules.

use std::collections::HashSet;

use crate::cart::{CartEntry, Product};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Price;

/// Cart contents in display order.
///
/// Holds at most one entry per product id and never an entry with
/// quantity 0. Totals are derived on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    entries: Vec<CartEntry>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from previously persisted entries.
    ///
    /// Returns an error if an entry has quantity 0 or an id repeats.
    pub fn from_entries(entries: Vec<CartEntry>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.quantity == 0 {
                return Err(CartError::InvalidState(format!(
                    "entry {} has quantity 0",
                    entry.id
                )));
            }
            if !seen.insert(&entry.id) {
                return Err(CartError::InvalidState(format!(
                    "duplicate entry {}",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Look up an entry by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line keeps its position and details and gains one unit;
    /// otherwise a new line with quantity 1 is appended. Returns the line's
    /// new quantity.
    pub fn add(&mut self, product: Product) -> u32 {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }
        self.entries.push(CartEntry::from_product(product));
        1
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        self.entries.len() < len_before
    }

    /// Set the quantity of `id` to exactly `quantity`.
    ///
    /// Zero or negative removes the line. Values beyond `u32::MAX` clamp.
    /// Returns whether the cart changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) if entry.quantity != quantity => {
                entry.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_price(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
