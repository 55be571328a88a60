//! Immutable point-in-time reads of the cart.

use serde::Serialize;

use crate::cart::{CartEntry, CartState};
use crate::ids::ProductId;
use crate::money::Price;

/// Cart entries plus derived totals at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    /// Store revision this snapshot was taken at. Increases by one per change.
    pub revision: u64,
    /// Entries in display order.
    pub entries: Vec<CartEntry>,
    /// Sum of quantities.
    pub total_items: u64,
    /// Sum of line totals.
    pub total_price: Price,
}

impl CartSnapshot {
    /// Capture `state` at `revision`.
    pub fn capture(state: &CartState, revision: u64) -> Self {
        Self {
            revision,
            entries: state.entries().to_vec(),
            total_items: state.total_items(),
            total_price: state.total_price(),
        }
    }

    /// Check if the cart was empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up an entry by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Count for a cart icon badge; `None` hides the badge.
    pub fn badge_count(&self) -> Option<u64> {
        (self.total_items > 0).then_some(self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Product;

    #[test]
    fn test_capture_derives_totals() {
        let mut state = CartState::new();
        state.add(Product::new(1, "A", Price::from_minor(1000), ""));
        state.add(Product::new(1, "A", Price::from_minor(1000), ""));
        state.add(Product::new(2, "B", Price::from_minor(500), ""));

        let snapshot = CartSnapshot::capture(&state, 3);
        assert_eq!(snapshot.revision, 3);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.total_items, 3);
        assert_eq!(snapshot.total_price, Price::from_minor(2500));
        assert_eq!(snapshot.get(&ProductId::from(2)).unwrap().quantity, 1);
        assert_eq!(snapshot.badge_count(), Some(3));
    }

    #[test]
    fn test_empty_snapshot_hides_badge() {
        let snapshot = CartSnapshot::capture(&CartState::new(), 0);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.badge_count(), None);
        assert_eq!(snapshot.total_price, Price::ZERO);
    }
}
