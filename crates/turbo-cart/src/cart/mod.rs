//! Cart data model.
//!
//! Contains the product payload, cart entries, the ordered cart state and
//! the immutable snapshots handed to subscribers.

mod entry;
mod snapshot;
mod state;

pub use entry::{CartEntry, Product};
pub use snapshot::CartSnapshot;
pub use state::CartState;
