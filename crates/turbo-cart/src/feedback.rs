//! Add-to-cart control with transient "added" feedback.
//!
//! Pressing the control adds the product and flips it into an "added" state
//! for [`FEEDBACK_DURATION`]. The host owns the timer: it schedules
//! [`FeedbackReset::fire`] after [`FeedbackReset::delay`]. The reset token
//! only holds a weak reference, so a timer that fires after the control is
//! gone does nothing.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::cart::Product;
use crate::store::CartStore;

/// How long the control shows its "added" state.
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// An add-to-cart button bound to one product.
#[derive(Debug)]
pub struct AddToCartButton {
    store: CartStore,
    product: Product,
    added: Rc<Cell<bool>>,
}

impl AddToCartButton {
    /// Bind a button for `product` to `store`.
    pub fn new(store: CartStore, product: Product) -> Self {
        Self {
            store,
            product,
            added: Rc::new(Cell::new(false)),
        }
    }

    /// Add the product and show feedback.
    ///
    /// Returns the reset token to schedule, or `None` while the button is
    /// still showing feedback from a previous press.
    pub fn press(&self) -> Option<FeedbackReset> {
        if self.added.get() {
            return None;
        }
        self.store.add_to_cart(self.product.clone());
        self.added.set(true);
        Some(FeedbackReset {
            added: Rc::downgrade(&self.added),
            delay: FEEDBACK_DURATION,
        })
    }

    /// Whether the "added" feedback is showing.
    pub fn is_added(&self) -> bool {
        self.added.get()
    }

    /// Button text for the current state.
    pub fn label(&self) -> &'static str {
        if self.is_added() {
            "Added!"
        } else {
            "Add to Cart"
        }
    }
}

/// Deferred reset of an [`AddToCartButton`]'s feedback.
#[derive(Debug)]
#[must_use = "schedule the reset or the button stays in its added state"]
pub struct FeedbackReset {
    added: Weak<Cell<bool>>,
    delay: Duration,
}

impl FeedbackReset {
    /// How long the host should wait before firing.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Clear the feedback. Returns `false` if the button no longer exists.
    pub fn fire(self) -> bool {
        match self.added.upgrade() {
            Some(added) => {
                added.set(false);
                true
            }
            None => false,
        }
    }
}
