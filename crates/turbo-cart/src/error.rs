//! Cart error types.
//!
//! Store mutations never fail; these errors come from parsing input,
//! validating restored data and the checkout handoff.

use thiserror::Error;

/// Errors that can occur around the cart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Price string is not a non-negative decimal amount.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Restored entries break a cart invariant.
    #[error("Invalid cart state: {0}")]
    InvalidState(String),

    /// Unsupported currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout recipient is not configured.
    #[error("Checkout recipient is not configured")]
    MissingRecipient,
}
