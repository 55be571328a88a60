//! Checkout handoff: turn the cart into a chat message and a deep link.
//!
//! The store knows nothing about this module. It reads a snapshot, formats
//! the order and, once the link exists, clears the cart.

use std::fmt;

use crate::cart::CartSnapshot;
use crate::error::CartError;
use crate::money::Currency;
use crate::store::CartStore;

/// Greeting used when no prefix is configured.
pub const DEFAULT_MESSAGE_PREFIX: &str = "Hola! Me gustaría hacer un pedido:";

/// Messaging deep-link host used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://wa.me";

/// Environment variable holding the recipient id.
pub const ENV_RECIPIENT: &str = "CART_CHECKOUT_RECIPIENT";
/// Environment variable overriding the greeting line.
pub const ENV_MESSAGE_PREFIX: &str = "CART_CHECKOUT_MESSAGE_PREFIX";
/// Environment variable selecting the display currency.
pub const ENV_CURRENCY: &str = "CART_CHECKOUT_CURRENCY";
/// Environment variable overriding the deep-link host.
pub const ENV_BASE_URL: &str = "CART_CHECKOUT_BASE_URL";

/// Where and how the order message is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Messaging destination, e.g. a phone number in international format.
    pub recipient_id: String,
    /// Overrides [`DEFAULT_MESSAGE_PREFIX`].
    pub message_prefix: Option<String>,
    /// Currency used to render amounts.
    pub currency: Currency,
    /// Deep-link host.
    pub base_url: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            recipient_id: String::new(),
            message_prefix: None,
            currency: Currency::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CheckoutConfig {
    /// Config for `recipient_id` with defaults elsewhere.
    pub fn new(recipient_id: impl Into<String>) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, CartError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CartError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(recipient) = get(ENV_RECIPIENT) {
            config.recipient_id = recipient;
        }
        config.message_prefix = get(ENV_MESSAGE_PREFIX);
        if let Some(code) = get(ENV_CURRENCY) {
            config.currency = Currency::from_code(&code)?;
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Greeting line that opens the message.
    pub fn prefix(&self) -> &str {
        self.message_prefix
            .as_deref()
            .unwrap_or(DEFAULT_MESSAGE_PREFIX)
    }

    /// Trimmed recipient, or an error if none is configured.
    pub fn recipient(&self) -> Result<&str, CartError> {
        let recipient = self.recipient_id.trim();
        if recipient.is_empty() {
            return Err(CartError::MissingRecipient);
        }
        Ok(recipient)
    }
}

/// Plain-text order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMessage {
    prefix: String,
    lines: Vec<String>,
    total: String,
}

impl OrderMessage {
    /// Format `snapshot` using the prefix and currency from `config`.
    pub fn compose(snapshot: &CartSnapshot, config: &CheckoutConfig) -> Self {
        let currency = config.currency;
        let lines = snapshot
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "\u{2022} {} x{} - {}",
                    entry.name,
                    entry.quantity,
                    entry.line_total().display(currency)
                )
            })
            .collect();

        Self {
            prefix: config.prefix().to_string(),
            lines,
            total: snapshot.total_price.display(currency),
        }
    }
}

impl fmt::Display for OrderMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.prefix)?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        write!(f, "\n*Total: {}*", self.total)
    }
}

/// Build the deep link that opens a chat with `message` prefilled.
pub fn handoff_url(message: &str, config: &CheckoutConfig) -> Result<String, CartError> {
    let recipient = config.recipient()?;
    Ok(format!(
        "{}/{}?text={}",
        config.base_url.trim_end_matches('/'),
        urlencoding::encode(recipient),
        urlencoding::encode(message)
    ))
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    /// Deep link to open.
    pub url: String,
    /// Message carried by the link.
    pub message: String,
    /// Cart as it was when the order was placed.
    pub order: CartSnapshot,
}

/// Hand the cart off to the messaging channel.
///
/// Fails without touching the cart when it is empty or no recipient is
/// configured. On success the cart is cleared.
pub fn checkout(store: &CartStore, config: &CheckoutConfig) -> Result<Handoff, CartError> {
    config.recipient()?;
    let order = store.snapshot();
    if order.is_empty() {
        return Err(CartError::EmptyCart);
    }

    let message = OrderMessage::compose(&order, config).to_string();
    let url = handoff_url(&message, config)?;
    store.clear_cart();

    tracing::info!(
        lines = order.len(),
        items = order.total_items,
        total = %order.total_price.display(config.currency),
        "order handed off"
    );
    Ok(Handoff {
        url,
        message,
        order,
    })
}
