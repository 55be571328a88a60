//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_cart::checkout::{ENV_BASE_URL, ENV_CURRENCY, ENV_MESSAGE_PREFIX, ENV_RECIPIENT};
use turbo_cart::prelude::*;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is saved.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Checkout handoff settings.
    #[serde(default)]
    pub checkout: CheckoutSection,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Checkout settings from the file, overridden by the process environment.
    pub fn checkout_config(&self) -> Result<CheckoutConfig> {
        self.checkout_config_with(|key| std::env::var(key).ok())
    }

    /// Checkout settings from the file, overridden through `lookup`.
    ///
    /// A blank override falls back to the file value.
    pub fn checkout_config_with<F>(&self, lookup: F) -> Result<CheckoutConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = CheckoutConfig::from_lookup(|key| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| self.checkout.value(key))
        })
        .context("Invalid checkout configuration")?;
        Ok(config)
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the cart slot, relative to the config file.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Key of the cart slot.
    #[serde(default = "default_key")]
    pub key: String,

    /// Named cart kept alongside the default one, e.g. per kiosk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl StorageConfig {
    /// Slot key for the active profile: `key`, or `key:profile`.
    pub fn slot_key(&self) -> String {
        match self.profile.as_deref().map(str::trim) {
            Some(profile) if !profile.is_empty() => {
                turbo_cache::cache_key!(self.key.as_str(), profile)
            }
            _ => self.key.clone(),
        }
    }
}

fn default_dir() -> String {
    ".cart".to_string()
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            key: default_key(),
            profile: None,
        }
    }
}

/// Checkout section as written in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutSection {
    /// Messaging recipient, e.g. a phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,

    /// Greeting line of the order message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_prefix: Option<String>,

    /// ISO currency code for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Deep-link host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl CheckoutSection {
    fn value(&self, key: &str) -> Option<String> {
        match key {
            ENV_RECIPIENT => self.recipient_id.clone(),
            ENV_MESSAGE_PREFIX => self.message_prefix.clone(),
            ENV_CURRENCY => self.currency.clone(),
            ENV_BASE_URL => self.base_url.clone(),
            _ => None,
        }
    }
}
