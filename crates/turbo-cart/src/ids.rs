//! Product identifiers.
//!
//! Storefront catalogs key products either by number or by SKU-like string.
//! [`ProductId`] accepts both and serializes untagged, so a persisted `1`
//! comes back as a number and `"1"` comes back as a string.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A product key: integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric catalog id.
    Number(i64),
    /// String key such as a SKU or handle.
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parses user input: anything that reads as an integer becomes
/// [`ProductId::Number`], everything else stays text.
impl FromStr for ProductId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<i64>()
            .map(ProductId::Number)
            .unwrap_or_else(|_| ProductId::Text(s.to_string())))
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Number(n)
    }
}

impl From<i32> for ProductId {
    fn from(n: i32) -> Self {
        ProductId::Number(i64::from(n))
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId::Text(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::Text(s.to_string())
    }
}
