//! Currency selection types

use super::error::ViewError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

/// A currency the table can be displayed in.
///
/// Identity is the shorthand code, compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub shorthand: String,
    pub symbol: String,
    pub kind: CurrencyKind,
}

impl Currency {
    pub fn new(shorthand: &str, symbol: &str, kind: CurrencyKind) -> Self {
        Self {
            shorthand: shorthand.to_string(),
            symbol: symbol.to_string(),
            kind,
        }
    }

    pub fn fiat(shorthand: &str, symbol: &str) -> Self {
        Self::new(shorthand, symbol, CurrencyKind::Fiat)
    }

    pub fn crypto(shorthand: &str, symbol: &str) -> Self {
        Self::new(shorthand, symbol, CurrencyKind::Crypto)
    }

    /// Lower-cased lookup key into the currency-indexed maps.
    pub fn key(&self) -> String {
        self.shorthand.trim().to_lowercase()
    }

    /// Returns the canonical key, or `UnknownCurrency` when the shorthand
    /// cannot act as a map key.
    pub fn canonical_key(&self) -> Result<String, ViewError> {
        let key = self.key();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ViewError::UnknownCurrency(self.shorthand.clone()));
        }
        Ok(key)
    }

    pub fn is_fiat(&self) -> bool {
        self.kind == CurrencyKind::Fiat
    }

    /// True when switching from `self` to `other` would change nothing.
    pub fn same_as(&self, other: &Currency) -> bool {
        self.key() == other.key() && self.symbol == other.symbol && self.kind == other.kind
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Currency {}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.shorthand.to_uppercase(), self.symbol)
    }
}

/// Currencies offered when the config does not list any.
pub fn default_currencies() -> Vec<Currency> {
    vec![
        Currency::fiat("usd", "$"),
        Currency::fiat("eur", "€"),
        Currency::fiat("gbp", "£"),
        Currency::fiat("jpy", "¥"),
        Currency::fiat("inr", "₹"),
        Currency::crypto("btc", "₿"),
        Currency::crypto("eth", "Ξ"),
    ]
}

/// Finds `code` among `currencies`, ignoring case.
pub fn resolve<'a>(currencies: &'a [Currency], code: &str) -> Result<&'a Currency, ViewError> {
    let wanted = code.trim().to_lowercase();
    currencies
        .iter()
        .find(|c| c.key() == wanted)
        .ok_or_else(|| ViewError::UnknownCurrency(code.to_string()))
}
