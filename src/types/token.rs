//! Token and currency value types.

use super::address::Address;

/// An ERC-20-shaped token. `usd_price` is `None` when no price source has
/// resolved it yet - downstream stages must tolerate that, not treat it as
/// an error.
#[derive(Debug, Clone)]
pub struct Token {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    pub usd_price: Option<f64>,
}

impl Token {
    pub fn new(address: Address, decimals: u8, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        debug_assert!(decimals <= 36, "decimals out of range: {decimals}");
        Self {
            address,
            decimals,
            symbol: symbol.into(),
            name: name.into(),
            usd_price: None,
        }
    }

    /// A null/unresolved token sentinel. Every stage that reads a `Token`
    /// downstream of token resolution must handle this without panicking.
    pub fn unresolved(address: Address) -> Self {
        Self {
            address,
            decimals: 18,
            symbol: String::new(),
            name: String::new(),
            usd_price: None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.symbol.is_empty() && self.name.is_empty()
    }
}

/// Native-vs-wrapped currency information. Native inputs/outputs route
/// identically to their wrapped form but render with the caller-supplied
/// native symbol at response time.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyInfo {
    pub is_native: bool,
    pub wrapped_address: Address,
}

impl CurrencyInfo {
    pub fn wrapped(wrapped_address: Address) -> Self {
        Self { is_native: false, wrapped_address }
    }

    pub fn native(wrapped_address: Address) -> Self {
        Self { is_native: true, wrapped_address }
    }
}
