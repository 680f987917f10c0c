//! Cache key derivation.

use crate::config::UsdBucket;
use crate::types::{Address, TradeType};

/// Deterministic, stable-across-restarts cache key for a
/// `(chain, in, out, trade_type, usd_bucket)` tuple. Lowercases both token
/// addresses so the key doesn't depend on request-supplied casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub chain_id: u64,
    pub token_in: String,
    pub token_out: String,
    pub trade_type: TradeType,
    pub bucket: UsdBucket,
}

impl CacheKey {
    pub fn new(chain_id: u64, token_in: &Address, token_out: &Address, trade_type: TradeType, bucket: UsdBucket) -> Self {
        Self {
            chain_id,
            token_in: token_in.lowercased(),
            token_out: token_out.lowercased(),
            trade_type,
            bucket,
        }
    }

    /// Stable string form callers can introspect.
    pub fn construct(&self) -> String {
        let trade = match self.trade_type {
            TradeType::ExactIn => "exact_in",
            TradeType::ExactOut => "exact_out",
        };
        format!(
            "routes:{}:{}:{}:{}:{}",
            self.chain_id,
            self.token_in,
            self.token_out,
            trade,
            self.bucket.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address as AlloyAddress;

    #[test]
    fn key_construction_is_stable_across_calls() {
        let a = Address::new(AlloyAddress::repeat_byte(0xAB));
        let b = Address::new(AlloyAddress::repeat_byte(0xCD));
        let key1 = CacheKey::new(1, &a, &b, TradeType::ExactIn, UsdBucket::Hundred);
        let key2 = CacheKey::new(1, &a, &b, TradeType::ExactIn, UsdBucket::Hundred);
        assert_eq!(key1.construct(), key2.construct());
    }

    #[test]
    fn key_is_case_insensitive_on_addresses() {
        let lower = Address::new(AlloyAddress::repeat_byte(0xab));
        let upper = Address::new(AlloyAddress::repeat_byte(0xAB));
        let key1 = CacheKey::new(1, &lower, &lower, TradeType::ExactIn, UsdBucket::One);
        let key2 = CacheKey::new(1, &upper, &upper, TradeType::ExactIn, UsdBucket::One);
        assert_eq!(key1.construct(), key2.construct());
    }
}
