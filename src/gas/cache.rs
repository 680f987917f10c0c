//! Adaptive gas-price cache with volatility-aware invalidation.
//!
//! Keys on chain id and invalidates on gas-price delta rather than a
//! fixed TTL alone, since gas prices can move sharply within a single
//! TTL window.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Base TTL when the last observed gas price was calm.
const TTL_CALM: Duration = Duration::from_secs(30);
/// Shorter TTL once gas price has started moving.
const TTL_VOLATILE: Duration = Duration::from_secs(10);
/// Relative gas-price delta (in basis points of the cached price) above
/// which an entry is treated as volatile for its own next TTL.
const VOLATILE_DELTA_BPS: u64 = 2_000;
/// Relative delta above which a cached entry is invalidated outright,
/// regardless of TTL, because the market moved too far since it was cached.
const INVALIDATE_DELTA_BPS: u64 = 5_000;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    gas_price_wei: u64,
    cached_at: Instant,
    was_volatile: bool,
}

/// Per-chain gas price cache. Backed by `dashmap` for
/// lock-free reads matching the cache concurrency model.
#[derive(Default)]
pub struct GasPriceCache {
    entries: DashMap<u64, CacheEntry>,
}

impl GasPriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn relative_delta_bps(old: u64, new: u64) -> u64 {
        if old == 0 {
            return if new == 0 { 0 } else { u64::MAX };
        }
        let delta = old.abs_diff(new);
        (delta as u128 * 10_000 / old as u128) as u64
    }

    /// Return a cached gas price for `chain_id` if it's still fresh
    /// relative to `observed_gas_price_wei` (a cheap, possibly stale probe
    /// the caller already has, e.g. from the previous request).
    pub fn get(&self, chain_id: u64, observed_gas_price_wei: u64) -> Option<u64> {
        let entry = self.entries.get(&chain_id)?;
        let delta_bps = Self::relative_delta_bps(entry.gas_price_wei, observed_gas_price_wei);
        if delta_bps > INVALIDATE_DELTA_BPS {
            return None;
        }
        let ttl = if entry.was_volatile { TTL_VOLATILE } else { TTL_CALM };
        if entry.cached_at.elapsed() > ttl {
            return None;
        }
        Some(entry.gas_price_wei)
    }

    /// Record a freshly fetched gas price, marking the entry volatile if it
    /// moved significantly from what was previously cached.
    pub fn put(&self, chain_id: u64, gas_price_wei: u64) {
        let was_volatile = self
            .entries
            .get(&chain_id)
            .map(|prev| Self::relative_delta_bps(prev.gas_price_wei, gas_price_wei) >= VOLATILE_DELTA_BPS)
            .unwrap_or(false);
        self.entries.insert(
            chain_id,
            CacheEntry { gas_price_wei, cached_at: Instant::now(), was_volatile },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_within_threshold_hits() {
        let cache = GasPriceCache::new();
        cache.put(1, 10_000_000_000);
        assert_eq!(cache.get(1, 10_050_000_000), Some(10_000_000_000));
    }

    #[test]
    fn large_delta_invalidates_despite_ttl() {
        let cache = GasPriceCache::new();
        cache.put(1, 10_000_000_000);
        // 60% jump far exceeds the invalidation threshold.
        assert_eq!(cache.get(1, 16_000_000_000), None);
    }

    #[test]
    fn miss_on_unknown_chain() {
        let cache = GasPriceCache::new();
        assert_eq!(cache.get(999, 1), None);
    }
}
