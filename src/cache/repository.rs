//! Cached-routes repository: a sorted set per
//! `(chain, in, out, trade_type, usd_bucket)` bucket, capped at
//! `MaxRoutesPerBucket`, scored by insertion order.
//!
//! Reads take a brief per-shard lock only long enough to clone the bucket's
//! current contents.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;

use crate::cache::bucket::CacheKey;
use crate::cache::encode::{decode_route, encode_route, EncodedRoute};
use crate::config::{EngineConfig, UsdBucket};
use crate::types::{Address, Route, TradeType};

/// Tie-breaker for entries inserted within the same millisecond - the
/// low 20 bits of the score, leaving the wall-clock millisecond as the
/// high bits so scores stay monotonic across process restarts too.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// `score = current_monotonic_time`, per spec.md §4.6: a millisecond wall
/// clock reading with a per-process sequence number folded into the low
/// bits so two inserts in the same millisecond still order by insertion.
fn next_score() -> i64 {
    let millis = Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xF_FFFF;
    (millis << 20) | seq as i64
}

#[derive(Debug, Clone)]
struct ScoredEntry {
    score: i64,
    route: EncodedRoute,
}

/// Outcome of a bucket read.
#[derive(Debug, Clone)]
pub struct BucketRoutes {
    pub bucket: UsdBucket,
    pub routes: Vec<Route>,
    pub found: bool,
    pub message: String,
}

/// Outcome of a delete.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

/// Bucketed, bounded-size cached-routes store.
#[derive(Default)]
pub struct CachedRoutesRepository {
    buckets: dashmap::DashMap<CacheKey, Mutex<Vec<ScoredEntry>>>,
}

impl CachedRoutesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn construct_cached_route_key(
        chain_id: u64,
        token_in: &Address,
        token_out: &Address,
        trade_type: TradeType,
        bucket: UsdBucket,
    ) -> String {
        CacheKey::new(chain_id, token_in, token_out, trade_type, bucket).construct()
    }

    /// `saveCachedRoutes`: encode `route`, insert into the sorted set for
    /// the bucket derived from `notional_usd`, trim to
    /// `config.max_routes_per_bucket` (lowest score dropped first). A
    /// fake-tick-spacing V4 bridge route is silently skipped - it must
    /// never be persisted.
    pub fn save_cached_routes(
        &self,
        config: &EngineConfig,
        route: &Route,
        chain_id: u64,
        token_in: &Address,
        token_out: &Address,
        trade_type: TradeType,
        notional_usd: f64,
    ) {
        let Some(encoded) = encode_route(route) else { return };
        let bucket = UsdBucket::from_notional_usd(notional_usd);
        let key = CacheKey::new(chain_id, token_in, token_out, trade_type, bucket);

        let slot = self.buckets.entry(key).or_default();
        let mut entries = slot.lock();
        entries.push(ScoredEntry { score: next_score(), route: encoded });
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(config.max_routes_per_bucket);
    }

    /// `getCachedRoutes`: for every configured bucket, fetch up to
    /// `config.top_n_from_cache` entries (highest score first), decode
    /// them, and report one result per bucket with `found = !empty`.
    /// Decoding never fails here since entries are always well-formed at
    /// write time, but the shape tolerates skipping an entry on decode
    /// failure for forward compatibility.
    pub fn get_cached_routes(
        &self,
        config: &EngineConfig,
        chain_id: u64,
        token_in: &Address,
        token_out: &Address,
        trade_type: TradeType,
    ) -> Vec<BucketRoutes> {
        UsdBucket::ALL
            .iter()
            .map(|&bucket| {
                let key = CacheKey::new(chain_id, token_in, token_out, trade_type, bucket);
                let routes: Vec<Route> = match self.buckets.get(&key) {
                    Some(slot) => {
                        let entries = slot.lock();
                        entries.iter().take(config.top_n_from_cache).map(|e| decode_route(&e.route)).collect()
                    }
                    None => Vec::new(),
                };
                let found = !routes.is_empty();
                let message = if found { "hit".to_string() } else { "miss".to_string() };
                BucketRoutes { bucket, routes, found, message }
            })
            .collect()
    }

    /// `deleteCachedRoutes`: delete the bucket key outright. `success` is
    /// `true` whenever the delete executes without an I/O error, whether or
    /// not the key existed.
    pub fn delete_cached_routes(
        &self,
        chain_id: u64,
        token_in: &Address,
        token_out: &Address,
        trade_type: TradeType,
        bucket: UsdBucket,
    ) -> DeleteOutcome {
        let key = CacheKey::new(chain_id, token_in, token_out, trade_type, bucket);
        self.buckets.remove(&key);
        DeleteOutcome { success: true, message: "deleted".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pool;
    use alloy::primitives::{Address as AlloyAddress, U256};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(AlloyAddress::from(bytes))
    }

    fn route(n: u8) -> Route {
        let a = addr(n);
        Route::new(vec![Pool::V2 { token0: a, token1: addr(n + 1), address: a, reserve0: U256::ZERO, reserve1: U256::ZERO }])
    }

    #[test]
    fn write_then_read_round_trips_the_route() {
        let config = EngineConfig::default();
        let repo = CachedRoutesRepository::new();
        let token_in = addr(100);
        let token_out = addr(101);
        repo.save_cached_routes(&config, &route(1), 1, &token_in, &token_out, TradeType::ExactIn, 50.0);

        let results = repo.get_cached_routes(&config, 1, &token_in, &token_out, TradeType::ExactIn);
        let hit = results.iter().find(|r| r.bucket == UsdBucket::from_notional_usd(50.0)).unwrap();
        assert!(hit.found);
        assert_eq!(hit.routes.len(), 1);
    }

    #[test]
    fn trims_to_max_routes_per_bucket() {
        let config = EngineConfig { max_routes_per_bucket: 2, ..EngineConfig::default() };
        let repo = CachedRoutesRepository::new();
        let token_in = addr(100);
        let token_out = addr(101);
        for n in 0..5u8 {
            repo.save_cached_routes(&config, &route(n), 1, &token_in, &token_out, TradeType::ExactIn, 50.0);
        }
        let key = CacheKey::new(1, &token_in, &token_out, TradeType::ExactIn, UsdBucket::from_notional_usd(50.0));
        let slot = repo.buckets.get(&key).unwrap();
        assert_eq!(slot.lock().len(), 2);
    }

    #[test]
    fn delete_then_get_reports_not_found_for_that_bucket() {
        let config = EngineConfig::default();
        let repo = CachedRoutesRepository::new();
        let token_in = addr(100);
        let token_out = addr(101);
        let bucket = UsdBucket::from_notional_usd(50.0);
        repo.save_cached_routes(&config, &route(1), 1, &token_in, &token_out, TradeType::ExactIn, 50.0);
        let outcome = repo.delete_cached_routes(1, &token_in, &token_out, TradeType::ExactIn, bucket);
        assert!(outcome.success);

        let results = repo.get_cached_routes(&config, 1, &token_in, &token_out, TradeType::ExactIn);
        let entry = results.iter().find(|r| r.bucket == bucket).unwrap();
        assert!(!entry.found);
    }

    #[test]
    fn fake_bridge_route_is_never_persisted() {
        let config = EngineConfig::default();
        let repo = CachedRoutesRepository::new();
        let token_in = addr(100);
        let token_out = addr(101);
        let fake = Pool::V4 {
            token0: addr(1),
            token1: addr(2),
            fee: 0,
            tick_spacing: 0,
            hooks: Address::zero(),
            liquidity: U256::ZERO,
            pool_id: addr(3),
            sqrt_price_x96: U256::ZERO,
            tick_current: 0,
        };
        repo.save_cached_routes(&config, &Route::new(vec![fake]), 1, &token_in, &token_out, TradeType::ExactIn, 50.0);
        let results = repo.get_cached_routes(&config, 1, &token_in, &token_out, TradeType::ExactIn);
        assert!(results.iter().all(|r| !r.found));
    }
}
