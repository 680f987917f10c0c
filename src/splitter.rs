//! Best-split finder: searches combinations of
//! percentage-tagged routes summing to 100% under a time budget and branch
//! cap, preferring fewer-route splits and never repeating a pool address
//! within a combination.

use std::time::{Duration, Instant};

use alloy::primitives::U256;

use crate::allocator::Combination;
use crate::config::EngineConfig;
use crate::types::{QuoteBasic, Route, TradeType};

/// Per-percentage-bucket quotes, pre-sorted best-first for `trade_type`
/// (descending for EXACT_IN, ascending for EXACT_OUT), and truncated to
/// `MaxSplitRoutes` branch cap.
fn bucket_by_percentage(
    quotes: &[QuoteBasic],
    trade_type: TradeType,
    branch_cap: usize,
) -> std::collections::BTreeMap<u8, Vec<QuoteBasic>> {
    let mut buckets: std::collections::BTreeMap<u8, Vec<QuoteBasic>> = std::collections::BTreeMap::new();
    for quote in quotes {
        buckets.entry(quote.route.percentage).or_default().push(quote.clone());
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by(|a, b| match trade_type {
            TradeType::ExactIn => b.amount.cmp(&a.amount),
            TradeType::ExactOut => a.amount.cmp(&b.amount),
        });
        bucket.truncate(branch_cap);
    }
    buckets
}

fn pool_addresses_of(combo: &[QuoteBasic]) -> std::collections::HashSet<String> {
    combo
        .iter()
        .flat_map(|q| q.route.path.iter().map(|p| p.address().lowercased()))
        .collect()
}

fn has_pool_collision(existing: &std::collections::HashSet<String>, candidate: &QuoteBasic) -> bool {
    candidate.route.path.iter().any(|p| existing.contains(&p.address().lowercased()))
}

struct Search<'a> {
    buckets: &'a std::collections::BTreeMap<u8, Vec<QuoteBasic>>,
    percentages: Vec<u8>,
    max_splits: usize,
    deadline: Instant,
    found: Vec<Vec<QuoteBasic>>,
}

impl<'a> Search<'a> {
    fn run(&mut self, remaining: u32, combo: &mut Vec<QuoteBasic>, used_pools: &mut std::collections::HashSet<String>) {
        if Instant::now() >= self.deadline {
            return;
        }
        if remaining == 0 {
            self.found.push(combo.clone());
            return;
        }
        if combo.len() >= self.max_splits {
            return;
        }
        for &pct in &self.percentages {
            if pct as u32 > remaining {
                continue;
            }
            let Some(bucket) = self.buckets.get(&pct) else { continue };
            for candidate in bucket {
                if Instant::now() >= self.deadline {
                    return;
                }
                if has_pool_collision(used_pools, candidate) {
                    continue;
                }
                combo.push(candidate.clone());
                let inserted: Vec<String> =
                    candidate.route.path.iter().map(|p| p.address().lowercased()).collect();
                for addr in &inserted {
                    used_pools.insert(addr.clone());
                }

                self.run(remaining - pct as u32, combo, used_pools);

                for addr in &inserted {
                    used_pools.remove(addr);
                }
                combo.pop();
            }
        }
    }
}

/// Find combinations of percentage-tagged routes summing to exactly 100%,
/// using at most `config.max_splits` routes, within `config.
/// route_split_timeout_ms` and `config.max_split_routes` branch cap per
/// percentage bucket. Returns the combinations found so far when the time
/// budget elapses; prefers fewer-route
/// combinations by searching single-route matches to completion first via
/// ascending `combo.len()` pruning order within the recursion itself.
///
/// The search itself walks pre-sorted, pre-quoted buckets (so amount
/// ordering and pool-collision checks have real numbers to work with), but
/// the result is handed back as route-only `Combination`s - callers stitch
/// them against the quote list via `crate::allocator::stitch_all` per
/// spec.md §4.3, the same contract the allocator's expansion stage uses.
pub fn find_combinations(config: &EngineConfig, quotes: &[QuoteBasic], trade_type: TradeType) -> Vec<Combination> {
    let buckets = bucket_by_percentage(quotes, trade_type, config.max_split_routes);
    let percentages: Vec<u8> = buckets.keys().copied().rev().collect();
    let deadline = Instant::now() + Duration::from_millis(config.route_split_timeout_ms);

    let mut search = Search { buckets: &buckets, percentages, max_splits: config.max_splits, deadline, found: Vec::new() };
    let mut combo = Vec::new();
    let mut used_pools = std::collections::HashSet::new();
    search.run(100, &mut combo, &mut used_pools);

    search.found.sort_by_key(|c| c.len());
    search.found.into_iter().map(|c| c.iter().map(|q| q.route.clone()).collect::<Vec<Route>>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Pool, Route};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(alloy::primitives::Address::from(bytes))
    }

    fn pool(n: u8) -> Pool {
        let a = addr(n);
        Pool::V2 { token0: a, token1: a, address: a, reserve0: U256::ZERO, reserve1: U256::ZERO }
    }

    fn quote(pool_id: u8, pct: u8, amount: u64) -> QuoteBasic {
        let route = Route::new(vec![pool(pool_id)]).with_percentage(pct);
        QuoteBasic::new(route, U256::from(amount))
    }

    #[test]
    fn finds_single_route_full_combination() {
        let config = EngineConfig::default();
        let quotes = vec![quote(1, 100, 1_000)];
        let combos = find_combinations(&config, &quotes, TradeType::ExactIn);
        assert!(combos.iter().any(|c| c.len() == 1));
    }

    #[test]
    fn finds_two_route_split_summing_to_100() {
        let config = EngineConfig { percentage_step: 50, ..EngineConfig::default() };
        let quotes = vec![quote(1, 50, 500), quote(2, 50, 500)];
        let combos = find_combinations(&config, &quotes, TradeType::ExactIn);
        assert!(combos.iter().any(|c| c.len() == 2));
        for combo in &combos {
            let sum: u32 = combo.iter().map(|r| r.percentage as u32).sum();
            assert_eq!(sum, 100);
        }
    }

    #[test]
    fn never_reuses_a_pool_address_within_a_combination() {
        let config = EngineConfig { percentage_step: 50, ..EngineConfig::default() };
        // Same pool at two percentages - must never combine with itself.
        let quotes = vec![quote(1, 50, 500), quote(1, 50, 500)];
        let combos = find_combinations(&config, &quotes, TradeType::ExactIn);
        for combo in &combos {
            if combo.len() > 1 {
                let mut seen = std::collections::HashSet::new();
                for r in combo {
                    for p in &r.path {
                        assert!(seen.insert(p.address().lowercased()));
                    }
                }
            }
        }
    }

    #[test]
    fn stitches_back_to_real_quotes_via_allocator() {
        let config = EngineConfig { percentage_step: 50, ..EngineConfig::default() };
        let quotes = vec![quote(1, 50, 500), quote(2, 50, 500)];
        let combos = find_combinations(&config, &quotes, TradeType::ExactIn);
        let stitched = crate::allocator::stitch_all(&combos, &quotes);
        assert!(stitched.iter().any(|s| s.len() == 2));
        for split in &stitched {
            let sum: u32 = split.iter().map(|q| q.route.percentage as u32).sum();
            assert_eq!(sum, 100);
        }
    }

    #[test]
    fn prefers_fewer_route_splits_first_in_output_order() {
        let config = EngineConfig { percentage_step: 50, ..EngineConfig::default() };
        let quotes = vec![quote(1, 100, 1_000), quote(2, 50, 500), quote(3, 50, 500)];
        let combos = find_combinations(&config, &quotes, TradeType::ExactIn);
        assert_eq!(combos[0].len(), 1);
    }
}
