//! Tagged pool variants and the V4 fake-pool sentinel.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use super::address::Address;

/// V4-only hook-inclusion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HooksOptions {
    #[default]
    HooksInclusive,
    NoHooks,
    HooksOnly,
}

impl HooksOptions {
    /// `HOOKS_INCLUSIVE` is the only setting under which the tokens-cache
    /// is consulted for pool discovery.
    pub fn skip_pools_for_tokens_cache(self) -> bool {
        !matches!(self, HooksOptions::HooksInclusive)
    }
}

/// The protocol a pool (or a route spanning multiple pools) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    V2,
    V3,
    V4,
    Mixed,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Protocol::V2 => "v2",
            Protocol::V3 => "v3",
            Protocol::V4 => "v4",
            Protocol::Mixed => "mixed",
        };
        write!(f, "{s}")
    }
}

/// A liquidity pool, tagged by protocol variant. Pool identity is
/// `(protocol, address-or-pool_id)`; `token0 < token1` ordering is never
/// assumed - it mirrors whatever the upstream indexer produced.
#[derive(Debug, Clone)]
pub enum Pool {
    V2 {
        token0: Address,
        token1: Address,
        address: Address,
        reserve0: U256,
        reserve1: U256,
    },
    V3 {
        token0: Address,
        token1: Address,
        fee: u32,
        address: Address,
        liquidity: U256,
        sqrt_price_x96: U256,
        tick_current: i32,
    },
    V4 {
        token0: Address,
        token1: Address,
        fee: u32,
        tick_spacing: i32,
        hooks: Address,
        liquidity: U256,
        pool_id: Address,
        sqrt_price_x96: U256,
        tick_current: i32,
    },
}

impl Pool {
    pub fn protocol(&self) -> Protocol {
        match self {
            Pool::V2 { .. } => Protocol::V2,
            Pool::V3 { .. } => Protocol::V3,
            Pool::V4 { .. } => Protocol::V4,
        }
    }

    /// Identity key: `(protocol, address-or-pool_id)`.
    pub fn identity(&self) -> (Protocol, String) {
        match self {
            Pool::V2 { address, .. } | Pool::V3 { address, .. } => (self.protocol(), address.lowercased()),
            Pool::V4 { pool_id, .. } => (self.protocol(), pool_id.lowercased()),
        }
    }

    pub fn address(&self) -> Address {
        match self {
            Pool::V2 { address, .. } | Pool::V3 { address, .. } => *address,
            Pool::V4 { pool_id, .. } => *pool_id,
        }
    }

    pub fn token0(&self) -> Address {
        match self {
            Pool::V2 { token0, .. } | Pool::V3 { token0, .. } | Pool::V4 { token0, .. } => *token0,
        }
    }

    pub fn token1(&self) -> Address {
        match self {
            Pool::V2 { token1, .. } | Pool::V3 { token1, .. } | Pool::V4 { token1, .. } => *token1,
        }
    }

    /// The internal ETH<->WETH bridging pseudo-pool the router injects to
    /// make native-currency routes work. Marked by `tick_spacing == 0`
    /// on a V4 entry and MUST NOT reach a response, nor be persisted to the
    /// cache.
    pub fn is_fake_v4_bridge(&self) -> bool {
        matches!(self, Pool::V4 { tick_spacing: 0, .. })
    }
}

/// Infer the route-level protocol tag from an ordered pool path: `Mixed`
/// when the path spans more than one protocol, otherwise that protocol.
pub fn infer_route_protocol(pools: &[Pool]) -> Protocol {
    let mut iter = pools.iter().map(Pool::protocol);
    let Some(first) = iter.next() else {
        return Protocol::Mixed;
    };
    if iter.all(|p| p == first) {
        first
    } else {
        Protocol::Mixed
    }
}
