//! Route encoding for the cached-routes repository.
//!
//! Encoding carries the protocol tag, ordered pool addresses, and the
//! minimal per-pool state needed to reconstruct routing (fee/tick-spacing
//! for V3/V4). Fake-tick-spacing V4 entries (the ETH<->WETH bridge) must
//! never be written, matching the response-side filtering.

use crate::types::{Address, Pool, Protocol, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPool {
    pub protocol: Protocol,
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: Option<u32>,
    pub tick_spacing: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRoute {
    pub protocol: Protocol,
    pub pools: Vec<EncodedPool>,
}

/// Encode `route` for storage. Returns `None` if the route contains a
/// fake-tick-spacing V4 bridge pool - those must never be persisted.
pub fn encode_route(route: &Route) -> Option<EncodedRoute> {
    if route.path.iter().any(Pool::is_fake_v4_bridge) {
        return None;
    }
    let pools = route
        .path
        .iter()
        .map(|pool| EncodedPool {
            protocol: pool.protocol(),
            address: pool.address(),
            token0: pool.token0(),
            token1: pool.token1(),
            fee: match pool {
                Pool::V3 { fee, .. } | Pool::V4 { fee, .. } => Some(*fee),
                Pool::V2 { .. } => None,
            },
            tick_spacing: match pool {
                Pool::V4 { tick_spacing, .. } => Some(*tick_spacing),
                _ => None,
            },
        })
        .collect();
    Some(EncodedRoute { protocol: route.protocol, pools })
}

/// Decode an `EncodedRoute` back into pool shells sufficient to reconstruct
/// routing. Reserves/liquidity are not part of the encoding; they're refreshed downstream via
/// `getPoolDetailsForRoute` before the route is used.
pub fn decode_route(encoded: &EncodedRoute) -> Route {
    use alloy::primitives::U256;
    let path = encoded
        .pools
        .iter()
        .map(|p| match p.protocol {
            Protocol::V2 => Pool::V2 {
                token0: p.token0,
                token1: p.token1,
                address: p.address,
                reserve0: U256::ZERO,
                reserve1: U256::ZERO,
            },
            Protocol::V3 => Pool::V3 {
                token0: p.token0,
                token1: p.token1,
                fee: p.fee.unwrap_or_default(),
                address: p.address,
                liquidity: U256::ZERO,
                sqrt_price_x96: U256::ZERO,
                tick_current: 0,
            },
            Protocol::V4 | Protocol::Mixed => Pool::V4 {
                token0: p.token0,
                token1: p.token1,
                fee: p.fee.unwrap_or_default(),
                tick_spacing: p.tick_spacing.unwrap_or_default(),
                hooks: Address::zero(),
                liquidity: U256::ZERO,
                pool_id: p.address,
                sqrt_price_x96: U256::ZERO,
                tick_current: 0,
            },
        })
        .collect();
    Route::new(path)
}
