//! Route model: an ordered pool path tagged with protocol and percentage.

use super::pool::{infer_route_protocol, Pool, Protocol};

/// An ordered sequence of pools connecting input to output, tagged with a
/// target percentage of the total trade (`1..=100`, default `100`).
#[derive(Debug, Clone)]
pub struct Route {
    pub protocol: Protocol,
    pub path: Vec<Pool>,
    pub percentage: u8,
}

impl Route {
    /// Build a route, inferring `protocol` from the pool path: `Mixed`
    /// when pools span more than one protocol, otherwise that protocol.
    /// `percentage` defaults to 100.
    pub fn new(path: Vec<Pool>) -> Self {
        let protocol = infer_route_protocol(&path);
        Self { protocol, path, percentage: 100 }
    }

    pub fn with_percentage(mut self, percentage: u8) -> Self {
        self.percentage = percentage;
        self
    }

    /// Ordered pool-address sequence, used to match routes across the
    /// allocator's expansion/stitching.
    pub fn pool_address_sequence(&self) -> Vec<String> {
        self.path.iter().map(|p| p.address().lowercased()).collect()
    }

    /// A route shape is the same route at a different percentage: same
    /// protocol, same ordered pool-address sequence.
    pub fn same_shape(&self, other: &Route) -> bool {
        self.protocol == other.protocol && self.pool_address_sequence() == other.pool_address_sequence()
    }

    pub fn hop_count(&self) -> usize {
        self.path.len()
    }

    /// Strip the internal ETH<->WETH bridging pseudo-pool
    /// before this route's pools reach a response. Order is preserved.
    pub fn without_fake_bridge_pools(&self) -> Vec<&Pool> {
        self.path.iter().filter(|p| !p.is_fake_v4_bridge()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::address::Address;
    use alloy::primitives::U256;

    fn pool(n: u8) -> Pool {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        let addr = Address::new(alloy::primitives::Address::from(bytes));
        Pool::V2 { token0: addr, token1: addr, address: addr, reserve0: U256::ZERO, reserve1: U256::ZERO }
    }

    #[test]
    fn same_shape_ignores_percentage() {
        let a = Route::new(vec![pool(1), pool(2)]).with_percentage(60);
        let b = Route::new(vec![pool(1), pool(2)]).with_percentage(40);
        assert!(a.same_shape(&b));
    }

    #[test]
    fn different_path_is_not_same_shape() {
        let a = Route::new(vec![pool(1)]);
        let b = Route::new(vec![pool(2)]);
        assert!(!a.same_shape(&b));
    }
}
