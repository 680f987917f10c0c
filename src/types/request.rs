//! Request surface.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::pool::HooksOptions;
use super::quote::TradeType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteType {
    /// Served from the cache when the caching policy matrix allows it.
    Fast,
    /// Always bypasses the cache.
    Fresh,
}

/// `SYNC` serves user-facing requests; `ASYNC` is a background warmer that
/// may update the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LambdaType {
    Sync,
    Async,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtocolTag {
    V2,
    V3,
    V4,
    Mixed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub token_in_address: Address,
    pub token_in_chain_id: u64,
    pub token_out_address: Address,
    pub token_out_chain_id: u64,
    pub amount: U256,
    pub trade_type: TradeType,
    pub quote_type: QuoteType,
    pub lambda_type: LambdaType,
    pub protocols: Vec<ProtocolTag>,
    pub slippage_tolerance: Option<f64>,
    pub recipient: Option<Address>,
    pub simulate_from_address: Option<Address>,
    pub deadline: Option<u64>,
    pub portion_bips: Option<u32>,
    pub portion_recipient: Option<Address>,
    pub hooks_options: HooksOptions,
}

impl QuoteRequest {
    pub fn simulation_requested(&self) -> bool {
        self.simulate_from_address.is_some() && self.recipient.is_some() && self.slippage_tolerance.is_some()
    }

    pub fn has_portion(&self) -> bool {
        self.portion_bips.is_some() && self.portion_recipient.is_some()
    }
}
