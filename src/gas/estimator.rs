//! `GasEstimateProvider` collaborator and the core-side step
//! that attaches its output to a batch of quotes.

use alloy::primitives::U256;
#[cfg(test)]
use mockall::automock;

use crate::error::EngineError;
use crate::types::{GasDetails, QuoteBasic, TokensInfo, TradeType};

/// L1 gas data needed on rollups that charge an L1 calldata surcharge
/// (e.g. Arbitrum), threaded through from the chain-specific caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct L2GasData {
    pub l1_gas_used: u64,
    pub l1_base_fee_wei: U256,
}

/// External gas-price/estimation collaborator. The
/// implementation (RPC calls, gas oracles) is out of scope; the core only
/// calls these two operations.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait GasEstimateProvider: Send + Sync {
    async fn current_gas_price(&self, chain_id: u64) -> Result<u64, EngineError>;

    #[allow(clippy::too_many_arguments)]
    async fn estimate_gas(
        &self,
        chain_id: u64,
        tokens_info: &TokensInfo,
        amount: U256,
        trade_type: TradeType,
        quote: &QuoteBasic,
        gas_price_wei: Option<u64>,
        l2_data: Option<L2GasData>,
    ) -> Result<GasDetails, EngineError>;
}

/// Attach a `GasDetails` to every quote in `quotes`. Estimates are fanned
/// out concurrently (one in-flight call per quote) and all awaited before
/// the next pipeline stage runs, per the engine's fan-out-inside-a-stage
/// concurrency model. A single failed estimate does not fail the batch:
/// gas estimation failures degrade gracefully and the affected quote keeps
/// `gas_details = None`, letting the selector fall back to raw amounts.
pub async fn attach_gas_estimates(
    provider: &dyn GasEstimateProvider,
    chain_id: u64,
    tokens_info: &TokensInfo,
    amount: U256,
    trade_type: TradeType,
    quotes: Vec<QuoteBasic>,
    l2_data: Option<L2GasData>,
) -> Vec<QuoteBasic> {
    let gas_price = provider.current_gas_price(chain_id).await.ok();
    let estimates = futures::future::join_all(quotes.into_iter().map(|mut quote| async move {
        match provider
            .estimate_gas(chain_id, tokens_info, amount, trade_type, &quote, gas_price, l2_data)
            .await
        {
            Ok(details) => quote.gas_details = Some(details),
            Err(_) => quote.gas_details = None,
        }
        quote
    }))
    .await;
    estimates
}
