//! `GasConverter` collaborator: converts wei gas costs into
//! quote-token units via reference pools.

use alloy::primitives::U256;
#[cfg(test)]
use mockall::automock;

use crate::error::EngineError;
use crate::types::{Address, QuoteBasic, TokensInfo};

/// Opaque reference-pool set prefetched once per request and reused across
/// every quote's conversion.
#[derive(Debug, Clone, Default)]
pub struct GasPools {
    pub reference_pool_addresses: Vec<Address>,
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait GasConverter: Send + Sync {
    async fn prefetch_gas_pools(&self, chain_id: u64, quote_token: &Address) -> Result<GasPools, EngineError>;

    /// Mutates each quote's `gas_details.gas_cost_in_quote_token` in place.
    async fn update_quotes_gas_details(
        &self,
        chain_id: u64,
        quote_token: &Address,
        tokens_info: &TokensInfo,
        quotes: &mut [QuoteBasic],
        prefetched: Option<&GasPools>,
    ) -> Result<(), EngineError>;
}

/// Drive a full conversion pass: prefetch reference pools once, then
/// convert every quote's wei gas cost into `quote_token` units. A
/// conversion failure degrades gracefully: the affected
/// quotes simply keep `gas_cost_in_quote_token = None`, which the selector
/// treats as zero.
pub async fn convert_gas_costs(
    converter: &dyn GasConverter,
    chain_id: u64,
    quote_token: &Address,
    tokens_info: &TokensInfo,
    quotes: &mut [QuoteBasic],
) {
    let prefetched = converter.prefetch_gas_pools(chain_id, quote_token).await.ok();
    if converter
        .update_quotes_gas_details(chain_id, quote_token, tokens_info, quotes, prefetched.as_ref())
        .await
        .is_err()
    {
        for quote in quotes.iter_mut() {
            if let Some(details) = quote.gas_details.as_mut() {
                details.gas_cost_in_quote_token = None;
            }
        }
    }
}

pub fn total_wei_to_quote_token_ratio(gas_cost_wei: U256, gas_cost_in_quote_token: U256) -> Option<f64> {
    if gas_cost_wei.is_zero() {
        return None;
    }
    Some(gas_cost_in_quote_token.to_string().parse::<f64>().ok()? / gas_cost_wei.to_string().parse::<f64>().ok()?)
}
