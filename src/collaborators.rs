//! External collaborator interfaces. Implementations are out
//! of scope; the orchestrator only calls these operations. Each trait is
//! `#[cfg_attr(test, automock)]` so the orchestrator can be exercised
//! against hand-wired test doubles without a network.

use std::collections::HashMap;
use std::time::Duration;

use alloy::primitives::U256;
#[cfg(test)]
use mockall::automock;

use crate::error::EngineError;
use crate::types::{Address, CurrencyInfo, Pool, Route, Token, TokensInfo, TradeType};

#[derive(Debug, Clone)]
pub struct Chain {
    pub id: u64,
    pub name: String,
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ChainRepository: Send + Sync {
    async fn get_chain(&self, chain_id: u64) -> Result<Chain, EngineError>;
}

/// Either a resolved ERC-20 `Token` or native-currency `CurrencyInfo`.
#[derive(Debug, Clone)]
pub enum TokenOrCurrency {
    Token(Token),
    Currency(CurrencyInfo),
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn search_for_token(&self, chain_id: u64, address: &Address) -> Result<TokenOrCurrency, EngineError>;
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TokenHandler: Send + Sync {
    async fn get_token(&self, chain_id: u64, address: &Address) -> Result<Option<Token>, EngineError>;
    async fn get_tokens(&self, chain_id: u64, addresses: &[Address]) -> Result<HashMap<Address, Option<Token>>, EngineError>;
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RoutesRepository: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn get_routes(
        &self,
        chain_id: u64,
        token_in: &Address,
        token_out: &Address,
        protocols: &[crate::types::ProtocolTag],
        trade_type: TradeType,
        skip_pools_for_tokens_cache: bool,
    ) -> Result<Vec<Route>, EngineError>;

    async fn fetch_routes_for_tokens(&self, chain_id: u64, tokens: &[Address]) -> Result<Vec<Route>, EngineError>;
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait QuoteFetcher: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn fetch_quotes(
        &self,
        chain_id: u64,
        tokens_info: &TokensInfo,
        amount: U256,
        routes: &[Route],
        trade_type: TradeType,
    ) -> Result<Vec<crate::types::QuoteBasic>, EngineError>;
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FreshPoolDetailsWrapper: Send + Sync {
    async fn get_pool_details_for_route(&self, chain_id: u64, route: &Route) -> Result<HashMap<String, Pool>, EngineError>;
    async fn get_pools_details(&self, chain_id: u64, pools: &[Pool]) -> Result<HashMap<String, Pool>, EngineError>;
}

/// Sink for counters and timers.
pub trait Metrics: Send + Sync {
    fn count(&self, name: &str, value: u64);
    fn timer(&self, name: &str, elapsed: Duration);
}

/// A no-op metrics sink, used when the host application has nothing wired
/// up yet; every call is a structured `tracing` event instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl Metrics for TracingMetrics {
    fn count(&self, name: &str, value: u64) {
        tracing::debug!(metric = name, value, "count");
    }

    fn timer(&self, name: &str, elapsed: Duration) {
        tracing::debug!(metric = name, elapsed_ms = elapsed.as_millis() as u64, "timer");
    }
}

/// Per-request context: logging happens directly
/// through `tracing` spans created by the orchestrator, so this only needs
/// to carry the metrics sink.
pub struct RequestContext {
    pub metrics: std::sync::Arc<dyn Metrics>,
}

impl RequestContext {
    pub fn new(metrics: std::sync::Arc<dyn Metrics>) -> Self {
        Self { metrics }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self { metrics: std::sync::Arc::new(TracingMetrics) }
    }
}
