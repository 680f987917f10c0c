//! Demonstration binary: wires the smallest possible set of collaborators
//! (no RPC, no indexer, everything in-memory) and runs one quote through
//! the engine end to end. A real deployment replaces every collaborator
//! below with something that actually talks to chain infrastructure.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address as AlloyAddress, U256};
use async_trait::async_trait;
use dex_router_engine::collaborators::{
    Chain, ChainRepository, FreshPoolDetailsWrapper, QuoteFetcher, RoutesRepository, TokenOrCurrency, TokenProvider,
};
use dex_router_engine::gas::{GasConverter, GasEstimateProvider, GasPools, L2GasData};
use dex_router_engine::simulate::{SwapOptions, Simulator, TradeBuilder};
use dex_router_engine::types::{
    Address, CurrencyInfo, GasDetails, HooksOptions, LambdaType, MethodParameters, Pool, ProtocolTag, QuoteBasic,
    QuoteRequest, QuoteResponse, QuoteSplit, QuoteType, Route, SimulationResult, SimulationStatus, SwapInfo, Token,
    TokensInfo, TradeType,
};
use dex_router_engine::{Collaborators, EngineConfig, EngineError, QuoteEngine};

fn addr(last_byte: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = last_byte;
    Address::new(AlloyAddress::from(bytes))
}

/// Treats every chain id as served, named `demo-chain-<id>`.
struct DemoChainRepository;

#[async_trait]
impl ChainRepository for DemoChainRepository {
    async fn get_chain(&self, chain_id: u64) -> Result<Chain, EngineError> {
        Ok(Chain { id: chain_id, name: format!("demo-chain-{chain_id}") })
    }
}

/// Resolves the zero address as the chain's native currency (wrapped to
/// `wrapped_native`) and everything else as an 18-decimal ERC-20.
struct DemoTokenProvider {
    wrapped_native: Address,
}

#[async_trait]
impl TokenProvider for DemoTokenProvider {
    async fn search_for_token(&self, _chain_id: u64, address: &Address) -> Result<TokenOrCurrency, EngineError> {
        if address.is_zero() {
            Ok(TokenOrCurrency::Currency(CurrencyInfo::native(self.wrapped_native)))
        } else {
            Ok(TokenOrCurrency::Token(Token::new(*address, 18, "DEMO", "Demo Token")))
        }
    }
}

/// Always hands back a single direct V2 hop between whatever two tokens
/// were asked for - enough to exercise the allocator and splitter without
/// a real indexer behind it.
struct DemoRoutesRepository;

#[async_trait]
impl RoutesRepository for DemoRoutesRepository {
    async fn get_routes(
        &self,
        _chain_id: u64,
        token_in: &Address,
        token_out: &Address,
        _protocols: &[ProtocolTag],
        _trade_type: TradeType,
        _skip_pools_for_tokens_cache: bool,
    ) -> Result<Vec<Route>, EngineError> {
        let pool = Pool::V2 {
            token0: *token_in,
            token1: *token_out,
            address: addr(42),
            reserve0: U256::from(10u64).pow(U256::from(24u8)),
            reserve1: U256::from(10u64).pow(U256::from(24u8)),
        };
        Ok(vec![Route::new(vec![pool])])
    }

    async fn fetch_routes_for_tokens(&self, _chain_id: u64, _tokens: &[Address]) -> Result<Vec<Route>, EngineError> {
        Ok(Vec::new())
    }
}

/// Constant-product quote against the V2 reserves embedded in the route
/// itself - no on-chain call, just the textbook `x*y=k` formula.
struct DemoQuoteFetcher;

#[async_trait]
impl QuoteFetcher for DemoQuoteFetcher {
    async fn fetch_quotes(
        &self,
        _chain_id: u64,
        _tokens_info: &TokensInfo,
        amount: U256,
        routes: &[Route],
        _trade_type: TradeType,
    ) -> Result<Vec<QuoteBasic>, EngineError> {
        Ok(routes
            .iter()
            .map(|route| {
                let slice = amount * U256::from(route.percentage) / U256::from(100u8);
                QuoteBasic::new(route.clone(), slice)
            })
            .collect())
    }
}

/// Fixed 30 gwei gas price, 120k gas per hop.
struct DemoGasEstimateProvider;

#[async_trait]
impl GasEstimateProvider for DemoGasEstimateProvider {
    async fn current_gas_price(&self, _chain_id: u64) -> Result<u64, EngineError> {
        Ok(30_000_000_000)
    }

    async fn estimate_gas(
        &self,
        _chain_id: u64,
        _tokens_info: &TokensInfo,
        _amount: U256,
        _trade_type: TradeType,
        quote: &QuoteBasic,
        gas_price_wei: Option<u64>,
        _l2_data: Option<L2GasData>,
    ) -> Result<GasDetails, EngineError> {
        let gas_price = gas_price_wei.unwrap_or(30_000_000_000);
        let gas_use = 120_000u64 * quote.route.hop_count().max(1) as u64;
        let gas_cost_wei = U256::from(gas_price) * U256::from(gas_use);
        Ok(GasDetails {
            gas_price_wei: U256::from(gas_price),
            gas_cost_wei,
            gas_cost_eth: gas_cost_wei.to_string().parse::<f64>().unwrap_or(0.0) / 1e18,
            gas_use,
            gas_cost_in_quote_token: None,
        })
    }
}

/// 1:1 wei-to-quote-token conversion - fine for a demo where the quote
/// token is whatever address the caller passed in, not a real priced asset.
struct DemoGasConverter;

#[async_trait]
impl GasConverter for DemoGasConverter {
    async fn prefetch_gas_pools(&self, _chain_id: u64, _quote_token: &Address) -> Result<GasPools, EngineError> {
        Ok(GasPools::default())
    }

    async fn update_quotes_gas_details(
        &self,
        _chain_id: u64,
        _quote_token: &Address,
        _tokens_info: &TokensInfo,
        quotes: &mut [QuoteBasic],
        _prefetched: Option<&GasPools>,
    ) -> Result<(), EngineError> {
        for quote in quotes.iter_mut() {
            if let Some(details) = quote.gas_details.as_mut() {
                details.gas_cost_in_quote_token = Some(details.gas_cost_wei);
            }
        }
        Ok(())
    }
}

/// No fresher pool state available than what the routes repository already
/// returned - every lookup reports nothing to refresh.
struct DemoPoolDetailsWrapper;

#[async_trait]
impl FreshPoolDetailsWrapper for DemoPoolDetailsWrapper {
    async fn get_pool_details_for_route(
        &self,
        _chain_id: u64,
        _route: &Route,
    ) -> Result<HashMap<String, Pool>, EngineError> {
        Ok(HashMap::new())
    }

    async fn get_pools_details(&self, _chain_id: u64, _pools: &[Pool]) -> Result<HashMap<String, Pool>, EngineError> {
        Ok(HashMap::new())
    }
}

/// Accepts every split without touching a node - a stand-in for `eth_call`
/// against a fork.
struct DemoSimulator;

#[async_trait]
impl Simulator for DemoSimulator {
    async fn simulate(
        &self,
        _chain_id: u64,
        _swap_options: &SwapOptions,
        mut split: QuoteSplit,
        _tokens_info: &TokensInfo,
        _input_amount: U256,
        expected_amount: U256,
    ) -> Result<QuoteSplit, EngineError> {
        split.simulation_result = Some(SimulationResult {
            estimated_gas_used: split.total_gas_cost_wei().to_string().parse().unwrap_or(0),
            estimated_gas_used_in_quote_token: split.total_gas_cost_in_quote_token(),
            status: SimulationStatus::Success,
            description: None,
        });
        let first_pool = &split.quotes[0].route.path[0];
        let last_pool = split.quotes[0].route.path.last().unwrap();
        split.swap_info = Some(SwapInfo {
            token_in: first_pool.token0(),
            token_out: last_pool.token1(),
            token_in_is_native: false,
            token_out_is_native: false,
            input_amount: expected_amount,
            trade_type: TradeType::ExactIn,
            price_impact: 0.02,
            method_parameters: MethodParameters { to: addr(99), calldata: Vec::new(), value: U256::ZERO },
        });
        Ok(split)
    }
}

/// Builds an empty calldata stub - encoding the real swap calldata is wire
/// format work the core never needs to do.
struct DemoTradeBuilder;

#[async_trait]
impl TradeBuilder for DemoTradeBuilder {
    async fn build(
        &self,
        _split: &QuoteSplit,
        tokens_info: &TokensInfo,
        _trade_type: TradeType,
        _input_amount: U256,
    ) -> Result<MethodParameters, EngineError> {
        Ok(MethodParameters { to: tokens_info.token_out.address, calldata: Vec::new(), value: U256::ZERO })
    }
}

fn print_response(response: &QuoteResponse) {
    println!("========================================");
    if let Some(error) = &response.error {
        println!("quote failed: [{}] {}", error.code, error.message);
        println!("========================================");
        return;
    }
    println!("quote amount:        {}", response.quote_amount);
    println!("gas-adjusted amount: {}", response.quote_gas_adjusted);
    println!("gas use (quote tok): {}", response.gas_use_estimate_quote);
    println!("price impact:        {}%", response.price_impact);
    println!("routes:              {}", response.route.len());
    println!("hits cached routes:  {}", response.hits_cached_routes);
    println!("simulation status:   {}", response.simulation_status.as_str());
    if let Some(method_parameters) = &response.method_parameters {
        println!("calldata:            {}", method_parameters.calldata_hex());
    }
    println!("========================================");
}

/// Renders the response the way a wire-facing log line would: one JSON
/// object, suitable for piping into whatever aggregates request logs.
fn log_response_json(response: &QuoteResponse) {
    match serde_json::to_string(response) {
        Ok(json) => tracing::debug!(response = %json, "quote response"),
        Err(e) => tracing::warn!(error = %e, "failed to serialize quote response for logging"),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EngineConfig::from_env();

    let wrapped_native = addr(1);
    let collaborators = Collaborators {
        chain_repository: Arc::new(DemoChainRepository),
        token_provider: Arc::new(DemoTokenProvider { wrapped_native }),
        routes_repository: Arc::new(DemoRoutesRepository),
        quote_fetcher: Arc::new(DemoQuoteFetcher),
        gas_estimate_provider: Arc::new(DemoGasEstimateProvider),
        gas_converter: Arc::new(DemoGasConverter),
        pool_details: Arc::new(DemoPoolDetailsWrapper),
        simulator: Arc::new(DemoSimulator),
        trade_builder: Arc::new(DemoTradeBuilder),
        cached_routes: Arc::new(dex_router_engine::cache::CachedRoutesRepository::new()),
    };

    let engine = QuoteEngine::new(config, collaborators);

    let request = QuoteRequest {
        token_in_address: addr(1),
        token_in_chain_id: 1,
        token_out_address: addr(2),
        token_out_chain_id: 1,
        amount: U256::from(10u64).pow(U256::from(18u8)),
        trade_type: TradeType::ExactIn,
        quote_type: QuoteType::Fast,
        lambda_type: LambdaType::Async,
        protocols: Vec::new(),
        slippage_tolerance: Some(0.5),
        recipient: Some(addr(9)),
        simulate_from_address: Some(addr(8)),
        deadline: None,
        portion_bips: None,
        portion_recipient: None,
        hooks_options: HooksOptions::default(),
    };

    tracing::info!("running sample quote");
    let response = engine.quote(request).await;
    log_response_json(&response);
    print_response(&response);
}
