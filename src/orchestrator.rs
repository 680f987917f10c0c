//! The quote pipeline: wires every stage into one
//! request -> response flow.

use std::sync::Arc;

use alloy::primitives::U256;
use tracing::{info, info_span, warn, Instrument};

use crate::allocator::{expand_routes, stitch_all};
use crate::cache::CachedRoutesRepository;
use crate::collaborators::{
    ChainRepository, FreshPoolDetailsWrapper, QuoteFetcher, RequestContext, RoutesRepository, TokenOrCurrency,
    TokenProvider,
};
use crate::config::{EngineConfig, UsdBucket};
use crate::error::EngineError;
use crate::gas::{attach_gas_estimates, convert_gas_costs, GasConverter, GasEstimateProvider, L2GasData};
use crate::response_builder::build_response;
use crate::selector::select_best;
use crate::simulate::{run_simulation_loop, SwapOptions, Simulator, TradeBuilder};
use crate::splitter::find_combinations;
use crate::types::{
    Address, CurrencyInfo, LambdaType, QuoteRequest, QuoteResponse, QuoteType, Route, TokensInfo, TradeType,
};
use crate::validation::validate;

/// Collaborator bundle. Each member is injected by the host
/// application; the core never constructs one itself.
pub struct Collaborators {
    pub chain_repository: Arc<dyn ChainRepository>,
    pub token_provider: Arc<dyn TokenProvider>,
    pub routes_repository: Arc<dyn RoutesRepository>,
    pub quote_fetcher: Arc<dyn QuoteFetcher>,
    pub gas_estimate_provider: Arc<dyn GasEstimateProvider>,
    pub gas_converter: Arc<dyn GasConverter>,
    pub pool_details: Arc<dyn FreshPoolDetailsWrapper>,
    pub simulator: Arc<dyn Simulator>,
    pub trade_builder: Arc<dyn TradeBuilder>,
    pub cached_routes: Arc<CachedRoutesRepository>,
}

pub struct QuoteEngine {
    pub config: EngineConfig,
    pub collaborators: Collaborators,
}

impl QuoteEngine {
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        Self { config, collaborators }
    }

    /// `quote(request) -> response`.
    pub async fn quote(&self, request: QuoteRequest) -> QuoteResponse {
        let span = info_span!("quote", chain_id = request.token_in_chain_id, trade_type = ?request.trade_type);
        self.quote_inner(request).instrument(span).await
    }

    async fn quote_inner(&self, request: QuoteRequest) -> QuoteResponse {
        let ctx = RequestContext::default();

        // Resolving currencies runs ahead of the validator so the
        // wrapped-collision rule has the data it needs.
        let currency_in = match self.resolve_currency(request.token_in_chain_id, &request.token_in_address).await {
            Ok(c) => c,
            Err(e) => return QuoteResponse::error_only(e.to_response_error()),
        };
        let currency_out = match self.resolve_currency(request.token_out_chain_id, &request.token_out_address).await {
            Ok(c) => c,
            Err(e) => return QuoteResponse::error_only(e.to_response_error()),
        };

        if currency_in.wrapped_address == currency_out.wrapped_address {
            return QuoteResponse::error_only(EngineError::WrappedCurrencyCollision.to_response_error());
        }

        // Step 1: validate.
        if let Err(e) = validate(&self.config, &request, &currency_in.wrapped_address, &currency_out.wrapped_address) {
            return QuoteResponse::error_only(e.to_response_error());
        }

        // Step 3: fetch candidate routes.
        let skip_pools_for_tokens_cache = request.hooks_options.skip_pools_for_tokens_cache();
        let mut routes = match self
            .collaborators
            .routes_repository
            .get_routes(
                request.token_in_chain_id,
                &request.token_in_address,
                &request.token_out_address,
                &request.protocols,
                request.trade_type,
                skip_pools_for_tokens_cache,
            )
            .await
        {
            Ok(routes) => routes,
            Err(e) => return QuoteResponse::error_only(e.to_response_error()),
        };

        // Step 4: cache read, gated by the caching policy matrix.
        let mut hits_cached_routes = false;
        if self.cache_read_permitted(&request) {
            let notional_usd = Self::estimate_notional_usd(&request);
            let bucket = UsdBucket::from_notional_usd(notional_usd);
            let cached = self.collaborators.cached_routes.get_cached_routes(
                &self.config,
                request.token_in_chain_id,
                &currency_in.wrapped_address,
                &currency_out.wrapped_address,
                request.trade_type,
            );
            for bucket_result in cached {
                if bucket_result.bucket == bucket && bucket_result.found {
                    hits_cached_routes = true;
                    routes.extend(bucket_result.routes);
                }
            }
        }

        // Step 5: strategy (route-percentage expansion, quote fetch, gas,
        // split search, stitch, rank).
        let ranked = match self.find_best_candidates(&request, &routes, &currency_in, &currency_out).await {
            Ok(ranked) => ranked,
            Err(e) => return QuoteResponse::error_only(e.to_response_error()),
        };

        // Step 6: no candidates -> 404.
        if ranked.is_empty() {
            return QuoteResponse::error_only(EngineError::NoValidQuotes.to_response_error());
        }

        // Step 7: pool refresh - replace pool fields with freshly fetched
        // reserves/liquidity where the wrapper has them.
        let ranked = self.refresh_pool_details(request.token_in_chain_id, ranked).await;

        let tokens_info = TokensInfo {
            token_in: crate::types::Token::unresolved(request.token_in_address),
            token_out: crate::types::Token::unresolved(request.token_out_address),
        };

        // Step 9: simulation loop, only when requested and enabled.
        let (winning_split, method_parameters) = if self.config.simulation.enabled && request.simulation_requested() {
            let swap_options = SwapOptions {
                recipient: request.recipient.unwrap(),
                slippage_tolerance: request.slippage_tolerance.unwrap(),
                simulate_from_address: request.simulate_from_address.unwrap(),
                deadline: request.deadline,
            };
            let expected_amount = ranked[0].total_amount();
            match run_simulation_loop(
                self.collaborators.simulator.as_ref(),
                self.collaborators.trade_builder.as_ref(),
                request.token_in_chain_id,
                &swap_options,
                ranked,
                &tokens_info,
                request.trade_type,
                request.amount,
                expected_amount,
                &ctx,
            )
            .await
            {
                Some(outcome) => (outcome.split, outcome.method_parameters),
                None => return QuoteResponse::error_only(EngineError::NoValidQuotes.to_response_error()),
            }
        } else {
            (ranked.into_iter().next().unwrap(), None)
        };

        let (portion_amount, portion_amount_decimals) = if request.has_portion() {
            let (_, portion) = crate::portion::apply_portion(
                request.trade_type,
                winning_split.total_amount(),
                request.amount,
                request.portion_bips.unwrap(),
            );
            (Some(portion), Some(18u8))
        } else {
            (None, None)
        };

        let response = build_response(
            &winning_split,
            request.trade_type,
            request.amount,
            request.portion_bips,
            request.portion_recipient,
            portion_amount,
            portion_amount_decimals,
            method_parameters,
            hits_cached_routes,
        );

        // Step 11: async cache write, gated by the caching policy matrix.
        if self.cache_write_permitted(&request) {
            self.write_cache(&request, &winning_split, &currency_in, &currency_out).await;
        }

        response
    }

    async fn resolve_currency(&self, chain_id: u64, address: &Address) -> Result<CurrencyInfo, EngineError> {
        match self.collaborators.token_provider.search_for_token(chain_id, address).await {
            Ok(TokenOrCurrency::Currency(info)) => Ok(info),
            Ok(TokenOrCurrency::Token(token)) => Ok(CurrencyInfo::wrapped(token.address)),
            Err(e) => Err(e),
        }
    }

    fn cache_read_permitted(&self, request: &QuoteRequest) -> bool {
        matches!(
            (request.lambda_type, request.quote_type),
            (LambdaType::Async, QuoteType::Fast)
        )
    }

    fn cache_write_permitted(&self, request: &QuoteRequest) -> bool {
        self.cache_read_permitted(request)
    }

    /// Placeholder USD-notional estimate pending a real pricing collaborator:
    /// treats the raw amount as already being in a comparable order of
    /// magnitude. The real computation needs a token-price source, which
    /// is out of scope here.
    fn estimate_notional_usd(request: &QuoteRequest) -> f64 {
        let scaled = request.amount / U256::from(10u64.pow(15));
        scaled.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Replace each route's pool fields with freshly fetched state where
    /// the wrapper has it; pools it doesn't know about are left untouched
    /// rather than treated as an error. One lookup per quote is fanned out
    /// concurrently across the whole candidate set before any split moves
    /// on to the next stage.
    async fn refresh_pool_details(
        &self,
        chain_id: u64,
        splits: Vec<crate::types::QuoteSplit>,
    ) -> Vec<crate::types::QuoteSplit> {
        futures::future::join_all(splits.into_iter().map(|mut split| async move {
            let refreshed = futures::future::join_all(split.quotes.into_iter().map(|mut quote| async move {
                if let Ok(details) = self.collaborators.pool_details.get_pool_details_for_route(chain_id, &quote.route).await {
                    for pool in quote.route.path.iter_mut() {
                        if let Some(fresh) = details.get(&pool.address().lowercased()) {
                            *pool = fresh.clone();
                        }
                    }
                }
                quote
            }))
            .await;
            split.quotes = refreshed;
            split
        }))
        .await
    }

    async fn find_best_candidates(
        &self,
        request: &QuoteRequest,
        routes: &[Route],
        currency_in: &CurrencyInfo,
        currency_out: &CurrencyInfo,
    ) -> Result<Vec<crate::types::QuoteSplit>, EngineError> {
        let tokens_info = TokensInfo {
            token_in: crate::types::Token::unresolved(currency_in.wrapped_address),
            token_out: crate::types::Token::unresolved(currency_out.wrapped_address),
        };

        let expanded = expand_routes(&self.config, routes);
        if expanded.is_empty() {
            return Ok(Vec::new());
        }

        let quotes = self
            .collaborators
            .quote_fetcher
            .fetch_quotes(request.token_in_chain_id, &tokens_info, request.amount, &expanded, request.trade_type)
            .await?;

        let l2_data = self.l2_gas_data(request.token_in_chain_id).await;
        let mut quotes = attach_gas_estimates(
            self.collaborators.gas_estimate_provider.as_ref(),
            request.token_in_chain_id,
            &tokens_info,
            request.amount,
            request.trade_type,
            quotes,
            l2_data,
        )
        .await;

        convert_gas_costs(
            self.collaborators.gas_converter.as_ref(),
            request.token_in_chain_id,
            &currency_out.wrapped_address,
            &tokens_info,
            &mut quotes,
        )
        .await;

        let combinations = find_combinations(&self.config, &quotes, request.trade_type);
        let splits: Vec<crate::types::QuoteSplit> =
            stitch_all(&combinations, &quotes).into_iter().map(crate::types::QuoteSplit::new).collect();

        info!(candidate_splits = splits.len(), "ranked candidate splits before selection");
        Ok(select_best(splits, request.trade_type, self.config.top_n_from_cache))
    }

    /// Arbitrum and similar rollups charge an L1 calldata surcharge; every
    /// other chain id gets `None` and the estimator falls back to pure L2
    /// gas usage.
    async fn l2_gas_data(&self, chain_id: u64) -> Option<L2GasData> {
        const ARBITRUM_ONE: u64 = 42161;
        if chain_id == ARBITRUM_ONE {
            Some(L2GasData::default())
        } else {
            None
        }
    }

    async fn write_cache(
        &self,
        request: &QuoteRequest,
        split: &crate::types::QuoteSplit,
        currency_in: &CurrencyInfo,
        currency_out: &CurrencyInfo,
    ) {
        let notional_usd = Self::estimate_notional_usd(request);
        for quote in &split.quotes {
            self.collaborators.cached_routes.save_cached_routes(
                &self.config,
                &quote.route,
                request.token_in_chain_id,
                &currency_in.wrapped_address,
                &currency_out.wrapped_address,
                request.trade_type,
                notional_usd,
            );
        }
        warn!(routes = split.quotes.len(), "cache write completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedRoutesRepository;
    use crate::collaborators::{
        MockChainRepository, MockFreshPoolDetailsWrapper, MockQuoteFetcher, MockRoutesRepository, MockTokenProvider,
    };
    use crate::gas::{GasPools, MockGasConverter, MockGasEstimateProvider};
    use crate::simulate::{MockSimulator, MockTradeBuilder};
    use crate::types::{Address, GasDetails, Pool, QuoteType, SimulationResult, SimulationStatus, Token};
    use std::collections::HashMap;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(alloy::primitives::Address::from(bytes))
    }

    fn token_provider() -> MockTokenProvider {
        let mut provider = MockTokenProvider::new();
        provider
            .expect_search_for_token()
            .returning(|_, address| Ok(TokenOrCurrency::Token(Token::new(*address, 18, "TOK", "Token"))));
        provider
    }

    fn gas_estimate_provider() -> MockGasEstimateProvider {
        let mut provider = MockGasEstimateProvider::new();
        provider.expect_current_gas_price().returning(|_| Ok(1_000_000_000));
        provider.expect_estimate_gas().returning(|_, _, _, _, _, _, _| {
            Ok(GasDetails {
                gas_price_wei: U256::from(1_000_000_000u64),
                gas_cost_wei: U256::ZERO,
                gas_cost_eth: 0.0,
                gas_use: 21_000,
                gas_cost_in_quote_token: Some(U256::ZERO),
            })
        });
        provider
    }

    fn gas_converter() -> MockGasConverter {
        let mut converter = MockGasConverter::new();
        converter.expect_prefetch_gas_pools().returning(|_, _| Ok(GasPools::default()));
        converter.expect_update_quotes_gas_details().returning(|_, _, _, _, _| Ok(()));
        converter
    }

    fn pool_details_wrapper() -> MockFreshPoolDetailsWrapper {
        let mut wrapper = MockFreshPoolDetailsWrapper::new();
        wrapper.expect_get_pool_details_for_route().returning(|_, _| Ok(HashMap::new()));
        wrapper
    }

    fn base_request(lambda_type: LambdaType, quote_type: QuoteType) -> QuoteRequest {
        QuoteRequest {
            token_in_address: addr(1),
            token_in_chain_id: 1,
            token_out_address: addr(2),
            token_out_chain_id: 1,
            amount: U256::from(10u64).pow(U256::from(18u8)),
            trade_type: TradeType::ExactIn,
            quote_type,
            lambda_type,
            protocols: Vec::new(),
            slippage_tolerance: None,
            recipient: None,
            simulate_from_address: None,
            deadline: None,
            portion_bips: None,
            portion_recipient: None,
            hooks_options: crate::types::HooksOptions::default(),
        }
    }

    fn routes_repository_with_route() -> MockRoutesRepository {
        let mut repo = MockRoutesRepository::new();
        repo.expect_get_routes().returning(|_, token_in, token_out, _, _, _| {
            let pool = Pool::V2 {
                token0: *token_in,
                token1: *token_out,
                address: addr(42),
                reserve0: U256::from(10u64).pow(U256::from(24u8)),
                reserve1: U256::from(10u64).pow(U256::from(24u8)),
            };
            Ok(vec![Route::new(vec![pool])])
        });
        repo
    }

    fn quote_fetcher_constant_product() -> MockQuoteFetcher {
        let mut fetcher = MockQuoteFetcher::new();
        fetcher.expect_fetch_quotes().returning(|_, _, amount, routes, _| {
            Ok(routes
                .iter()
                .map(|r| crate::types::QuoteBasic::new(r.clone(), amount * U256::from(r.percentage) / U256::from(100u8)))
                .collect())
        });
        fetcher
    }

    fn engine_with(
        routes_repository: MockRoutesRepository,
        cached_routes: std::sync::Arc<CachedRoutesRepository>,
        simulator: MockSimulator,
        trade_builder: MockTradeBuilder,
    ) -> QuoteEngine {
        QuoteEngine::new(
            EngineConfig::default(),
            Collaborators {
                chain_repository: Arc::new(MockChainRepository::new()),
                token_provider: Arc::new(token_provider()),
                routes_repository: Arc::new(routes_repository),
                quote_fetcher: Arc::new(quote_fetcher_constant_product()),
                gas_estimate_provider: Arc::new(gas_estimate_provider()),
                gas_converter: Arc::new(gas_converter()),
                pool_details: Arc::new(pool_details_wrapper()),
                simulator: Arc::new(simulator),
                trade_builder: Arc::new(trade_builder),
                cached_routes,
            },
        )
    }

    #[tokio::test]
    async fn sync_fast_double_call_never_hits_cache() {
        let cached_routes = std::sync::Arc::new(CachedRoutesRepository::new());
        let engine = engine_with(
            routes_repository_with_route(),
            cached_routes,
            MockSimulator::new(),
            MockTradeBuilder::new(),
        );
        let request = base_request(LambdaType::Sync, QuoteType::Fast);

        let first = engine.quote(request.clone()).await;
        let second = engine.quote(request).await;

        assert!(!first.hits_cached_routes);
        assert!(!second.hits_cached_routes);
    }

    #[tokio::test]
    async fn async_fast_double_call_hits_cache_on_second_request() {
        let cached_routes = std::sync::Arc::new(CachedRoutesRepository::new());
        let engine = engine_with(
            routes_repository_with_route(),
            cached_routes,
            MockSimulator::new(),
            MockTradeBuilder::new(),
        );
        let request = base_request(LambdaType::Async, QuoteType::Fast);

        let first = engine.quote(request.clone()).await;
        assert!(!first.hits_cached_routes);
        assert!(first.error.is_none());

        let second = engine.quote(request).await;
        assert!(second.hits_cached_routes);
    }

    #[tokio::test]
    async fn no_candidate_routes_returns_404() {
        let mut repo = MockRoutesRepository::new();
        repo.expect_get_routes().returning(|_, _, _, _, _, _| Ok(Vec::new()));
        let cached_routes = std::sync::Arc::new(CachedRoutesRepository::new());
        let engine = engine_with(repo, cached_routes, MockSimulator::new(), MockTradeBuilder::new());
        let request = base_request(LambdaType::Sync, QuoteType::Fresh);

        let response = engine.quote(request).await;

        let error = response.error.expect("expected a 404 error response");
        assert_eq!(error.code, 404);
        assert_eq!(error.message, "No valid quotes found");
    }

    #[tokio::test]
    async fn all_simulation_attempts_failing_falls_back_to_first_captured_method_parameters() {
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().returning(|_, _, split, _, _, _| {
            let mut s = split;
            s.simulation_result = Some(SimulationResult {
                estimated_gas_used: 0,
                estimated_gas_used_in_quote_token: U256::ZERO,
                status: SimulationStatus::Failed,
                description: None,
            });
            Ok(s)
        });

        let mut trade_builder = MockTradeBuilder::new();
        trade_builder
            .expect_build()
            .returning(|_, tokens_info, _, _| {
                Ok(crate::types::MethodParameters { to: tokens_info.token_out.address, calldata: Vec::new(), value: U256::ZERO })
            });

        let cached_routes = std::sync::Arc::new(CachedRoutesRepository::new());
        let engine = engine_with(routes_repository_with_route(), cached_routes, simulator, trade_builder);

        let mut request = base_request(LambdaType::Sync, QuoteType::Fresh);
        request.slippage_tolerance = Some(0.5);
        request.recipient = Some(addr(9));
        request.simulate_from_address = Some(addr(8));

        let response = engine.quote(request).await;

        assert!(response.error.is_none());
        assert_eq!(response.simulation_status, SimulationStatus::Failed);
        assert!(response.simulation_error);
        assert_eq!(response.simulation_description.as_deref(), Some("All simulation attempts failed"));
        assert!(response.method_parameters.is_some());
    }
}

