//! Simulator collaborator and the orchestration loop that drives it over
//! ranked splits.

use alloy::primitives::U256;
#[cfg(test)]
use mockall::automock;

use crate::collaborators::RequestContext;
use crate::error::EngineError;
use crate::types::{Address, MethodParameters, QuoteSplit, SimulationStatus, TokensInfo, TradeType};

#[derive(Debug, Clone)]
pub struct SwapOptions {
    pub recipient: Address,
    pub slippage_tolerance: f64,
    pub simulate_from_address: Address,
    pub deadline: Option<u64>,
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Simulator: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn simulate(
        &self,
        chain_id: u64,
        swap_options: &SwapOptions,
        split: QuoteSplit,
        tokens_info: &TokensInfo,
        input_amount: U256,
        expected_amount: U256,
    ) -> Result<QuoteSplit, EngineError>;
}

/// Builds the protocol-agnostic trade artifact for a split: price impact
/// and method parameters. The core treats this as a collaborator because
/// encoding calldata is wire-format work explicitly placed out of scope
/// here.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TradeBuilder: Send + Sync {
    async fn build(
        &self,
        split: &QuoteSplit,
        tokens_info: &TokensInfo,
        trade_type: TradeType,
        input_amount: U256,
    ) -> Result<MethodParameters, EngineError>;
}

/// Outcome of the simulation loop over ranked splits.
pub struct SimulationOutcome {
    pub split: QuoteSplit,
    pub method_parameters: Option<MethodParameters>,
}

/// Drive simulation attempts serialized over `ranked` splits, in order
///:
/// - the first split whose trade builds successfully captures
///   `first_method_parameters` as the fallback;
/// - the first split whose simulation succeeds is returned immediately;
/// - if every attempt fails but a fallback was captured, the best-ranked
///   split is returned with `status = FAILED`, `simulation_error = true`;
/// - if no trade ever built, returns `None` (caller maps this to 404).
pub async fn run_simulation_loop(
    simulator: &dyn Simulator,
    trade_builder: &dyn TradeBuilder,
    chain_id: u64,
    swap_options: &SwapOptions,
    ranked: Vec<QuoteSplit>,
    tokens_info: &TokensInfo,
    trade_type: TradeType,
    input_amount: U256,
    expected_amount: U256,
    _ctx: &RequestContext,
) -> Option<SimulationOutcome> {
    let mut first_method_parameters: Option<MethodParameters> = None;
    let mut best_ranked: Option<QuoteSplit> = None;

    for split in ranked {
        let built = trade_builder.build(&split, tokens_info, trade_type, input_amount).await;
        let Ok(method_parameters) = built else {
            continue;
        };
        if first_method_parameters.is_none() {
            first_method_parameters = Some(method_parameters.clone());
        }
        if best_ranked.is_none() {
            best_ranked = Some(split.clone());
        }

        match simulator
            .simulate(chain_id, swap_options, split, tokens_info, input_amount, expected_amount)
            .await
        {
            Ok(simulated) if simulated.simulation_result.as_ref().map(|r| r.status) == Some(SimulationStatus::Success) => {
                return Some(SimulationOutcome { split: simulated, method_parameters: Some(method_parameters) });
            }
            _ => continue,
        }
    }

    let best = best_ranked?;
    let method_parameters = first_method_parameters?;
    let mut fallback = best;
    fallback.simulation_result = Some(crate::types::SimulationResult {
        estimated_gas_used: 0,
        estimated_gas_used_in_quote_token: U256::ZERO,
        status: SimulationStatus::Failed,
        description: Some("All simulation attempts failed".to_string()),
    });
    Some(SimulationOutcome { split: fallback, method_parameters: Some(method_parameters) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pool, Route};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(alloy::primitives::Address::from(bytes))
    }

    fn split() -> QuoteSplit {
        let a = addr(1);
        let pool = Pool::V2 { token0: a, token1: a, address: a, reserve0: U256::ZERO, reserve1: U256::ZERO };
        QuoteSplit::new(vec![crate::types::QuoteBasic::new(Route::new(vec![pool]), U256::from(1u8))])
    }

    fn tokens_info() -> TokensInfo {
        let a = addr(1);
        TokensInfo { token_in: crate::types::Token::unresolved(a), token_out: crate::types::Token::unresolved(a) }
    }

    fn swap_options() -> SwapOptions {
        SwapOptions { recipient: addr(9), slippage_tolerance: 0.5, simulate_from_address: addr(8), deadline: None }
    }

    #[tokio::test]
    async fn succeeds_on_first_split_that_simulates_successfully() {
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().times(1).returning(|_, _, split, _, _, _| {
            let mut s = split;
            s.simulation_result = Some(crate::types::SimulationResult {
                estimated_gas_used: 100,
                estimated_gas_used_in_quote_token: U256::ZERO,
                status: SimulationStatus::Success,
                description: None,
            });
            Ok(s)
        });

        let mut builder = MockTradeBuilder::new();
        builder.expect_build().times(1).returning(|_, _, _, _| {
            Ok(MethodParameters { to: addr(2), calldata: vec![], value: U256::ZERO })
        });

        let ctx = RequestContext::default();
        let outcome = run_simulation_loop(
            &simulator,
            &builder,
            1,
            &swap_options(),
            vec![split()],
            &tokens_info(),
            TradeType::ExactIn,
            U256::from(100u8),
            U256::from(100u8),
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome.split.simulation_result.unwrap().status,
            SimulationStatus::Success
        );
    }

    #[tokio::test]
    async fn falls_back_to_first_captured_method_parameters_when_all_fail() {
        let mut simulator = MockSimulator::new();
        simulator.expect_simulate().returning(|_, _, split, _, _, _| {
            let mut s = split;
            s.simulation_result = Some(crate::types::SimulationResult {
                estimated_gas_used: 0,
                estimated_gas_used_in_quote_token: U256::ZERO,
                status: SimulationStatus::Failed,
                description: None,
            });
            Ok(s)
        });

        let mut builder = MockTradeBuilder::new();
        builder.expect_build().returning(|_, _, _, _| {
            Ok(MethodParameters { to: addr(3), calldata: vec![], value: U256::ZERO })
        });

        let ctx = RequestContext::default();
        let outcome = run_simulation_loop(
            &simulator,
            &builder,
            1,
            &swap_options(),
            vec![split()],
            &tokens_info(),
            TradeType::ExactIn,
            U256::from(100u8),
            U256::from(100u8),
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(outcome.split.simulation_result.unwrap().status, SimulationStatus::Failed);
        assert!(outcome.method_parameters.is_some());
    }

    #[tokio::test]
    async fn returns_none_when_no_trade_ever_builds() {
        let simulator = MockSimulator::new();
        let mut builder = MockTradeBuilder::new();
        builder.expect_build().returning(|_, _, _, _| Err(EngineError::NoValidQuotes));

        let ctx = RequestContext::default();
        let outcome = run_simulation_loop(
            &simulator,
            &builder,
            1,
            &swap_options(),
            vec![split()],
            &tokens_info(),
            TradeType::ExactIn,
            U256::from(100u8),
            U256::from(100u8),
            &ctx,
        )
        .await;

        assert!(outcome.is_none());
    }
}
