//! Response assembly & V4 fake-pool filtering.

use alloy::primitives::U256;

use crate::portion::{apply_exact_in_portion, apply_exact_out_portion, apportion_by_percentage};
use crate::types::{
    Address, MethodParameters, Pool, QuoteResponse, QuoteSplit, RoutePoolView, RouteView, SimulationStatus,
    TradeType,
};

/// Stringify a price-impact value: absent, NaN, or otherwise
/// unrepresentable yields `"0"`; otherwise clamp to `[-100,100]`
/// and format with up to 2 decimal places.
pub fn format_price_impact(price_impact: Option<f64>) -> String {
    let Some(value) = price_impact else { return "0".to_string() };
    if !value.is_finite() {
        return "0".to_string();
    }
    let clamped = value.clamp(-100.0, 100.0);
    format!("{clamped:.2}")
}

/// Gas-adjusted amount: for EXACT_IN, subtract total gas
/// cost in quote-token units from the quote amount; for EXACT_OUT, add it.
pub fn gas_adjusted_amount(quote_amount: U256, total_gas_cost_in_quote_token: U256, trade_type: TradeType) -> U256 {
    match trade_type {
        TradeType::ExactIn => quote_amount.saturating_sub(total_gas_cost_in_quote_token),
        TradeType::ExactOut => quote_amount + total_gas_cost_in_quote_token,
    }
}

/// Per-route `amount_in` distribution: floor division for
/// all but the last route, remainder assigned to the last so the sum is
/// exact for arbitrary-precision inputs.
pub fn distribute_amount_in(amount_in: U256, percentages: &[u8]) -> Vec<U256> {
    apportion_by_percentage(amount_in, percentages)
}

fn pool_view(pool: &Pool, amount_in: U256, amount_out: U256) -> RoutePoolView {
    RoutePoolView {
        protocol: pool.protocol().to_string(),
        address: pool.address(),
        token_in: pool.token0(),
        token_out: pool.token1(),
        amount_in,
        amount_out,
        reserve0: match pool {
            Pool::V2 { reserve0, .. } => Some(*reserve0),
            _ => None,
        },
        reserve1: match pool {
            Pool::V2 { reserve1, .. } => Some(*reserve1),
            _ => None,
        },
        fee: match pool {
            Pool::V3 { fee, .. } | Pool::V4 { fee, .. } => Some(*fee),
            Pool::V2 { .. } => None,
        },
        tick_spacing: match pool {
            Pool::V4 { tick_spacing, .. } => Some(*tick_spacing),
            _ => None,
        },
        hooks: match pool {
            Pool::V4 { hooks, .. } => Some(*hooks),
            _ => None,
        },
    }
}

/// Build the response `route` field from a winning split: fake V4 bridge
/// pools are stripped, and each route's `amount_in`/`amount_out` are
/// distributed across its own pool hops assuming a single-hop-equivalent
/// pass-through (multi-hop intermediate amounts are approximated by the
/// route's own total, since exact intermediate-hop amounts depend on the
/// quote fetcher's pricing, out of scope here).
///
/// Per spec.md §4.7/§4.10: for EXACT_IN, `amount` is the swap's input and
/// is distributed directly across routes, while each route's own
/// `amount_out` is its quoted amount minus that route's own portion
/// deduction (`apply_exact_in_portion`, computed from the route's own
/// amount rather than the aggregate, matching the worked example's
/// independent-flooring result). For EXACT_OUT, `amount` is the
/// user-requested output; the per-pool `amount_in` distributes the split's
/// quoted input instead, and `amount_out` distributes `amount +
/// portion_amount` (`apply_exact_out_portion`) across routes.
fn build_route_views(split: &QuoteSplit, trade_type: TradeType, amount: U256, portion_bips: Option<u32>) -> Vec<RouteView> {
    let percentages: Vec<u8> = split.quotes.iter().map(|q| q.route.percentage).collect();
    let route_quote_amounts: Vec<U256> = split.quotes.iter().map(|q| q.amount).collect();

    let (route_amounts_in, route_amounts_out) = match trade_type {
        TradeType::ExactIn => {
            let amounts_in = distribute_amount_in(amount, &percentages);
            let amounts_out = match portion_bips {
                Some(bips) => {
                    let (_, route_portions) = apply_exact_in_portion(split.total_amount(), bips, &route_quote_amounts);
                    route_quote_amounts.iter().zip(route_portions.iter()).map(|(a, p)| *a - *p).collect()
                }
                None => route_quote_amounts.clone(),
            };
            (amounts_in, amounts_out)
        }
        TradeType::ExactOut => {
            let amounts_in = apportion_by_percentage(split.total_amount(), &percentages);
            let total_out = match portion_bips {
                Some(bips) => apply_exact_out_portion(amount, bips).1,
                None => amount,
            };
            let amounts_out = apportion_by_percentage(total_out, &percentages);
            (amounts_in, amounts_out)
        }
    };

    split
        .quotes
        .iter()
        .zip(route_amounts_in.iter())
        .zip(route_amounts_out.iter())
        .map(|((quote, route_amount_in), route_amount_out)| {
            let visible_pools = quote.route.without_fake_bridge_pools();
            let pools = visible_pools
                .iter()
                .map(|pool| pool_view(pool, *route_amount_in, *route_amount_out))
                .collect();
            RouteView { pools, percentage: quote.route.percentage }
        })
        .collect()
}

/// Assemble the final `QuoteResponse` for a winning split.
/// `method_parameters` comes from either a successful simulation or the
/// captured fallback; `simulation_error` is set whenever the
/// split's `simulation_result.status` is anything other than `SUCCESS` or
/// `UNATTEMPTED`.
pub fn build_response(
    split: &QuoteSplit,
    trade_type: TradeType,
    amount: U256,
    portion_bips: Option<u32>,
    portion_recipient: Option<Address>,
    portion_amount: Option<U256>,
    portion_amount_decimals: Option<u8>,
    method_parameters: Option<MethodParameters>,
    hits_cached_routes: bool,
) -> QuoteResponse {
    let quote_amount = split.total_amount();
    let total_gas_cost_in_quote_token = split.total_gas_cost_in_quote_token();
    let quote_gas_adjusted = gas_adjusted_amount(quote_amount, total_gas_cost_in_quote_token, trade_type);

    let price_impact = format_price_impact(split.swap_info.as_ref().map(|s| s.price_impact));
    let route = build_route_views(split, trade_type, amount, portion_bips);

    let (simulation_status, simulation_error, simulation_description) = match &split.simulation_result {
        Some(result) => (
            result.status,
            !matches!(result.status, SimulationStatus::Success | SimulationStatus::Unattempted),
            result.description.clone(),
        ),
        None => (SimulationStatus::Unattempted, false, None),
    };

    QuoteResponse {
        quote_amount,
        quote_gas_adjusted,
        gas_use_estimate_quote: total_gas_cost_in_quote_token,
        price_impact,
        route,
        hits_cached_routes,
        portion_bips,
        portion_recipient,
        portion_amount,
        portion_amount_decimals,
        method_parameters,
        simulation_status,
        simulation_error,
        simulation_description,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QuoteBasic, Route};

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::new(alloy::primitives::Address::from(bytes))
    }

    #[test]
    fn price_impact_clamps_and_formats() {
        assert_eq!(format_price_impact(None), "0");
        assert_eq!(format_price_impact(Some(f64::NAN)), "0");
        assert_eq!(format_price_impact(Some(150.0)), "100.00");
        assert_eq!(format_price_impact(Some(-150.0)), "-100.00");
        assert_eq!(format_price_impact(Some(1.005)), "1.00");
    }

    #[test]
    fn gas_adjusted_subtracts_for_exact_in_and_adds_for_exact_out() {
        let amount = U256::from(1_234_567_890u64);
        let gas = U256::from(1_000_000u64);
        assert_eq!(gas_adjusted_amount(amount, gas, TradeType::ExactIn), U256::from(1_233_567_890u64));
        assert_eq!(gas_adjusted_amount(amount, gas, TradeType::ExactOut), U256::from(1_235_567_890u64));
    }

    #[test]
    fn three_route_distribution_sums_exactly() {
        let total = U256::from(10u64).pow(U256::from(24u8));
        let parts = distribute_amount_in(total, &[33, 34, 33]);
        assert_eq!(parts.iter().fold(U256::ZERO, |acc, p| acc + *p), total);
    }

    #[test]
    fn fake_bridge_pool_is_absent_from_route_views() {
        let a = addr(1);
        let fake = Pool::V4 {
            token0: a,
            token1: addr(2),
            fee: 0,
            tick_spacing: 0,
            hooks: Address::zero(),
            liquidity: U256::ZERO,
            pool_id: addr(3),
            sqrt_price_x96: U256::ZERO,
            tick_current: 0,
        };
        let real = Pool::V2 { token0: addr(2), token1: addr(4), address: addr(5), reserve0: U256::ZERO, reserve1: U256::ZERO };
        let route = Route::new(vec![fake, real]);
        let split = QuoteSplit::new(vec![QuoteBasic::new(route, U256::from(100u8))]);

        let views = build_route_views(&split, TradeType::ExactIn, U256::from(100u8), None);
        assert_eq!(views[0].pools.len(), 1);
    }

    fn pool_n(n: u8) -> Pool {
        let a = addr(n);
        Pool::V2 { token0: a, token1: addr(n + 1), address: a, reserve0: U256::ZERO, reserve1: U256::ZERO }
    }

    /// spec.md §8 scenario 3: EXACT_IN, portion_bips=50, amount=10^18,
    /// quote_amount=1_234_567_890, 60/40 split.
    #[test]
    fn exact_in_response_deducts_portion_from_each_route_amount_out() {
        let route1 = Route::new(vec![pool_n(1)]).with_percentage(60);
        let route2 = Route::new(vec![pool_n(2)]).with_percentage(40);
        let split = QuoteSplit::new(vec![
            QuoteBasic::new(route1, U256::from(740_740_734u64)),
            QuoteBasic::new(route2, U256::from(493_827_156u64)),
        ]);

        let amount_in = U256::from(10u64).pow(U256::from(18u8));
        let response = build_response(
            &split,
            TradeType::ExactIn,
            amount_in,
            Some(50),
            None,
            Some(U256::from(6_172_839u64)),
            Some(18),
            None,
            false,
        );

        assert_eq!(response.route[0].pools[0].amount_in, U256::from(600_000_000_000_000_000u64));
        assert_eq!(response.route[0].pools[0].amount_out, U256::from(737_037_031u64));
        assert_eq!(response.route[1].pools[0].amount_in, U256::from(400_000_000_000_000_000u64));
        assert_eq!(response.route[1].pools[0].amount_out, U256::from(491_358_021u64));
        assert_eq!(response.quote_gas_adjusted, response.quote_amount);
    }

    /// spec.md §8 scenario 4: EXACT_OUT, portion_bips=50, input=10^18,
    /// quote_amount=1_234_567_890, single route.
    #[test]
    fn exact_out_response_distributes_quoted_input_and_adds_portion_to_amount_out() {
        let route = Route::new(vec![pool_n(1)]);
        let split = QuoteSplit::new(vec![QuoteBasic::new(route, U256::from(1_234_567_890u64))]);

        let requested_output = U256::from(10u64).pow(U256::from(18u8));
        let response = build_response(
            &split,
            TradeType::ExactOut,
            requested_output,
            Some(50),
            None,
            Some(U256::from(5_000_000_000_000_000u64)),
            Some(18),
            None,
            false,
        );

        assert_eq!(response.route[0].pools[0].amount_in, U256::from(1_234_567_890u64));
        assert_eq!(response.route[0].pools[0].amount_out, U256::from(1_005_000_000_000_000_000u64));
    }
}
