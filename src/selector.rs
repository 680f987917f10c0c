//! Quote selector: ranks `QuoteSplit`s by gas-adjusted amount
//! when the whole candidate set validates, otherwise falls back to raw
//! amount.

use alloy::primitives::U256;

use crate::types::{QuoteSplit, TradeType};

struct Ranked {
    split: QuoteSplit,
    original: U256,
    adjusted_valid: bool,
    adjusted: U256,
    gas_cost_wei: U256,
}

fn adjusted_amount(split: &QuoteSplit, trade_type: TradeType, original: U256) -> U256 {
    let gas = split.total_gas_cost_in_quote_token();
    match trade_type {
        TradeType::ExactIn => original.saturating_sub(gas),
        TradeType::ExactOut => original.saturating_add(gas),
    }
}

/// A split's gas adjustment is valid iff `original > 0` AND the adjusted
/// amount differs from the original by at most 30% of it.
fn is_adjustment_valid(original: U256, adjusted: U256) -> bool {
    if original == U256::ZERO {
        return false;
    }
    let diff = if adjusted > original { adjusted - original } else { original - adjusted };
    diff * U256::from(100u8) <= original * U256::from(30u8)
}

/// Rank `splits` and return the first `top_n`. Validity of the gas
/// adjustment is an all-or-nothing property of the whole input list: if
/// every split validates, sort by `adjusted`; otherwise sort by `original`.
/// Ordering is descending for `EXACT_IN`, ascending for `EXACT_OUT`; ties
/// break on lower total gas cost in wei.
pub fn select_best(splits: Vec<QuoteSplit>, trade_type: TradeType, top_n: usize) -> Vec<QuoteSplit> {
    let mut ranked: Vec<Ranked> = splits
        .into_iter()
        .map(|split| {
            let original = split.total_amount();
            let adjusted = adjusted_amount(&split, trade_type, original);
            let adjusted_valid = is_adjustment_valid(original, adjusted);
            let gas_cost_wei = split.total_gas_cost_wei();
            Ranked { split, original, adjusted_valid, adjusted, gas_cost_wei }
        })
        .collect();

    let all_valid = !ranked.is_empty() && ranked.iter().all(|r| r.adjusted_valid);

    ranked.sort_by(|a, b| {
        let key_a = if all_valid { a.adjusted } else { a.original };
        let key_b = if all_valid { b.adjusted } else { b.original };
        let primary = match trade_type {
            TradeType::ExactIn => key_b.cmp(&key_a),
            TradeType::ExactOut => key_a.cmp(&key_b),
        };
        primary.then_with(|| a.gas_cost_wei.cmp(&b.gas_cost_wei))
    });

    ranked.into_iter().take(top_n).map(|r| r.split).collect()
}
