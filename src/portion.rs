//! Protocol fee ("portion") math. All arithmetic is
//! arbitrary-precision integer; per-route apportionment assigns the
//! remainder to the last route so the parts sum exactly to the total.

use alloy::primitives::U256;

use crate::types::TradeType;

const BIPS_DENOMINATOR: u64 = 10_000;

/// `floor(amount * bips / 10_000)`.
pub fn portion_amount(amount: U256, portion_bips: u32) -> U256 {
    amount * U256::from(portion_bips) / U256::from(BIPS_DENOMINATOR)
}

/// Split `total` across `percentages` (each in `1..=100`, summing to 100)
/// using integer division, with the remainder assigned to the last entry
/// so `Σ parts == total` exactly.
pub fn apportion_by_percentage(total: U256, percentages: &[u8]) -> Vec<U256> {
    if percentages.is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::with_capacity(percentages.len());
    let mut distributed = U256::ZERO;
    for &pct in &percentages[..percentages.len() - 1] {
        let part = total * U256::from(pct) / U256::from(100u8);
        distributed += part;
        parts.push(part);
    }
    parts.push(total - distributed);
    parts
}

/// EXACT_IN: `portion_amount = floor(quote_amount * bips / 10_000)` for the
/// reported total, while each route's own deduction is computed
/// independently from that route's own amount (`floor(route_amount * bips
/// / 10_000)`) so that `route_amount_out = route_amount - route_portion`.
pub fn apply_exact_in_portion(
    quote_amount: U256,
    portion_bips: u32,
    route_amounts: &[U256],
) -> (U256, Vec<U256>) {
    let portion = portion_amount(quote_amount, portion_bips);
    let route_portions = route_amounts.iter().map(|&amount| portion_amount(amount, portion_bips)).collect();
    (portion, route_portions)
}

/// EXACT_OUT: `portion_amount = floor(input_amount * bips / 10_000)`; the
/// response's output becomes `input_amount + portion_amount`.
pub fn apply_exact_out_portion(input_amount: U256, portion_bips: u32) -> (U256, U256) {
    let portion = portion_amount(input_amount, portion_bips);
    (portion, input_amount + portion)
}

/// Apply the portion for either trade direction, returning the adjusted
/// total amount_out and the portion amount.
pub fn apply_portion(
    trade_type: TradeType,
    quote_amount: U256,
    input_amount: U256,
    portion_bips: u32,
) -> (U256, U256) {
    match trade_type {
        TradeType::ExactIn => {
            let portion = portion_amount(quote_amount, portion_bips);
            (quote_amount - portion, portion)
        }
        TradeType::ExactOut => {
            let portion = portion_amount(input_amount, portion_bips);
            (input_amount + portion, portion)
        }
    }
}
