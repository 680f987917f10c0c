//! Quote model: per-route quotes, aggregated splits, and their diagnostics.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use super::address::Address;
use super::route::Route;
use super::token::Token;

/// Gas details attached to a single `QuoteBasic` by the gas estimator/
/// converter stages.
#[derive(Debug, Clone)]
pub struct GasDetails {
    pub gas_price_wei: U256,
    pub gas_cost_wei: U256,
    pub gas_cost_eth: f64,
    pub gas_use: u64,
    pub gas_cost_in_quote_token: Option<U256>,
}

impl GasDetails {
    pub fn gas_cost_in_quote_token_or_zero(&self) -> U256 {
        self.gas_cost_in_quote_token.unwrap_or(U256::ZERO)
    }
}

/// A quote for a single percentage-tagged route.
#[derive(Debug, Clone)]
pub struct QuoteBasic {
    pub route: Route,
    pub amount: U256,
    pub gas_details: Option<GasDetails>,
}

impl QuoteBasic {
    pub fn new(route: Route, amount: U256) -> Self {
        Self { route, amount, gas_details: None }
    }

    pub fn gas_cost_in_quote_token(&self) -> U256 {
        self.gas_details
            .as_ref()
            .map(GasDetails::gas_cost_in_quote_token_or_zero)
            .unwrap_or(U256::ZERO)
    }

    pub fn gas_cost_wei(&self) -> U256 {
        self.gas_details.as_ref().map(|g| g.gas_cost_wei).unwrap_or(U256::ZERO)
    }
}

/// The calldata/target artifact a built trade produces for on-chain
/// execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodParameters {
    pub to: Address,
    pub calldata: Vec<u8>,
    pub value: U256,
}

impl MethodParameters {
    /// `0x`-prefixed hex rendering of `calldata`, for logging/diagnostics -
    /// the core never decodes or interprets the bytes itself.
    pub fn calldata_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.calldata))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    ExactIn,
    ExactOut,
}

/// Price-impact and calldata info for the trade a `QuoteSplit` compiles
/// into.
#[derive(Debug, Clone)]
pub struct SwapInfo {
    pub token_in: Address,
    pub token_out: Address,
    pub token_in_is_native: bool,
    pub token_out_is_native: bool,
    pub input_amount: U256,
    pub trade_type: TradeType,
    pub price_impact: f64,
    pub method_parameters: MethodParameters,
}

/// Outcome of a simulation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationStatus {
    Unattempted,
    Success,
    Failed,
    InsufficientBalance,
    NotSupported,
    NotApproved,
    SystemDown,
    SlippageTooLow,
    TransferFromFailed,
}

impl SimulationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SimulationStatus::Unattempted => "UNATTEMPTED",
            SimulationStatus::Success => "SUCCESS",
            SimulationStatus::Failed => "FAILED",
            SimulationStatus::InsufficientBalance => "INSUFFICIENT_BALANCE",
            SimulationStatus::NotSupported => "NOT_SUPPORTED",
            SimulationStatus::NotApproved => "NOT_APPROVED",
            SimulationStatus::SystemDown => "SYSTEM_DOWN",
            SimulationStatus::SlippageTooLow => "SLIPPAGE_TOO_LOW",
            SimulationStatus::TransferFromFailed => "TRANSFER_FROM_FAILED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub estimated_gas_used: u64,
    pub estimated_gas_used_in_quote_token: U256,
    pub status: SimulationStatus,
    pub description: Option<String>,
}

/// A snapshot of the input/output tokens as resolved at quote time, carried
/// through so later stages (response assembly, diagnostics) don't need to
/// re-resolve them.
#[derive(Debug, Clone)]
pub struct TokensInfo {
    pub token_in: Token,
    pub token_out: Token,
}

/// A set of percentage-tagged route quotes whose percentages sum to
/// exactly 100.
#[derive(Debug, Clone)]
pub struct QuoteSplit {
    pub quotes: Vec<QuoteBasic>,
    pub swap_info: Option<SwapInfo>,
    pub simulation_result: Option<SimulationResult>,
    pub tokens_info: Option<TokensInfo>,
}

impl QuoteSplit {
    pub fn new(quotes: Vec<QuoteBasic>) -> Self {
        Self { quotes, swap_info: None, simulation_result: None, tokens_info: None }
    }

    pub fn percentage_sum(&self) -> u32 {
        self.quotes.iter().map(|q| q.route.percentage as u32).sum()
    }

    pub fn is_complete(&self) -> bool {
        !self.quotes.is_empty() && self.percentage_sum() == 100
    }

    pub fn total_amount(&self) -> U256 {
        self.quotes.iter().fold(U256::ZERO, |acc, q| acc + q.amount)
    }

    pub fn total_gas_cost_in_quote_token(&self) -> U256 {
        self.quotes.iter().fold(U256::ZERO, |acc, q| acc + q.gas_cost_in_quote_token())
    }

    pub fn total_gas_cost_wei(&self) -> U256 {
        self.quotes.iter().fold(U256::ZERO, |acc, q| acc + q.gas_cost_wei())
    }

    /// `true` if this split contains no duplicate pool address across its
    /// quotes' routes - an invariant the best-split finder must
    /// enforce when stitching combinations back together.
    pub fn has_no_duplicate_pools(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        for q in &self.quotes {
            for pool in &q.route.path {
                if !seen.insert(pool.address().lowercased()) {
                    return false;
                }
            }
        }
        true
    }
}
