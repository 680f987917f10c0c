//! Response surface and error codes.

use alloy::primitives::U256;
use serde::Serialize;

use super::address::Address;
use super::quote::{MethodParameters, SimulationStatus};

#[derive(Debug, Clone, Serialize)]
pub struct ResponseError {
    pub code: u16,
    pub message: String,
}

impl ResponseError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { code: 400, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { code: 404, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { code: 500, message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutePoolView {
    pub protocol: String,
    pub address: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub reserve0: Option<U256>,
    pub reserve1: Option<U256>,
    pub fee: Option<u32>,
    pub tick_spacing: Option<i32>,
    pub hooks: Option<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    pub pools: Vec<RoutePoolView>,
    pub percentage: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub quote_amount: U256,
    pub quote_gas_adjusted: U256,
    pub gas_use_estimate_quote: U256,
    pub price_impact: String,
    pub route: Vec<RouteView>,
    pub hits_cached_routes: bool,
    pub portion_bips: Option<u32>,
    pub portion_recipient: Option<Address>,
    pub portion_amount: Option<U256>,
    pub portion_amount_decimals: Option<u8>,
    pub method_parameters: Option<MethodParameters>,
    pub simulation_status: SimulationStatus,
    pub simulation_error: bool,
    pub simulation_description: Option<String>,
    pub error: Option<ResponseError>,
}

impl QuoteResponse {
    pub fn error_only(error: ResponseError) -> Self {
        Self {
            quote_amount: U256::ZERO,
            quote_gas_adjusted: U256::ZERO,
            gas_use_estimate_quote: U256::ZERO,
            price_impact: "0".to_string(),
            route: Vec::new(),
            hits_cached_routes: false,
            portion_bips: None,
            portion_recipient: None,
            portion_amount: None,
            portion_amount_decimals: None,
            method_parameters: None,
            simulation_status: SimulationStatus::Unattempted,
            simulation_error: false,
            simulation_description: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
