//! Human-readable `QuoteSplit` summary.

use crate::types::{QuoteSplit, TradeType};

/// A flattened, printable view of a winning split.
#[derive(Debug)]
pub struct SplitSummary {
    pub route_count: usize,
    pub total_amount: String,
    pub total_gas_cost_wei: String,
    pub total_gas_cost_in_quote_token: String,
    pub percentage_sum: u32,
    pub simulation_status: &'static str,
}

pub fn summarize(split: &QuoteSplit) -> SplitSummary {
    SplitSummary {
        route_count: split.quotes.len(),
        total_amount: split.total_amount().to_string(),
        total_gas_cost_wei: split.total_gas_cost_wei().to_string(),
        total_gas_cost_in_quote_token: split.total_gas_cost_in_quote_token().to_string(),
        percentage_sum: split.percentage_sum(),
        simulation_status: split.simulation_result.as_ref().map(|r| r.status.as_str()).unwrap_or("UNATTEMPTED"),
    }
}

impl SplitSummary {
    pub fn print(&self, trade_type: TradeType) {
        println!("========================================");
        println!("Quote split summary ({} routes, {:?})", self.route_count, trade_type);
        println!("----------------------------------------");
        println!("  percentage sum:            {}", self.percentage_sum);
        println!("  total amount:              {}", self.total_amount);
        println!("  total gas cost (wei):      {}", self.total_gas_cost_wei);
        println!("  total gas cost (quote tk): {}", self.total_gas_cost_in_quote_token);
        println!("  simulation status:         {}", self.simulation_status);
        println!("========================================");
    }
}
