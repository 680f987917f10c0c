//! Simulator orchestration.

pub mod simulator;

pub use simulator::{run_simulation_loop, SimulationOutcome, Simulator, SwapOptions, TradeBuilder};

#[cfg(test)]
pub use simulator::{MockSimulator, MockTradeBuilder};
