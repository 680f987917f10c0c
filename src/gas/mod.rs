//! Gas estimation and conversion.

pub mod cache;
pub mod converter;
pub mod estimator;

pub use cache::GasPriceCache;
pub use converter::{convert_gas_costs, GasConverter, GasPools};
pub use estimator::{attach_gas_estimates, GasEstimateProvider, L2GasData};

#[cfg(test)]
pub use converter::MockGasConverter;
#[cfg(test)]
pub use estimator::MockGasEstimateProvider;
