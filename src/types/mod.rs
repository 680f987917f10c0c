//! Core value types shared across every pipeline stage.

pub mod address;
pub mod pool;
pub mod quote;
pub mod request;
pub mod response;
pub mod route;
pub mod token;

pub use address::Address;
pub use pool::{HooksOptions, Pool, Protocol};
pub use quote::{
    GasDetails, MethodParameters, QuoteBasic, QuoteSplit, SimulationResult, SimulationStatus,
    SwapInfo, TokensInfo, TradeType,
};
pub use request::{LambdaType, ProtocolTag, QuoteRequest, QuoteType};
pub use response::{QuoteResponse, ResponseError, RoutePoolView, RouteView};
pub use route::Route;
pub use token::{CurrencyInfo, Token};
