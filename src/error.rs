//! Typed library errors.
//!
//! The library boundary uses a matchable `thiserror` enum so the
//! orchestrator can deterministically map failures onto the
//! `{code, message}` response surface instead of stringly-typed errors.

use crate::types::ResponseError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    #[error("slippage tolerance {0}% exceeds the 20% maximum")]
    SlippageTooHigh(f64),

    #[error("Mixed protocol cannot be specified explicitly")]
    MixedProtocolExplicit,

    #[error("amount must be a positive integer")]
    NonPositiveAmount,

    #[error("Token in and out must not be the same")]
    IdenticalTokens,

    #[error("invalid recipient address")]
    InvalidRecipient,

    #[error("token in and out chain ids must match")]
    ChainIdMismatch,

    #[error("wrapped currency addresses collide")]
    WrappedCurrencyCollision,

    #[error("No valid quotes found")]
    NoValidQuotes,

    #[error("unreachable collaborator: {0}")]
    CollaboratorUnreachable(String),
}

impl EngineError {
    /// Deterministic mapping onto the `{code, message}` error surface
    ///. Validation errors are 400, `NoValidQuotes` is 404,
    /// anything collaborator-shaped is 500.
    pub fn to_response_error(&self) -> ResponseError {
        match self {
            EngineError::NoValidQuotes => ResponseError::not_found(self.to_string()),
            EngineError::CollaboratorUnreachable(_) => ResponseError::internal(self.to_string()),
            _ => ResponseError::bad_request(self.to_string()),
        }
    }
}
