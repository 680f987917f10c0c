//! Cached-routes repository, bucketed by USD notional.

pub mod bucket;
pub mod encode;
pub mod repository;

pub use bucket::CacheKey;
pub use encode::{decode_route, encode_route, EncodedPool, EncodedRoute};
pub use repository::{BucketRoutes, CachedRoutesRepository, DeleteOutcome};
