//! Engine-wide tunables, grouped into a struct so the orchestrator can
//! thread per-deployment overrides through instead of relying on bare
//! constants. `EngineConfig::default()` matches the values assumed by the
//! worked examples used to validate the portion math (step `S = 5`, etc).

use std::env;

/// A notional-magnitude bin used to partition the cached-routes repository.
/// The exact thresholds are configuration, not fixed; callers must reuse
/// the same mapping for writes and reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UsdBucket {
    One,
    Ten,
    Hundred,
    OneThousand,
    TenThousand,
    HundredThousand,
    OneMillion,
    TenMillionPlus,
}

impl UsdBucket {
    pub const ALL: [UsdBucket; 8] = [
        UsdBucket::One,
        UsdBucket::Ten,
        UsdBucket::Hundred,
        UsdBucket::OneThousand,
        UsdBucket::TenThousand,
        UsdBucket::HundredThousand,
        UsdBucket::OneMillion,
        UsdBucket::TenMillionPlus,
    ];

    /// Deterministic step function from a USD notional to its bucket.
    /// Reused verbatim by both cache writes and cache reads - using
    /// different mappings for each would silently desync the two.
    pub fn from_notional_usd(notional_usd: f64) -> UsdBucket {
        if notional_usd < 10.0 {
            UsdBucket::One
        } else if notional_usd < 100.0 {
            UsdBucket::Ten
        } else if notional_usd < 1_000.0 {
            UsdBucket::Hundred
        } else if notional_usd < 10_000.0 {
            UsdBucket::OneThousand
        } else if notional_usd < 100_000.0 {
            UsdBucket::TenThousand
        } else if notional_usd < 1_000_000.0 {
            UsdBucket::HundredThousand
        } else if notional_usd < 10_000_000.0 {
            UsdBucket::OneMillion
        } else {
            UsdBucket::TenMillionPlus
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UsdBucket::One => "$1",
            UsdBucket::Ten => "$10",
            UsdBucket::Hundred => "$100",
            UsdBucket::OneThousand => "$1k",
            UsdBucket::TenThousand => "$10k",
            UsdBucket::HundredThousand => "$100k",
            UsdBucket::OneMillion => "$1M",
            UsdBucket::TenMillionPlus => "$10M+",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum pools a single route may chain together.
    pub max_hops: usize,
    /// Percentage step `S` used by the route-percentage allocator.
    pub percentage_step: u8,
    /// Maximum number of routes the best-split finder may combine.
    pub max_splits: usize,
    /// Branch cap per percentage step during the split search.
    pub max_split_routes: usize,
    /// Time budget for the split search, in milliseconds.
    pub route_split_timeout_ms: u64,
    /// Cap on entries retained per cache bucket.
    pub max_routes_per_bucket: usize,
    /// Cap on entries read back per cache bucket.
    pub top_n_from_cache: usize,
    /// Chain ids this deployment serves requests for.
    pub supported_chains: Vec<u64>,
    pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hops: 4,
            percentage_step: 5,
            max_splits: 4,
            max_split_routes: 8,
            route_split_timeout_ms: 750,
            max_routes_per_bucket: 8,
            top_n_from_cache: 3,
            supported_chains: vec![1, 10, 137, 42161, 8453],
            simulation: SimulationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load overrides from the process environment, following the
    /// teacher's `dotenvy::dotenv().ok()` convention - this only matters
    /// for the demonstration binary, never for library consumers, who
    /// build an `EngineConfig` directly.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("ROUTER_PERCENTAGE_STEP") {
            if let Ok(v) = v.parse() {
                config.percentage_step = v;
            }
        }
        if let Ok(v) = env::var("ROUTER_MAX_SPLITS") {
            if let Ok(v) = v.parse() {
                config.max_splits = v;
            }
        }
        if let Ok(v) = env::var("ROUTER_SPLIT_TIMEOUT_MS") {
            if let Ok(v) = v.parse() {
                config.route_split_timeout_ms = v;
            }
        }
        if let Ok(v) = env::var("ROUTER_SIMULATION_ENABLED") {
            config.simulation.enabled = v != "0" && v.to_lowercase() != "false";
        }
        config
    }

    /// Number of percentage steps from `S` up to `100` inclusive, used to
    /// size the allocator's expansion.
    pub fn percentage_steps(&self) -> usize {
        (100 / self.percentage_step as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_mapping_is_deterministic_and_monotonic() {
        assert_eq!(UsdBucket::from_notional_usd(0.5), UsdBucket::One);
        assert_eq!(UsdBucket::from_notional_usd(9.99), UsdBucket::One);
        assert_eq!(UsdBucket::from_notional_usd(10.0), UsdBucket::Ten);
        assert_eq!(UsdBucket::from_notional_usd(999_999.0), UsdBucket::HundredThousand);
        assert_eq!(UsdBucket::from_notional_usd(50_000_000.0), UsdBucket::TenMillionPlus);
    }
}
