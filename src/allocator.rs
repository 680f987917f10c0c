//! Route-percentage allocator: expansion and stitching.

use crate::config::EngineConfig;
use crate::types::{QuoteBasic, Route};

/// Emit copies of `route` at every percentage step from `100` down to `S`
/// (the configured `percentage_step`), inclusive. Output size is bounded by
/// `EngineConfig::percentage_steps()`.
pub fn expand_route(config: &EngineConfig, route: &Route) -> Vec<Route> {
    let step = config.percentage_step.max(1);
    let mut out = Vec::with_capacity(config.percentage_steps());
    let mut pct = 100i32;
    while pct >= step as i32 {
        out.push(Route { percentage: pct as u8, ..route.clone() });
        pct -= step as i32;
    }
    out
}

/// Expand every candidate route in `routes`.
pub fn expand_routes(config: &EngineConfig, routes: &[Route]) -> Vec<Route> {
    routes.iter().flat_map(|r| expand_route(config, r)).collect()
}

/// A combination of percentage-tagged routes whose percentages sum to 100.
pub type Combination = Vec<Route>;

/// Pair each route in `combination` with the quote whose route matches
/// exactly (same percentage, same ordered pool-address sequence). Returns
/// `None` if any route in the combination lacks a matching quote - the
/// combination is dropped, not an error.
pub fn stitch(combination: &Combination, quotes: &[QuoteBasic]) -> Option<Vec<QuoteBasic>> {
    let mut stitched = Vec::with_capacity(combination.len());
    for route in combination {
        let matched = quotes.iter().find(|q| {
            q.route.percentage == route.percentage && q.route.same_shape(route)
        })?;
        stitched.push(matched.clone());
    }
    Some(stitched)
}

/// Stitch every combination, discarding those with no complete match.
pub fn stitch_all(combinations: &[Combination], quotes: &[QuoteBasic]) -> Vec<Vec<QuoteBasic>> {
    combinations.iter().filter_map(|c| stitch(c, quotes)).collect()
}
