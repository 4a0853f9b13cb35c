use itertools::Itertools;

use crate::error::RoutingFailure;
use crate::route::Route;

/// Number of ants sent down each route of a route set, by position in that set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assignment(pub(crate) Vec<usize>);

impl Assignment {
    /// Ants allotted to route `index`; zero for routes outside the set.
    pub fn get(&self, index: usize) -> usize {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// Per-route counts.
    pub fn counts(&self) -> &[usize] {
        &self.0
    }

    /// Ants assigned overall.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Spread `ants` over `route_set`, one ant at a time, each to the route with the smallest
/// (ants already assigned + route length). Ties go to the earliest route.
///
/// This balances projected arrival rather than raw counts: a longer route needs fewer ants to keep up.
pub fn assign_ants(route_set: &[Route], ants: usize) -> Result<Assignment, RoutingFailure> {
    if route_set.is_empty() {
        return Err(RoutingFailure::EmptyInput { stage: "ant assignment" });
    }

    let mut counts = vec![0; route_set.len()];
    for _ in 0..ants {
        let best = (0..route_set.len())
            .position_min_by_key(|index| counts[*index] + route_set[*index].len())
            .ok_or(RoutingFailure::EmptyInput { stage: "ant assignment" })?;
        counts[best] += 1;
    }

    Ok(Assignment(counts))
}
