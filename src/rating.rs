use tracing::{debug, trace};

use crate::assignment::{assign_ants, Assignment};
use crate::combination::{Combination, CombinationSearch};
use crate::conflict::ConflictMap;
use crate::error::RoutingFailure;
use crate::route::Route;

/// Cost of a route combination: turns first, then total ant moves. Lower is better on both.
///
/// The derived ordering compares `turns` before `moves`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Rating {
    /// Turns until the last ant arrives.
    pub turns: usize,
    /// Edges traversed, summed over all ants.
    pub moves: usize,
}

impl Rating {
    /// Rate `route_set`, sorted by ascending length, carrying `assignment`.
    ///
    /// The shortest route bounds when the last ant can arrive: its load plus its intermediate hops, at least one.
    /// A direct start-end route drains in a single turn whatever its load, so when it is the shortest the
    /// slowest of the remaining loaded routes decides instead.
    pub fn of(route_set: &[Route], assignment: &Assignment) -> Result<Self, RoutingFailure> {
        let shortest = route_set.first().ok_or(RoutingFailure::EmptyInput { stage: "rating" })?;
        if route_set.iter().any(Route::is_empty) {
            return Err(RoutingFailure::EmptyRoute { stage: "rating" });
        }

        let turns = if shortest.is_direct() {
            route_set
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(index, _)| assignment.get(*index) > 0)
                .map(|(index, route)| assignment.get(index) + hops(route))
                .max()
                .unwrap_or(1)
        } else {
            assignment.get(0) + hops(shortest)
        };

        let moves = route_set
            .iter()
            .enumerate()
            .map(|(index, route)| assignment.get(index) * (route.len() - 1))
            .sum();

        Ok(Self { turns, moves })
    }
}

#[inline]
fn hops(route: &Route) -> usize {
    route.len().saturating_sub(2).max(1)
}

/// Collect the routes named by `combination`, stably sorted by ascending length.
///
/// Fails if either input is empty or an index does not name a route.
pub fn compile_routes(routes: &[Route], combination: &Combination) -> Result<Vec<Route>, RoutingFailure> {
    if routes.is_empty() || combination.is_empty() {
        return Err(RoutingFailure::EmptyInput { stage: "route compilation" });
    }

    let mut route_set = Vec::with_capacity(combination.len());
    for index in combination.indices() {
        let route = routes.get(*index).ok_or(RoutingFailure::IndexOutOfRange { index: *index, len: routes.len() })?;
        route_set.push(route.clone());
    }
    route_set.sort_by_key(Route::len);

    Ok(route_set)
}

/// Compile `combination`, spread `ants` over it and rate the result.
pub fn rate_combination(routes: &[Route], combination: &Combination, ants: usize) -> Result<(Rating, Vec<Route>), RoutingFailure> {
    let route_set = compile_routes(routes, combination)?;
    let assignment = assign_ants(&route_set, ants)?;
    let rating = Rating::of(&route_set, &assignment)?;

    Ok((rating, route_set))
}

/// The best combination found by a [`Selector`], with its compiled routes.
#[derive(Clone, Debug)]
pub struct Selection {
    combination: Combination,
    rating: Rating,
    routes: Vec<Route>,
}

impl Selection {
    /// The chosen route indices.
    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    /// How the choice rated.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// The chosen routes, sorted by ascending length.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Give up the chosen routes.
    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }
}

/// Keeps the best rated combination seen so far. The first combination considered is always kept;
/// after that a combination must rate strictly better to replace it.
pub struct Selector<'a> {
    routes: &'a [Route],
    ants: usize,
    best: Option<Selection>,
}

impl<'a> Selector<'a> {
    /// A selector rating combinations of `routes` for `ants` ants.
    pub fn new(routes: &'a [Route], ants: usize) -> Self {
        Self { routes, ants, best: None }
    }

    /// Rate `combination` and keep it if it beats the current best. Returns whether it was kept.
    pub fn consider(&mut self, combination: Combination) -> Result<bool, RoutingFailure> {
        let (rating, routes) = rate_combination(self.routes, &combination, self.ants)?;

        let better = match &self.best {
            None => true,
            Some(best) => rating < best.rating,
        };
        if better {
            trace!(combination = ?combination.indices(), turns = rating.turns, moves = rating.moves, "new best combination");
            self.best = Some(Selection { combination, rating, routes });
        }

        Ok(better)
    }

    /// Best combination so far.
    pub fn best(&self) -> Option<&Selection> {
        self.best.as_ref()
    }

    /// Search every conflict-free combination reachable from each single route and return the best.
    pub fn run(mut self, conflicts: &ConflictMap) -> Result<Selection, RoutingFailure> {
        let mut search = CombinationSearch::new(conflicts);
        let mut considered = 0usize;

        for seed in 0..conflicts.len() {
            for combination in search.expand(Combination::single(seed)) {
                self.consider(combination)?;
                considered += 1;
            }
        }

        debug!(considered, "rated route combinations");
        self.best.ok_or(RoutingFailure::EmptyInput { stage: "route selection" })
    }
}
