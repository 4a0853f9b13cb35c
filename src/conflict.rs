use itertools::Itertools;
use ndarray::Array2;
use tracing::debug;

use crate::error::RoutingFailure;
use crate::route::Route;

/// Which routes cannot be used together because they pass through a common intermediate room.
///
/// Stored as a symmetric boolean matrix indexed by route position in the slice it was built from.
/// A route never conflicts with itself.
#[derive(Clone, Debug)]
pub struct ConflictMap {
    matrix: Array2<bool>,
}

/// Whether two routes share a room other than their first and last.
pub(crate) fn routes_conflict(a: &Route, b: &Route) -> Result<bool, RoutingFailure> {
    if a.is_empty() || b.is_empty() {
        return Err(RoutingFailure::EmptyRoute { stage: "conflict check" });
    }

    Ok(a.intermediates().iter().any(|room| b.intermediates().contains(room)))
}

impl ConflictMap {
    /// Compare every pair of `routes`.
    ///
    /// Fails if `routes` is empty or contains a route without rooms.
    pub fn build(routes: &[Route]) -> Result<Self, RoutingFailure> {
        if routes.is_empty() {
            return Err(RoutingFailure::EmptyInput { stage: "conflict analysis" });
        }
        if routes.iter().any(Route::is_empty) {
            return Err(RoutingFailure::EmptyRoute { stage: "conflict analysis" });
        }

        let mut matrix = Array2::from_elem((routes.len(), routes.len()), false);
        for (i, j) in (0..routes.len()).tuple_combinations() {
            if routes_conflict(&routes[i], &routes[j])? {
                matrix[[i, j]] = true;
                matrix[[j, i]] = true;
            }
        }

        debug!(routes = routes.len(), pairs = matrix.iter().filter(|c| **c).count() / 2, "built conflict map");
        Ok(Self { matrix })
    }

    /// Number of routes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    /// Whether no routes are covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether routes `a` and `b` conflict.
    #[inline]
    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        self.matrix[[a, b]]
    }

    /// Every route conflicting with route `index`, ascending.
    pub fn conflicts_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.matrix
            .row(index)
            .into_iter()
            .enumerate()
            .filter(|(_, conflict)| **conflict)
            .map(|(other, _)| other)
    }
}
