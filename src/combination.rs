use std::collections::HashSet;

use itertools::Itertools;

use crate::conflict::ConflictMap;

/// A set of route indices, none of which conflict with each other.
///
/// Indices are kept sorted, so two combinations holding the same routes compare equal.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Combination(Vec<usize>);

impl Combination {
    /// A combination holding only route `index`.
    pub fn single(index: usize) -> Self {
        Self(vec![index])
    }

    /// Route indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of routes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no route is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether route `index` is held.
    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    /// Whether route `candidate` could join this combination.
    pub fn admits(&self, conflicts: &ConflictMap, candidate: usize) -> bool {
        !self.contains(candidate) && self.0.iter().all(|member| !conflicts.conflicts(*member, candidate))
    }

    /// A new combination with `index` added.
    fn with(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        let position = indices.binary_search(&index).unwrap_or_else(|position| position);
        indices.insert(position, index);
        Self(indices)
    }
}

impl From<Vec<usize>> for Combination {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices.into_iter().sorted().dedup().collect())
    }
}

/// Explores conflict-free combinations by growing seeds one compatible route at a time.
///
/// A combination is produced at most once over the lifetime of the search; once produced, its supersets
/// have been produced too, so meeting it again from another seed is skipped entirely.
pub struct CombinationSearch<'a> {
    conflicts: &'a ConflictMap,
    seen: HashSet<Combination>,
}

impl<'a> CombinationSearch<'a> {
    /// Start a search with nothing seen yet.
    pub fn new(conflicts: &'a ConflictMap) -> Self {
        Self { conflicts, seen: HashSet::new() }
    }

    /// `seed` followed by every conflict-free superset of it reachable by adding compatible routes,
    /// leaving out whatever this search has produced before.
    pub fn expand(&mut self, seed: Combination) -> Vec<Combination> {
        if !self.seen.insert(seed.clone()) {
            return Vec::new();
        }

        let mut found = Vec::new();
        for candidate in 0..self.conflicts.len() {
            if seed.admits(self.conflicts, candidate) {
                found.extend(self.expand(seed.with(candidate)));
            }
        }
        found.insert(0, seed);

        found
    }

    /// Every conflict-free combination, seeding once with each route in turn.
    pub fn all(mut self) -> Vec<Combination> {
        (0..self.conflicts.len())
            .flat_map(|seed| self.expand(Combination::single(seed)))
            .collect()
    }
}
