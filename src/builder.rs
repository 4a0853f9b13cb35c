//! Incremental, validated construction of [`Farm`](crate::Farm)s.

use std::collections::{HashMap, HashSet};

use petgraph::graphmap::UnGraphMap;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::farm::Farm;
use crate::room::{Coords, Room, RoomId, RoomRole};

/// Default upper bound on the number of ants a farm may hold.
pub const MAX_ANTS: usize = 1_000_000;

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuilderInvalidReason {
    /// A second room was given a name already in use.
    #[error("duplicate room name: {0}")]
    DuplicateName(String),
    /// A second room was placed at coordinates already in use.
    #[error("duplicate room coordinates for rooms {0} and {1}")]
    DuplicateCoords(String, String),
    /// More than one room was marked as the start.
    #[error("multiple start rooms")]
    DuplicateStart,
    /// More than one room was marked as the end.
    #[error("multiple end rooms")]
    DuplicateEnd,
    /// A link names a room which was never added.
    #[error("link references non-existent room: {0}")]
    UnknownRoom(String),
    /// A link connects a room to itself.
    #[error("room connects to itself: {0}")]
    SelfLink(String),
    /// The same two rooms were linked twice, in either order.
    #[error("link already exists: {0}-{1}")]
    DuplicateLink(String, String),
    /// No room was marked as the start.
    #[error("no start room")]
    MissingStart,
    /// No room was marked as the end.
    #[error("no end room")]
    MissingEnd,
    /// Fewer than two rooms were added.
    #[error("less than 2 rooms, got {0}")]
    TooFewRooms(usize),
    /// No links were added.
    #[error("no links")]
    NoLinks,
    /// The ant count is zero.
    #[error("number of ants must be a positive integer")]
    NoAnts,
    /// The ant count exceeds the configured maximum.
    #[error("maximum number of ants ({max}) exceeded, found {found}")]
    TooManyAnts {
        /// Configured maximum.
        max: usize,
        /// Requested count.
        found: usize,
    },
}

/// A builder for [`Farm`]s.
///
/// Rooms and links are added one at a time; problems which can be spotted immediately put the builder into an invalid state,
/// after which further additions do nothing. Completeness (start, end, links, ant count) is checked by [`Self::build`].
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
#[derive(Clone)]
pub struct FarmBuilder {
    ants: usize,
    max_ants: usize,
    rooms: Vec<Room>,
    names: HashMap<String, RoomId>,
    coords: HashMap<Coords, RoomId>,
    start: Option<RoomId>,
    end: Option<RoomId>,
    links: Vec<(RoomId, RoomId)>,
    link_set: HashSet<UnorderedPair<RoomId>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for FarmBuilder {
    fn default() -> Self {
        Self::with_ants(1)
    }
}

impl FarmBuilder {
    /// Construct a new builder for a farm holding `ants` ants.
    pub fn with_ants(ants: usize) -> Self {
        Self {
            ants,
            max_ants: MAX_ANTS,

            rooms: Default::default(),
            names: Default::default(),
            coords: Default::default(),
            start: None,
            end: None,
            links: Default::default(),
            link_set: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    /// Override the largest ant count [`Self::build`] accepts. Defaults to [`MAX_ANTS`].
    pub fn max_ants(&mut self, max_ants: usize) -> &mut Self {
        self.max_ants = max_ants;
        self
    }

    /// Add a room called `name` at `coords` playing `role`.
    ///
    /// May cause the builder to enter an invalid state if the name or coordinates are already taken,
    /// or if a second start or end room is added.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_room(&mut self, name: &str, coords: Coords, role: RoomRole) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.names.contains_key(name) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateName(name.to_owned()));
            return self;
        }
        if let Some(existing) = self.coords.get(&coords) {
            let existing = self.rooms[existing.index()].name.clone();
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateCoords(existing, name.to_owned()));
            return self;
        }

        let id = RoomId(self.rooms.len());
        match role {
            RoomRole::Start if self.start.is_some() => {
                self.invalid_reasons.push(BuilderInvalidReason::DuplicateStart);
                return self;
            }
            RoomRole::End if self.end.is_some() => {
                self.invalid_reasons.push(BuilderInvalidReason::DuplicateEnd);
                return self;
            }
            RoomRole::Start => self.start = Some(id),
            RoomRole::End => self.end = Some(id),
            RoomRole::Intermediate => {}
        }

        self.names.insert(name.to_owned(), id);
        self.coords.insert(coords, id);
        self.rooms.push(Room { name: name.to_owned(), coords, role });

        self
    }

    /// Link the rooms named `a` and `b`. Links are undirected; the order in which links are added
    /// is the order in which routes explore them.
    ///
    /// May cause the builder to enter an invalid state if either room is unknown, if `a == b`, or if the link already exists.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_link(&mut self, a: &str, b: &str) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if a == b {
            self.invalid_reasons.push(BuilderInvalidReason::SelfLink(a.to_owned()));
            return self;
        }

        let ids = [a, b].map(|name| self.names.get(name).copied().ok_or(name));
        let (id_a, id_b) = match ids {
            [Ok(id_a), Ok(id_b)] => (id_a, id_b),
            [Err(missing), _] | [_, Err(missing)] => {
                self.invalid_reasons.push(BuilderInvalidReason::UnknownRoom(missing.to_owned()));
                return self;
            }
        };

        if !self.link_set.insert(UnorderedPair(id_a, id_b)) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateLink(a.to_owned(), b.to_owned()));
            return self;
        }
        self.links.push((id_a, id_b));

        self
    }

    /// Check the validity of this builder so far, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Completeness checks are left to [`Self::build`].
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    fn completeness_reasons(&self) -> Vec<BuilderInvalidReason> {
        let mut reasons = Vec::new();

        if self.ants == 0 {
            reasons.push(BuilderInvalidReason::NoAnts);
        } else if self.ants > self.max_ants {
            reasons.push(BuilderInvalidReason::TooManyAnts { max: self.max_ants, found: self.ants });
        }
        if self.start.is_none() {
            reasons.push(BuilderInvalidReason::MissingStart);
        }
        if self.end.is_none() {
            reasons.push(BuilderInvalidReason::MissingEnd);
        }
        if self.rooms.len() < 2 {
            reasons.push(BuilderInvalidReason::TooFewRooms(self.rooms.len()));
        }
        if self.links.is_empty() {
            reasons.push(BuilderInvalidReason::NoLinks);
        }

        reasons
    }

    /// Convert the state of this builder into a [`Farm`].
    /// If the builder is invalid for any reason, a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Farm, Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }
        let reasons = self.completeness_reasons();
        if !reasons.is_empty() {
            return Err(reasons);
        }

        let mut graph = UnGraphMap::with_capacity(self.rooms.len(), self.links.len());
        for index in 0..self.rooms.len() {
            graph.add_node(RoomId(index));
        }
        for (a, b) in &self.links {
            graph.add_edge(*a, *b, ());
        }

        Ok(Farm {
            graph,
            rooms: self.rooms.clone(),
            by_name: self.names.clone(),
            links: self.links.clone(),
            start: self.start,
            end: self.end,
            ants: self.ants,
        })
    }
}
