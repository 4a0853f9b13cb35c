use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use petgraph::graphmap::UnGraphMap;
use tracing::debug;

use crate::conflict::ConflictMap;
use crate::error::RoutingFailure;
use crate::rating::Selector;
use crate::room::{Room, RoomId, RoomRole};
use crate::route::enumerate_routes;
use crate::simulation::{Plan, Simulation};

/// A validated ant farm: named rooms, undirected links, a start, an end and a number of ants.
///
/// [`Farm`]s should be built using a [`FarmBuilder`](crate::builder::FarmBuilder) or [`parse`](crate::parse)d from text.
/// Once built a farm is never mutated; every run keeps its own state.
pub struct Farm {
    pub(crate) graph: UnGraphMap<RoomId, ()>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) by_name: HashMap<String, RoomId>,
    // links in the order they were declared, for echoing
    pub(crate) links: Vec<(RoomId, RoomId)>,
    pub(crate) start: Option<RoomId>,
    pub(crate) end: Option<RoomId>,
    pub(crate) ants: usize,
}

impl Farm {
    /// Number of ants waiting in the start room.
    pub fn ants(&self) -> usize {
        self.ants
    }

    /// The start room, if any.
    pub fn start(&self) -> Option<RoomId> {
        self.start
    }

    /// The end room, if any.
    pub fn end(&self) -> Option<RoomId> {
        self.end
    }

    /// The room with id `id`.
    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    /// Name of room `id`.
    #[inline]
    pub fn name(&self, id: RoomId) -> &str {
        &self.rooms[id.index()].name
    }

    /// Look up a room by name.
    pub fn room_id(&self, name: &str) -> Option<RoomId> {
        self.by_name.get(name).copied()
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Neighbors of `id`, in the order their links were declared.
    pub fn neighbors(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.graph.neighbors(id)
    }

    #[inline]
    pub(crate) fn is_end(&self, id: RoomId) -> bool {
        self.end == Some(id)
    }

    /// Route every ant from start to end in as few turns as possible, then with as few moves as possible.
    ///
    /// Enumerates all simple routes, picks the best conflict-free subset of them,
    /// spreads the ants across that subset and plays the moves out turn by turn.
    /// Fails with [`RoutingFailure::NoRoutes`] before any simulation if start and end are not connected.
    pub fn solve(&self) -> Result<Plan<'_>, RoutingFailure> {
        let routes = enumerate_routes(self)?;
        let conflicts = ConflictMap::build(&routes)?;
        let selection = Selector::new(&routes, self.ants).run(&conflicts)?;
        debug!(
            combination = ?selection.combination(),
            turns = selection.rating().turns,
            moves = selection.rating().moves,
            "selected route combination"
        );

        Simulation::new(self, selection.into_routes())?.run()
    }
}

impl Display for Farm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.ants)?;
        for room in &self.rooms {
            match room.role {
                RoomRole::Start => writeln!(f, "##start")?,
                RoomRole::End => writeln!(f, "##end")?,
                RoomRole::Intermediate => {}
            }
            writeln!(f, "{}", room)?;
        }
        for (a, b) in &self.links {
            writeln!(f, "{}-{}", self.name(*a), self.name(*b))?;
        }

        Ok(())
    }
}
