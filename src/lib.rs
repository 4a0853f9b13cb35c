#![warn(missing_docs)]

//! # `lemin`
//!
//! A router for the "lem-in" ant farm puzzle: move every ant from the start room to the end room in as few turns as possible,
//! never putting two ants in the same room (start and end excepted) and moving each ant at most one link per turn.
//! Build a farm with [`FarmBuilder`] or [`parse`] one from text, then call [`solve()`](crate::Farm::solve),
//! yielding a [`Plan`] that displays as the usual `L<ant>-<room>` lines.
//!
//! # Internals
//! Given a farm, express it as an undirected graph G whose vertices are rooms.
//!
//! 1. Every simple path from start to end is enumerated by depth-first search, in link declaration order.
//! 2. Two paths conflict if they share a room other than start and end; conflicting paths cannot carry ants together.
//! 3. Every conflict-free set of paths is grown from single-path seeds and rated by spreading the ants greedily over it:
//!    each ant goes to the path minimizing (ants already on it + its length).
//!    The rating is the pair (turns, total moves), compared turns first.
//! 4. The best rated set is played out turn by turn. Each turn ants already on their way advance, scanning every path
//!    from the end backwards so an ant only ever steps into a room just vacated; then new ants leave the start onto
//!    paths with ants still to send.
//!
//! All state that changes during a run lives in the run itself; a [`Farm`] is never mutated and can be solved any number of times.

pub use assignment::{assign_ants, Assignment};
pub use builder::{BuilderInvalidReason, FarmBuilder, MAX_ANTS};
pub use combination::{Combination, CombinationSearch};
pub use conflict::ConflictMap;
pub use error::RoutingFailure;
pub use farm::Farm;
pub use parser::{parse, parse_with_max_ants, read_farm, read_farm_with_max_ants, ParseError};
pub use rating::{compile_routes, rate_combination, Rating, Selection, Selector};
pub use room::{Coords, Room, RoomId, RoomRole};
pub use route::{enumerate_routes, Route};
pub use simulation::{AntId, Move, Plan, Simulation, Turn};

pub(crate) mod assignment;
pub mod builder;
pub(crate) mod combination;
pub(crate) mod conflict;
pub(crate) mod error;
pub(crate) mod farm;
pub(crate) mod parser;
pub(crate) mod rating;
pub(crate) mod room;
pub(crate) mod route;
pub(crate) mod simulation;
