use std::fmt::{Display, Formatter};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::assignment::{assign_ants, Assignment};
use crate::error::RoutingFailure;
use crate::farm::Farm;
use crate::room::RoomId;
use crate::route::Route;

/// Ants are numbered from 1 in the order they leave the start.
pub type AntId = usize;

/// One ant entering one room.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Move {
    /// The ant moving.
    pub ant: AntId,
    /// Room it enters.
    pub room: RoomId,
}

/// Every move made during one turn, in the order they were made.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Turn(Vec<Move>);

impl Turn {
    /// Moves in order.
    pub fn moves(&self) -> &[Move] {
        &self.0
    }
}

/// State of one run of ants through a fixed set of non-conflicting routes.
///
/// Each [`step`](Self::step) first advances ants already on their way, scanning every route from the end backwards
/// so an ant always moves into a room its predecessor has just left, then sends new ants from the start onto
/// routes with ants still to send and a free first room. Ants entering the end leave the farm.
pub struct Simulation<'a> {
    farm: &'a Farm,
    routes: Vec<Route>,
    // ants still to send down each route
    quotas: Vec<usize>,
    occupants: Vec<Option<AntId>>,
    next: Vec<Option<RoomId>>,
    next_ant: AntId,
    finished: usize,
    moves: Vec<Move>,
}

/// Point every intermediate room of every route at its successor.
fn link_routes(farm: &Farm, routes: &[Route]) -> Result<Vec<Option<RoomId>>, RoutingFailure> {
    let mut next = vec![None; farm.room_count()];

    for route in routes {
        if route.len() < 2 {
            return Err(RoutingFailure::EmptyRoute { stage: "simulation" });
        }
        for pair in route.rooms()[1..].windows(2) {
            let slot = &mut next[pair[0].index()];
            if slot.is_some() {
                return Err(RoutingFailure::NextOverwritten { room: farm.name(pair[0]).to_owned() });
            }
            *slot = Some(pair[1]);
        }
    }

    Ok(next)
}

impl<'a> Simulation<'a> {
    /// Prepare to send all of the farm's ants down `routes`, spread by [`assign_ants`].
    pub fn new(farm: &'a Farm, routes: Vec<Route>) -> Result<Self, RoutingFailure> {
        let assignment = assign_ants(&routes, farm.ants())?;
        Self::with_assignment(farm, routes, assignment)
    }

    /// Prepare to send ants down `routes` according to `assignment`.
    ///
    /// Fails if a room lies on two routes or the assignment does not cover every route.
    pub fn with_assignment(farm: &'a Farm, routes: Vec<Route>, assignment: Assignment) -> Result<Self, RoutingFailure> {
        if routes.is_empty() {
            return Err(RoutingFailure::EmptyInput { stage: "simulation" });
        }
        if assignment.counts().len() != routes.len() {
            return Err(RoutingFailure::IndexOutOfRange { index: routes.len() - 1, len: assignment.counts().len() });
        }
        let next = link_routes(farm, &routes)?;

        Ok(Self {
            farm,
            quotas: assignment.0,
            routes,
            occupants: vec![None; farm.room_count()],
            next,
            next_ant: 1,
            finished: 0,
            moves: Vec::new(),
        })
    }

    /// Total ants to deliver.
    #[inline]
    pub fn ants(&self) -> usize {
        self.farm.ants()
    }

    /// Ants that have reached the end.
    pub fn finished(&self) -> usize {
        self.finished
    }

    /// Whether every ant has reached the end.
    pub fn is_done(&self) -> bool {
        self.finished >= self.ants()
    }

    /// Ant currently in `room`, if any.
    pub fn occupant(&self, room: RoomId) -> Option<AntId> {
        self.occupants[room.index()]
    }

    /// Every occupied room with the ant in it.
    pub fn occupants(&self) -> impl Iterator<Item = (RoomId, AntId)> + '_ {
        self.occupants
            .iter()
            .enumerate()
            .filter_map(|(index, ant)| ant.map(|ant| (RoomId(index), ant)))
    }

    /// Routes ants are sent down.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    fn placed(&self) -> usize {
        self.next_ant - 1
    }

    /// Move the ant in `room` one room along its route.
    ///
    /// Fails if `room` is empty or the next room already holds an ant; both mean the run has gone wrong.
    pub(crate) fn move_ant(&mut self, room: RoomId) -> Result<(), RoutingFailure> {
        let ant = self.occupants[room.index()]
            .ok_or_else(|| RoutingFailure::NoAntPresent { room: self.farm.name(room).to_owned() })?;
        let destination = self.next[room.index()]
            .ok_or_else(|| RoutingFailure::NotOnRoute { room: self.farm.name(room).to_owned() })?;

        if self.occupants[destination.index()].is_some() {
            return Err(RoutingFailure::RoomOccupied { room: self.farm.name(destination).to_owned() });
        }

        self.occupants[room.index()] = None;
        if self.farm.is_end(destination) {
            self.finished += 1;
        } else {
            self.occupants[destination.index()] = Some(ant);
        }
        self.moves.push(Move { ant, room: destination });

        Ok(())
    }

    fn advance(&mut self) -> Result<(), RoutingFailure> {
        for route in 0..self.routes.len() {
            let len = self.routes[route].len();
            for position in (1..len - 1).rev() {
                let room = self.routes[route].rooms()[position];
                if self.occupants[room.index()].is_some() {
                    self.move_ant(room)?;
                }
            }
        }

        Ok(())
    }

    fn introduce(&mut self) -> Result<(), RoutingFailure> {
        for route in 0..self.routes.len() {
            if self.placed() >= self.ants() {
                break;
            }
            if self.quotas[route] == 0 {
                continue;
            }

            let first = self.routes[route].first_step().ok_or(RoutingFailure::EmptyRoute { stage: "simulation" })?;
            if self.farm.is_end(first) {
                // a start-end link holds no ant, so the whole quota crosses at once
                while self.quotas[route] > 0 && self.placed() < self.ants() {
                    self.moves.push(Move { ant: self.next_ant, room: first });
                    self.finished += 1;
                    self.next_ant += 1;
                    self.quotas[route] -= 1;
                }
            } else if self.occupants[first.index()].is_none() {
                self.occupants[first.index()] = Some(self.next_ant);
                self.moves.push(Move { ant: self.next_ant, room: first });
                self.next_ant += 1;
                self.quotas[route] -= 1;
            }
        }

        Ok(())
    }

    /// Play one turn: advance ants on their way, then send new ones out.
    ///
    /// Fails with [`RoutingFailure::Stalled`] if nothing could move while ants remain.
    pub fn step(&mut self) -> Result<Turn, RoutingFailure> {
        self.advance()?;
        self.introduce()?;

        let turn = Turn(std::mem::take(&mut self.moves));
        if turn.0.is_empty() && !self.is_done() {
            return Err(RoutingFailure::Stalled { finished: self.finished, ants: self.ants() });
        }
        trace!(moves = turn.0.len(), finished = self.finished, "turn");

        Ok(turn)
    }

    /// Play turns until every ant has reached the end.
    pub fn run(mut self) -> Result<Plan<'a>, RoutingFailure> {
        let mut turns = Vec::new();
        while !self.is_done() {
            turns.push(self.step()?);
        }

        debug!(turns = turns.len(), ants = self.finished, "simulation complete");
        Ok(Plan { farm: self.farm, turns })
    }
}

/// The full, turn by turn, list of moves taking every ant from start to end.
///
/// Displays as one line per turn of `L<ant>-<room>` tokens, with a blank line before and after.
pub struct Plan<'a> {
    farm: &'a Farm,
    turns: Vec<Turn>,
}

impl Plan<'_> {
    /// Every turn, first to last.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of moves over the whole plan.
    pub fn move_count(&self) -> usize {
        self.turns.iter().map(|turn| turn.0.len()).sum()
    }

    /// The line printed for each turn.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.turns.iter().map(|turn| {
            turn.0
                .iter()
                .map(|m| format!("L{}-{}", m.ant, self.farm.name(m.room)))
                .join(" ")
        })
    }
}

impl Display for Plan<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::assignment::Assignment;
    use crate::builder::FarmBuilder;
    use crate::error::RoutingFailure;
    use crate::farm::Farm;
    use crate::room::{Coords, RoomRole};
    use crate::route::enumerate_routes;

    use super::Simulation;

    // s - a - b - e, with x hanging off a
    fn corridor() -> Farm {
        FarmBuilder::with_ants(2)
            .add_room("s", Coords(0, 0), RoomRole::Start)
            .add_room("a", Coords(1, 0), RoomRole::Intermediate)
            .add_room("b", Coords(2, 0), RoomRole::Intermediate)
            .add_room("e", Coords(3, 0), RoomRole::End)
            .add_room("x", Coords(1, 1), RoomRole::Intermediate)
            .add_link("s", "a")
            .add_link("a", "b")
            .add_link("b", "e")
            .add_link("a", "x")
            .build()
            .unwrap()
    }

    fn id(farm: &Farm, name: &str) -> usize {
        farm.room_id(name).unwrap().index()
    }

    #[test]
    fn move_from_empty_room() {
        let farm = corridor();
        let mut simulation = Simulation::new(&farm, enumerate_routes(&farm).unwrap()).unwrap();

        let err = simulation.move_ant(farm.room_id("a").unwrap()).unwrap_err();
        assert_eq!(err, RoutingFailure::NoAntPresent { room: "a".to_owned() });
        assert!(err.is_defect());
    }

    #[test]
    fn move_into_occupied_room() {
        let farm = corridor();
        let mut simulation = Simulation::new(&farm, enumerate_routes(&farm).unwrap()).unwrap();
        simulation.occupants[id(&farm, "a")] = Some(1);
        simulation.occupants[id(&farm, "b")] = Some(2);

        let err = simulation.move_ant(farm.room_id("a").unwrap()).unwrap_err();
        assert_eq!(err, RoutingFailure::RoomOccupied { room: "b".to_owned() });
        assert!(err.is_defect());
        assert_eq!(simulation.occupant(farm.room_id("a").unwrap()), Some(1));
    }

    #[test]
    fn move_off_route() {
        let farm = corridor();
        let mut simulation = Simulation::new(&farm, enumerate_routes(&farm).unwrap()).unwrap();
        simulation.occupants[id(&farm, "x")] = Some(1);

        assert_eq!(
            simulation.move_ant(farm.room_id("x").unwrap()),
            Err(RoutingFailure::NotOnRoute { room: "x".to_owned() })
        );
    }

    #[test]
    fn move_into_end() {
        let farm = corridor();
        let mut simulation = Simulation::new(&farm, enumerate_routes(&farm).unwrap()).unwrap();
        simulation.occupants[id(&farm, "b")] = Some(1);

        simulation.move_ant(farm.room_id("b").unwrap()).unwrap();
        assert_eq!(simulation.finished(), 1);
        assert_eq!(simulation.occupants().count(), 0);
    }

    #[test]
    fn nothing_to_send() {
        let farm = corridor();
        let routes = enumerate_routes(&farm).unwrap();
        let mut simulation = Simulation::with_assignment(&farm, routes, Assignment(vec![0])).unwrap();

        assert_eq!(simulation.step(), Err(RoutingFailure::Stalled { finished: 0, ants: 2 }));
    }

    #[test]
    fn assignment_must_cover_routes() {
        let farm = corridor();
        let routes = enumerate_routes(&farm).unwrap();

        assert!(matches!(
            Simulation::with_assignment(&farm, routes, Assignment(vec![1, 1])),
            Err(RoutingFailure::IndexOutOfRange { .. })
        ));
        assert_eq!(
            Simulation::with_assignment(&farm, vec![], Assignment(vec![])).err(),
            Some(RoutingFailure::EmptyInput { stage: "simulation" })
        );
    }
}
