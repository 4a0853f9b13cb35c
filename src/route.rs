use std::fmt::{Display, Formatter};

use itertools::Itertools;
use tracing::debug;

use crate::error::RoutingFailure;
use crate::farm::Farm;
use crate::room::RoomId;

/// A simple walk from the start room to the end room, both included.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Route(pub(crate) Vec<RoomId>);

impl Route {
    /// Rooms from start to end.
    pub fn rooms(&self) -> &[RoomId] {
        &self.0
    }

    /// Number of rooms on this route, counting start and end.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the route holds no rooms at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rooms strictly between start and end.
    pub fn intermediates(&self) -> &[RoomId] {
        match self.0.len() {
            0..=2 => &[],
            len => &self.0[1..len - 1],
        }
    }

    /// The room an ant enters when it leaves the start along this route.
    pub fn first_step(&self) -> Option<RoomId> {
        self.0.get(1).copied()
    }

    /// Whether this route links start to end with no room in between.
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.0.len() == 2
    }

    /// Render the route as space separated room names.
    pub fn display<'a>(&'a self, farm: &'a Farm) -> impl Display + 'a {
        RouteDisplay { route: self, farm }
    }
}

struct RouteDisplay<'a> {
    route: &'a Route,
    farm: &'a Farm,
}

impl Display for RouteDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.route.0.iter().map(|id| self.farm.name(*id)).join(" "))
    }
}

struct RouteSearch<'a> {
    farm: &'a Farm,
    end: RoomId,
    visited: Vec<bool>,
    path: Vec<RoomId>,
    found: Vec<Route>,
}

impl RouteSearch<'_> {
    fn descend(&mut self, room: RoomId) {
        if self.visited[room.index()] {
            return;
        }

        self.path.push(room);
        if room == self.end {
            // routes stop at the end; it is never passed through
            self.found.push(Route(self.path.clone()));
        } else {
            self.visited[room.index()] = true;
            let farm = self.farm;
            for next in farm.neighbors(room) {
                self.descend(next);
            }
            self.visited[room.index()] = false;
        }
        self.path.pop();
    }
}

/// Find every simple route from the farm's start to its end.
///
/// Neighbors are explored in link declaration order, so the result is reproducible for a given farm.
/// The routes come back stably sorted by ascending length; later stages refer to routes by their index in this order.
///
/// Fails with [`RoutingFailure::MissingTerminal`] if the farm lacks a start or end,
/// and with [`RoutingFailure::NoRoutes`] if the two are not connected.
pub fn enumerate_routes(farm: &Farm) -> Result<Vec<Route>, RoutingFailure> {
    let (Some(start), Some(end)) = (farm.start(), farm.end()) else {
        return Err(RoutingFailure::MissingTerminal);
    };

    let mut search = RouteSearch {
        farm,
        end,
        visited: vec![false; farm.room_count()],
        path: Vec::new(),
        found: Vec::new(),
    };
    search.descend(start);

    let mut routes = search.found;
    if routes.is_empty() {
        return Err(RoutingFailure::NoRoutes);
    }
    routes.sort_by_key(Route::len);

    debug!(count = routes.len(), shortest = routes[0].len(), "enumerated routes");
    Ok(routes)
}
