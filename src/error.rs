use thiserror::Error;

/// Reasons routing a farm may fail.
///
/// Variants fall in two groups, see [`Self::is_defect`].
/// Both are reported through the same channel and abort the run.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RoutingFailure {
    /// The farm has no start room or no end room.
    #[error("farm is missing its start and/or end room")]
    MissingTerminal,
    /// No simple path connects start to end.
    #[error("no valid routes between start and end rooms could be found")]
    NoRoutes,
    /// A route with no rooms reached a stage that needs at least start and end.
    #[error("route of zero length given to {stage}")]
    EmptyRoute {
        /// Stage that rejected the input.
        stage: &'static str,
    },
    /// A combination, route set or route list was empty.
    #[error("empty input given to {stage}")]
    EmptyInput {
        /// Stage that rejected the input.
        stage: &'static str,
    },
    /// A combination named a route that does not exist.
    #[error("route index {index} out of range for {len} known routes")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of known routes.
        len: usize,
    },
    /// A room was about to be given a second successor, i.e. it sits on two chosen routes.
    #[error("room {room} already has a next room (exists on multiple routes)")]
    NextOverwritten {
        /// Name of the room.
        room: String,
    },
    /// An ant was expected in a room which is empty.
    #[error("no ant present in room {room}")]
    NoAntPresent {
        /// Name of the room.
        room: String,
    },
    /// An ant stood in a room that has no successor on any chosen route.
    #[error("room {room} is not on a chosen route")]
    NotOnRoute {
        /// Name of the room.
        room: String,
    },
    /// A turn passed with no ant able to move while ants were still on their way.
    #[error("simulation stalled with {finished} of {ants} ants finished")]
    Stalled {
        /// Ants already at the end.
        finished: usize,
        /// Ants in total.
        ants: usize,
    },
    /// An ant tried to enter a room which already holds one.
    #[error("ant already present in room {room}")]
    RoomOccupied {
        /// Name of the room.
        room: String,
    },
}

impl RoutingFailure {
    /// Whether this failure indicates a bug in the engine rather than bad input.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::NextOverwritten { .. }
                | Self::NoAntPresent { .. }
                | Self::NotOnRoute { .. }
                | Self::Stalled { .. }
                | Self::RoomOccupied { .. }
        )
    }
}
