use std::fmt::{Display, Formatter};

use strum::{Display as StrumDisplay, EnumString, VariantArray};

/// Index of a room in its [`Farm`](crate::Farm)'s room table.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RoomId(pub(crate) usize);

impl RoomId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// The part a room plays in the farm. Every farm has exactly one start and one end.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, EnumString, StrumDisplay, VariantArray)]
#[strum(serialize_all = "lowercase")]
pub enum RoomRole {
    /// Where every ant begins.
    Start,
    /// Where every ant must arrive. Holds any number of ants.
    End,
    /// Any other room; holds at most one ant at a time.
    #[default]
    Intermediate,
}

/// A position `(x, y)` as written in the farm description. Only used to reject duplicates.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Coords(pub i64, pub i64);

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

/// A named room of a farm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Room {
    pub(crate) name: String,
    pub(crate) coords: Coords,
    pub(crate) role: RoomRole,
}

impl Room {
    /// Room name, unique within its farm.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinates as given.
    pub fn coords(&self) -> Coords {
        self.coords
    }

    /// Start, end or neither.
    pub fn role(&self) -> RoomRole {
        self.role
    }

    /// Whether this is the start or end room.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.role != RoomRole::Intermediate
    }
}

impl Display for Room {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.coords)
    }
}
