use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::builder::{BuilderInvalidReason, FarmBuilder, MAX_ANTS};
use crate::farm::Farm;
use crate::room::{Coords, RoomRole};

static ANTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-?[0-9]+\s*$").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[^#].*$").unwrap());
static START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##start\s*$").unwrap());
static END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##end\s*$").unwrap());
static ROOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[a-zA-Z0-9]+\s+-?[0-9]+\s+-?[0-9]+\s*$").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[a-zA-Z0-9]+\s*-\s*[a-zA-Z0-9]+\s*$").unwrap());
static EMPTY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*$").unwrap());

/// Coordinates may not exceed this many digits.
const MAX_COORD_DIGITS: usize = 10;

/// Reasons farm text could not be turned into a [`Farm`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The farm file could not be read.
    #[error("the specified file could not be read")]
    Io(#[from] std::io::Error),
    /// The input has no content.
    #[error("the input is empty")]
    Empty,
    /// A line matches none of the known line kinds.
    #[error("line {number} is incorrectly formatted: {line}")]
    InvalidLine {
        /// One-based line number.
        number: usize,
        /// The offending line.
        line: String,
    },
    /// No line gives the ant count.
    #[error("no ant count found")]
    NoAntCount,
    /// More than one line gives an ant count.
    #[error("multiple ant counts found")]
    MultipleAntCounts,
    /// The ant count is not a usable integer.
    #[error("ant count is not a valid number: {0}")]
    AntCount(String),
    /// `##start` or `##end` appears twice.
    #[error("multiple {0} room markers")]
    DuplicateMarker(RoomRole),
    /// A `##start` or `##end` marker is not followed by a room.
    #[error("{0} room marker is not followed by a room")]
    MarkerWithoutRoom(RoomRole),
    /// A coordinate has too many digits.
    #[error("coordinates may not exceed {} digits, got {value} for room {room}", MAX_COORD_DIGITS)]
    CoordinateTooLong {
        /// Room the coordinate belongs to.
        room: String,
        /// The coordinate as written.
        value: String,
    },
    /// The rooms and links do not describe a valid farm.
    #[error("invalid farm: {}", .0.iter().join("; "))]
    Invalid(Vec<BuilderInvalidReason>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Line<'a> {
    Ants(&'a str),
    Marker(RoomRole),
    Room(&'a str),
    Link(&'a str),
    Ignored,
}

fn classify(line: &str) -> Option<Line<'_>> {
    if EMPTY.is_match(line) || COMMENT.is_match(line) {
        Some(Line::Ignored)
    } else if START.is_match(line) {
        Some(Line::Marker(RoomRole::Start))
    } else if END.is_match(line) {
        Some(Line::Marker(RoomRole::End))
    } else if ANTS.is_match(line) {
        Some(Line::Ants(line.trim()))
    } else if ROOM.is_match(line) {
        Some(Line::Room(line))
    } else if LINK.is_match(line) {
        Some(Line::Link(line))
    } else {
        None
    }
}

fn parse_coord(room: &str, value: &str) -> Result<i64, ParseError> {
    let digits = value.trim_start_matches('-');
    if digits.len() > MAX_COORD_DIGITS {
        return Err(ParseError::CoordinateTooLong { room: room.to_owned(), value: value.to_owned() });
    }

    // at most 10 digits always fits
    value.parse().map_err(|_| ParseError::CoordinateTooLong { room: room.to_owned(), value: value.to_owned() })
}

fn parse_room(line: &str) -> Result<(&str, Coords), ParseError> {
    let (name, x, y) = line
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| ParseError::InvalidLine { number: 0, line: line.to_owned() })?;

    Ok((name, Coords(parse_coord(name, x)?, parse_coord(name, y)?)))
}

fn parse_link(line: &str) -> Option<(&str, &str)> {
    line.split('-').map(str::trim).collect_tuple()
}

/// Parse a farm description with the default ant limit.
///
/// The format is line based: one ant count, rooms as `name x y`, links as `a-b`, `#` comments,
/// and `##start` / `##end` marking the room on the next room line. Rooms and links may appear in any order.
pub fn parse(input: &str) -> Result<Farm, ParseError> {
    parse_with_max_ants(input, MAX_ANTS)
}

/// [`parse`], rejecting farms with more than `max_ants` ants.
pub fn parse_with_max_ants(input: &str, max_ants: usize) -> Result<Farm, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut lines = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let kind = classify(line).ok_or_else(|| ParseError::InvalidLine { number: index + 1, line: line.to_owned() })?;
        lines.push(kind);
    }

    let mut ant_lines = lines.iter().filter_map(|line| match line {
        Line::Ants(count) => Some(*count),
        _ => None,
    });
    let ants = match (ant_lines.next(), ant_lines.next()) {
        (None, _) => return Err(ParseError::NoAntCount),
        (Some(_), Some(_)) => return Err(ParseError::MultipleAntCounts),
        (Some(count), None) => count,
    };
    let ants: i64 = ants.parse().map_err(|_| ParseError::AntCount(ants.to_owned()))?;
    let ants = usize::try_from(ants.max(0)).map_err(|_| ParseError::AntCount(ants.to_string()))?;

    let mut builder = FarmBuilder::with_ants(ants);
    builder.max_ants(max_ants);

    let mut pending: Option<RoomRole> = None;
    let mut markers_seen = Vec::with_capacity(2);
    for line in &lines {
        match *line {
            Line::Marker(role) => {
                if markers_seen.contains(&role) {
                    return Err(ParseError::DuplicateMarker(role));
                }
                if let Some(waiting) = pending {
                    return Err(ParseError::MarkerWithoutRoom(waiting));
                }
                markers_seen.push(role);
                pending = Some(role);
            }
            Line::Room(text) => {
                let (name, coords) = parse_room(text)?;
                builder.add_room(name, coords, pending.take().unwrap_or_default());
            }
            Line::Ants(_) | Line::Link(_) => {
                if let Some(waiting) = pending {
                    return Err(ParseError::MarkerWithoutRoom(waiting));
                }
            }
            Line::Ignored => {}
        }
    }
    if let Some(waiting) = pending {
        return Err(ParseError::MarkerWithoutRoom(waiting));
    }

    for line in &lines {
        if let Line::Link(text) = *line {
            if let Some((a, b)) = parse_link(text) {
                builder.add_link(a, b);
            }
        }
    }

    let farm = builder.build().map_err(ParseError::Invalid)?;
    debug!(rooms = farm.room_count(), links = farm.links.len(), ants = farm.ants(), "parsed farm");

    Ok(farm)
}

/// Read and [`parse`] the farm file at `path`. Windows line endings are accepted.
pub fn read_farm(path: impl AsRef<Path>) -> Result<Farm, ParseError> {
    read_farm_with_max_ants(path, MAX_ANTS)
}

/// [`read_farm`] with a custom ant limit.
pub fn read_farm_with_max_ants(path: impl AsRef<Path>, max_ants: usize) -> Result<Farm, ParseError> {
    let contents = fs::read_to_string(path)?;
    parse_with_max_ants(&contents, max_ants)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SIMPLE: &str = "3
##start
start 0 0
a 1 0
##end
end 2 0
start-a
a-end
";

    #[test]
    fn parses_simple_farm() {
        let farm = parse(SIMPLE).unwrap();

        assert_eq!(farm.ants(), 3);
        assert_eq!(farm.room_count(), 3);
        assert_eq!(farm.name(farm.start().unwrap()), "start");
        assert_eq!(farm.name(farm.end().unwrap()), "end");
        assert_eq!(format!("{}", farm), SIMPLE);
    }

    #[test]
    fn comments_blank_lines_and_crlf() {
        let farm = parse("# a farm\r\n2\r\n\r\n##start\r\n# the start\r\ns 0 0\r\n##end\r\ne 5 5\r\ns-e\r\n").unwrap();

        assert_eq!(farm.ants(), 2);
        assert_eq!(farm.neighbors(farm.start().unwrap()).collect::<Vec<_>>(), vec![farm.end().unwrap()]);
    }

    #[test]
    fn links_before_rooms() {
        let farm = parse("1\ns-e\n##start\ns 0 0\n##end\ne 1 1\n").unwrap();

        assert_eq!(farm.room_count(), 2);
    }

    #[test]
    fn spaces_around_link_hyphen() {
        let farm = parse("1\n##start\ns 0 0\n##end\ne 1 1\n  s - e  \n").unwrap();

        assert!(farm.neighbors(farm.start().unwrap()).any(|n| Some(n) == farm.end()));
    }

    #[rstest]
    #[case::empty("", "the input is empty")]
    #[case::garbage("3\n##start\ns 0 0\n##end\ne 1 1\ns-e\nwhat is this\n", "line 7 is incorrectly formatted: what is this")]
    #[case::unknown_command("3\n##start\ns 0 0\n##end\ne 1 1\n##weird\ns-e\n", "line 6 is incorrectly formatted: ##weird")]
    #[case::no_ants("##start\ns 0 0\n##end\ne 1 1\ns-e\n", "no ant count found")]
    #[case::two_ant_counts("3\n4\n##start\ns 0 0\n##end\ne 1 1\ns-e\n", "multiple ant counts found")]
    #[case::zero_ants("0\n##start\ns 0 0\n##end\ne 1 1\ns-e\n", "invalid farm: number of ants must be a positive integer")]
    #[case::negative_ants("-4\n##start\ns 0 0\n##end\ne 1 1\ns-e\n", "invalid farm: number of ants must be a positive integer")]
    #[case::two_starts("3\n##start\ns 0 0\n##start\nt 0 1\n##end\ne 1 1\ns-e\n", "multiple start room markers")]
    #[case::back_to_back_markers("3\n##start\n##end\ns 0 0\ne 1 1\ns-e\n", "start room marker is not followed by a room")]
    #[case::dangling_end("3\n##start\ns 0 0\ne 1 1\ns-e\n##end\n", "end room marker is not followed by a room")]
    #[case::missing_end("3\n##start\ns 0 0\ne 1 1\ns-e\n", "invalid farm: no end room")]
    #[case::long_coordinate("3\n##start\ns 12345678901 0\n##end\ne 1 1\ns-e\n", "coordinates may not exceed 10 digits, got 12345678901 for room s")]
    #[case::duplicate_name("3\n##start\ns 0 0\n##end\ne 1 1\ns 2 2\ns-e\n", "invalid farm: duplicate room name: s")]
    #[case::duplicate_coords("3\n##start\ns 0 0\n##end\ne 0 0\ns-e\n", "invalid farm: duplicate room coordinates for rooms s and e")]
    #[case::self_link("3\n##start\ns 0 0\n##end\ne 1 1\ns-s\n", "invalid farm: room connects to itself: s")]
    #[case::duplicate_link("3\n##start\ns 0 0\n##end\ne 1 1\ns-e\ne-s\n", "invalid farm: link already exists: e-s")]
    #[case::unknown_room("3\n##start\ns 0 0\n##end\ne 1 1\ns-x\n", "invalid farm: link references non-existent room: x")]
    #[case::no_links("3\n##start\ns 0 0\n##end\ne 1 1\n", "invalid farm: no links")]
    fn rejects(#[case] input: &str, #[case] message: &str) {
        let err = parse(input).err().unwrap();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn custom_ant_limit() {
        let err = parse_with_max_ants(SIMPLE, 2).err().unwrap();

        assert!(matches!(
            err,
            ParseError::Invalid(ref reasons) if reasons == &vec![BuilderInvalidReason::TooManyAnts { max: 2, found: 3 }]
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(read_farm("/definitely/not/here.txt"), Err(ParseError::Io(_))));
    }
}
