//! Compass directions and grid positions.
//!
//! The eight directions double as the action space and as the ordering of
//! the local observation, so their order is part of the external contract:
//! W, N, E, S, NW, NE, SE, SW.

use serde::{Deserialize, Serialize};

/// A (row, column) grid position. Signed so that neighbor arithmetic can step
/// off the grid and be rejected by bounds checks rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dr, dc) = dir.offset();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Chebyshev distance: the larger of the row and column deltas.
    pub fn chebyshev(self, other: Position) -> i32 {
        let (dr, dc) = self.axis_deltas(other);
        dr.max(dc)
    }

    /// Absolute (row, column) deltas.
    pub fn axis_deltas(self, other: Position) -> (i32, i32) {
        ((self.row - other.row).abs(), (self.col - other.col).abs())
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// One of the eight compass moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    West,
    North,
    East,
    South,
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Observation and action order.
    pub const ALL: [Direction; 8] = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// The four axis-aligned moves, in observation order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
    ];

    /// (row, column) delta.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::West => (0, -1),
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::West => 0,
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 3,
            Direction::NorthWest => 4,
            Direction::NorthEast => 5,
            Direction::SouthEast => 6,
            Direction::SouthWest => 7,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::West => "w",
            Direction::North => "n",
            Direction::East => "e",
            Direction::South => "s",
            Direction::NorthWest => "nw",
            Direction::NorthEast => "ne",
            Direction::SouthEast => "se",
            Direction::SouthWest => "sw",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_name(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown direction {:?}, expected one of w n e s nw ne se sw", s))
    }
}
