//! Cell kinds stored in the cave grid.
//!
//! `Cell` is a closed enum. Anything that leaves the crate as a number goes
//! through [`Cell::code`], never through `as` casts of the discriminant, so
//! the external encoding stays fixed even if variants are reordered.

use serde::{Deserialize, Serialize};

/// Contents of one grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    /// The hazard. Stepping onto it is fatal.
    Wumpus,
    Pit,
    Treasure,
    Exit,
    Food,
}

impl Cell {
    pub const ALL: [Cell; 7] = [
        Cell::Empty,
        Cell::Wall,
        Cell::Wumpus,
        Cell::Pit,
        Cell::Treasure,
        Cell::Exit,
        Cell::Food,
    ];

    /// Integer projection used by packed observations. Every code fits in 3 bits.
    ///
    /// | Cell | Code |
    /// |------|------|
    /// | Empty | 0 |
    /// | Wall | 1 |
    /// | Wumpus | 2 |
    /// | Pit | 3 |
    /// | Treasure | 4 |
    /// | Exit | 5 |
    /// | Food | 6 |
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
            Cell::Wumpus => 2,
            Cell::Pit => 3,
            Cell::Treasure => 4,
            Cell::Exit => 5,
            Cell::Food => 6,
        }
    }

    /// Inverse of [`Cell::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            2 => Some(Cell::Wumpus),
            3 => Some(Cell::Pit),
            4 => Some(Cell::Treasure),
            5 => Some(Cell::Exit),
            6 => Some(Cell::Food),
            _ => None,
        }
    }

    /// Single-character glyph for text rendering.
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Wumpus => 'W',
            Cell::Pit => 'O',
            Cell::Treasure => '$',
            Cell::Exit => '=',
            Cell::Food => '+',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Cell::ALL.into_iter().find(|c| c.glyph() == glyph)
    }

    pub fn name(self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::Wall => "wall",
            Cell::Wumpus => "wumpus",
            Cell::Pit => "pit",
            Cell::Treasure => "treasure",
            Cell::Exit => "exit",
            Cell::Food => "food",
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_fit_three_bits() {
        for (i, a) in Cell::ALL.iter().enumerate() {
            assert!(a.code() < 8);
            for b in &Cell::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn code_projection_is_invertible() {
        for cell in Cell::ALL {
            assert_eq!(Cell::from_code(cell.code()), Some(cell));
        }
        assert_eq!(Cell::from_code(7), None);
    }

    #[test]
    fn glyphs_match_board_legend() {
        assert_eq!(Cell::Wall.glyph(), '#');
        assert_eq!(Cell::Empty.glyph(), '.');
        assert_eq!(Cell::Pit.glyph(), 'O');
        assert_eq!(Cell::Treasure.glyph(), '$');
        assert_eq!(Cell::Wumpus.glyph(), 'W');
        assert_eq!(Cell::Exit.glyph(), '=');
        assert_eq!(Cell::Food.glyph(), '+');
        assert_eq!(Cell::from_glyph('@'), None);
        assert_eq!(Cell::from_glyph('$'), Some(Cell::Treasure));
    }
}
