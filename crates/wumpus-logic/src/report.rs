//! Observation record handed to the external learner after every step.
//!
//! The learner sees the player's position, inventory, status, and the eight
//! neighboring cells. Two compact projections are provided: a packed integer
//! ([`Report::encode`]) for table-based learners and a feature vector
//! ([`Report::features`]) for structured-state learners.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};

/// Where the player stands in the episode lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Alive,
    /// Left through the exit without winning.
    Escaped,
    Dead,
    /// Left through the exit with the treasure.
    Win,
}

impl PlayerStatus {
    /// Escaped, Dead, and Win all end the episode.
    pub fn is_terminal(self) -> bool {
        !matches!(self, PlayerStatus::Alive)
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerStatus::Alive => "alive",
            PlayerStatus::Escaped => "escaped",
            PlayerStatus::Dead => "dead",
            PlayerStatus::Win => "win",
        }
    }
}

/// Bits used per adjacent cell in the packed encoding.
pub const CELL_BITS: u32 = 3;
/// Bit offset of the gold-held flag.
pub const GOLD_SHIFT: u32 = 8 * CELL_BITS;
/// Bit offset of the food level.
pub const FOOD_SHIFT: u32 = GOLD_SHIFT + 1;
/// Bits reserved for the food level (0..=64 needs seven).
pub const FOOD_BITS: u32 = 7;

/// Immutable snapshot of what the learner is allowed to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub row: usize,
    pub column: usize,
    pub gold: u32,
    /// `row * columns + column`.
    pub location: usize,
    pub status: PlayerStatus,
    /// Neighbors in W, N, E, S, NW, NE, SE, SW order.
    pub adjacent: [Cell; 8],
    pub food_level: i32,
}

impl Report {
    /// Pack the observation into an integer state key.
    ///
    /// | Bits | Field |
    /// |------|-------|
    /// | 0–23 | adjacent cell codes, 3 bits each, W first |
    /// | 24 | holding gold |
    /// | 25–31 | food level |
    ///
    /// Position is not encoded.
    pub fn encode(&self) -> u64 {
        let mut key = 0u64;
        for (i, cell) in self.adjacent.iter().enumerate() {
            key |= (cell.code() as u64) << (i as u32 * CELL_BITS);
        }
        if self.gold > 0 {
            key |= 1 << GOLD_SHIFT;
        }
        let food = self.food_level.clamp(0, (1 << FOOD_BITS) - 1) as u64;
        key | (food << FOOD_SHIFT)
    }

    /// Recover the adjacent cells from a packed key.
    pub fn decode_adjacent(key: u64) -> [Cell; 8] {
        let mut cells = [Cell::Wall; 8];
        for (i, slot) in cells.iter_mut().enumerate() {
            let code = (key >> (i as u32 * CELL_BITS)) & ((1 << CELL_BITS) - 1);
            *slot = Cell::from_code(code as u8).unwrap_or(Cell::Wall);
        }
        cells
    }

    /// Recover (holding gold, food level) from a packed key.
    pub fn decode_inventory(key: u64) -> (bool, i32) {
        let gold = (key >> GOLD_SHIFT) & 1 == 1;
        let food = (key >> FOOD_SHIFT) & ((1 << FOOD_BITS) - 1);
        (gold, food as i32)
    }

    /// Adjacent cell codes, then location, gold, and food level.
    pub fn features(&self) -> Vec<f64> {
        let mut v: Vec<f64> = self.adjacent.iter().map(|c| c.code() as f64).collect();
        v.push(self.location as f64);
        v.push(self.gold as f64);
        v.push(self.food_level as f64);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        Report {
            row: 3,
            column: 4,
            gold: 1,
            location: 3 * 12 + 4,
            status: PlayerStatus::Alive,
            adjacent: [
                Cell::Wall,
                Cell::Empty,
                Cell::Wumpus,
                Cell::Pit,
                Cell::Treasure,
                Cell::Exit,
                Cell::Food,
                Cell::Empty,
            ],
            food_level: 64,
        }
    }

    #[test]
    fn encode_places_fields_at_documented_offsets() {
        let key = sample().encode();
        // W = wall (1), N = empty (0), E = wumpus (2)
        assert_eq!(key & 0b111, 1);
        assert_eq!((key >> 3) & 0b111, 0);
        assert_eq!((key >> 6) & 0b111, 2);
        assert_eq!((key >> 24) & 1, 1);
        assert_eq!(key >> 25, 64);
    }

    #[test]
    fn decode_recovers_observation() {
        let r = sample();
        let key = r.encode();
        assert_eq!(Report::decode_adjacent(key), r.adjacent);
        assert_eq!(Report::decode_inventory(key), (true, 64));
    }

    #[test]
    fn encoding_ignores_position() {
        let a = sample();
        let mut b = sample();
        b.row = 7;
        b.location = 7 * 12 + 4;
        assert_eq!(a.encode(), b.encode());
    }

    #[test]
    fn features_layout() {
        let f = sample().features();
        assert_eq!(f.len(), 11);
        assert_eq!(f[2], 2.0);
        assert_eq!(f[8], 40.0);
        assert_eq!(f[9], 1.0);
        assert_eq!(f[10], 64.0);
    }

    #[test]
    fn only_alive_is_non_terminal() {
        assert!(!PlayerStatus::Alive.is_terminal());
        assert!(PlayerStatus::Escaped.is_terminal());
        assert!(PlayerStatus::Dead.is_terminal());
        assert!(PlayerStatus::Win.is_terminal());
    }
}
