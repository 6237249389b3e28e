//! Game constants: food economy, placement limits, rewards.
//!
//! Plain values with no dependencies. The reward constants are exact: the
//! reward models compare against them bit-for-bit in tests.

/// Maximum food level. Fits in the 7-bit food field of the packed observation.
pub const MAX_FOOD: i32 = 64;
/// Food gained from eating one food item.
pub const FOOD_PER_ITEM: i32 = 20;
/// Food decreases by one on every step whose counter is a multiple of this.
pub const FOOD_DECAY_PERIOD: u32 = 10;
/// Below this level the player is starving.
pub const STARVING_LEVEL: i32 = 5;
/// Below this level the player is hungry.
pub const HUNGRY_LEVEL: i32 = 20;

/// Minimum Chebyshev distance, on each axis, between the Wumpus and newly
/// placed entities. Also the leash distance between the Wumpus and its treasure.
pub const NEAR_FACTOR: i32 = 2;
/// Random draws before placement falls back to the last sampled cell.
pub const PLACEMENT_ATTEMPTS: u32 = 100;
/// Random compass moves tried when relocating the Wumpus.
pub const WUMPUS_MOVE_ATTEMPTS: u32 = 10;

/// Caves larger than this on both axes get a generated maze layout.
pub const MAZE_THRESHOLD: usize = 25;
/// Smallest cave side that still leaves room to place entities.
pub const MIN_CAVE_DIM: usize = 5;
/// Largest cave side accepted by configuration validation.
pub const MAX_CAVE_DIM: usize = 1024;

/// Multiplier applied to a cell's explored weight on each qualifying visit.
pub const EXPLORED_DECAY: f64 = 0.998;

/// Treasure pickups within this Chebyshev distance count as "nearby".
pub const TREASURE_NEAR: i32 = 2;

pub mod rewards {
    pub const STARVED: f64 = -7.0;
    pub const EATEN: f64 = -10.0;
    pub const FELL: f64 = -10.0;
    pub const TREASURE: f64 = 20.0;
    pub const INVALID_MOVE: f64 = -1.0;
    pub const INVALID_MOVE_NEAR_TREASURE: f64 = -5.0;
    pub const MISSED_TREASURE: f64 = -1.0;
    pub const EMPTY_HANDED_EXIT: f64 = -2.0;
    /// Model 1 exit payout per gold carried.
    pub const MODEL1_GOLD_PAYOUT: f64 = 100.0;
    /// Model 2 exit payout per gold carried, before the fixed cost.
    pub const MODEL2_GOLD_PAYOUT: f64 = 200.0;
    pub const MODEL2_EXIT_COST: f64 = 100.0;
    pub const FOOD_STARVING: f64 = 5.0;
    pub const FOOD_HUNGRY: f64 = 2.5;
    pub const FOOD_WASTED: f64 = 0.5;
}
