//! Pure simulation logic for the Wumpus cave.
//!
//! This crate contains the whole simulation core of a gridworld adventure
//! used as a reinforcement-learning testbed: a procedurally generated cave,
//! a hazard (the Wumpus) guarding its treasure, and a turn-based
//! reward/termination model. Functions take plain data and an explicit
//! random number generator, so every episode is reproducible from a seed
//! and independent episodes can run on separate threads.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cave`] | Cave world: layout, constrained entity placement, visibility, consumption |
//! | [`cell`] | Cell kinds, integer projection and text glyphs |
//! | [`config`] | Episode configuration, validation, JSON load/save |
//! | [`constants`] | Food economy, placement limits, reward constants |
//! | [`direction`] | Compass directions, positions, Chebyshev distance |
//! | [`error`] | Error types for configuration, generation, and stepping |
//! | [`game`] | Step state machine with two reward models |
//! | [`grid`] | Row-major cell grid and connectivity checks |
//! | [`maze`] | Backtracker, Kruskal, and Prim maze generators |
//! | [`persistence`] | Versioned binary snapshots of an episode |
//! | [`render`] | Debug text rendering of the cave and the player's view |
//! | [`report`] | Observation record and its packed encodings |
//!
//! # Example
//!
//! ```
//! use wumpus_logic::config::GameConfig;
//! use wumpus_logic::direction::Direction;
//! use wumpus_logic::game::Game;
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//! let outcome = game.step(Direction::North).unwrap();
//! let report = game.report();
//! assert_eq!(report.location, report.row * game.cave().columns() + report.column);
//! assert!(outcome.reward.is_finite());
//! ```

pub mod cave;
pub mod cell;
pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod game;
pub mod grid;
pub mod maze;
pub mod persistence;
pub mod render;
pub mod report;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::cave::Cave;
    pub use crate::cell::Cell;
    pub use crate::config::GameConfig;
    pub use crate::direction::{Direction, Position};
    pub use crate::error::GameError;
    pub use crate::game::{Game, RewardModel, StepOutcome};
    pub use crate::maze::MazeAlgorithm;
    pub use crate::report::{PlayerStatus, Report};
}
