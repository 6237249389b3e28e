//! Errors surfaced to callers of the simulation.
//!
//! Invalid moves are not errors: they are an ordinary step outcome with a
//! penalty. Only programmer mistakes (malformed actions, stepping a finished
//! episode) and misconfiguration end up here.

use crate::config::ConfigError;
use crate::report::PlayerStatus;

/// Maze generation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// The requested logical size cannot hold a carved interior.
    DimensionsTooSmall { rows: usize, cols: usize, min: usize },
}

impl std::fmt::Display for MazeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MazeError::DimensionsTooSmall { rows, cols, min } => write!(
                f,
                "maze of {}x{} cells is too small (minimum {} per side)",
                rows, cols, min
            ),
        }
    }
}

impl std::error::Error for MazeError {}

/// Errors from building or stepping a game.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Configuration failed validation. Carries every problem found.
    InvalidConfig(Vec<ConfigError>),
    /// Maze generation rejected the layout size.
    Maze(MazeError),
    /// Action vector had the wrong number of components.
    ActionArity { expected: usize, found: usize },
    /// Action index does not name a direction.
    ActionOutOfRange { index: usize, max: usize },
    /// The episode already ended; call `reset` or `restart` first.
    EpisodeFinished(PlayerStatus),
}

impl From<MazeError> for GameError {
    fn from(e: MazeError) -> Self {
        GameError::Maze(e)
    }
}

impl From<Vec<ConfigError>> for GameError {
    fn from(errors: Vec<ConfigError>) -> Self {
        GameError::InvalidConfig(errors)
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidConfig(errors) => {
                write!(f, "invalid configuration:")?;
                for e in errors {
                    write!(f, " {};", e)?;
                }
                Ok(())
            }
            GameError::Maze(e) => write!(f, "maze generation failed: {}", e),
            GameError::ActionArity { expected, found } => write!(
                f,
                "action has {} components, expected {}",
                found, expected
            ),
            GameError::ActionOutOfRange { index, max } => {
                write!(f, "action index {} out of range 0..{}", index, max)
            }
            GameError::EpisodeFinished(status) => {
                write!(f, "episode already finished with status {:?}", status)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Maze(e) => Some(e),
            _ => None,
        }
    }
}
