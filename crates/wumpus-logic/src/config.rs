//! Episode configuration.
//!
//! A [`GameConfig`] fixes everything needed to rebuild an episode bit for
//! bit: cave size, seed, reward model, maze algorithm. It round-trips
//! through JSON so experiment settings can live next to their results.

use crate::constants::{MAX_CAVE_DIM, MAZE_THRESHOLD, MIN_CAVE_DIM};
use crate::game::RewardModel;
use crate::maze::MazeAlgorithm;
use serde::{Deserialize, Serialize};

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 903_387_237;

/// Everything needed to build and replay an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub seed: u64,
    pub reward_model: RewardModel,
    /// Generator used once both sides exceed `maze_threshold`.
    pub maze_algorithm: MazeAlgorithm,
    pub maze_threshold: usize,
    /// Let the Wumpus wander after every non-terminal step.
    pub move_wumpus: bool,
    /// `restart` reseeds from `seed`, replaying the same cave each episode.
    pub static_seed: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            columns: 12,
            seed: DEFAULT_SEED,
            reward_model: RewardModel::Model1,
            maze_algorithm: MazeAlgorithm::default(),
            maze_threshold: MAZE_THRESHOLD,
            move_wumpus: false,
            static_seed: false,
        }
    }
}

impl GameConfig {
    pub fn with_size(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    /// Check every field, returning all problems found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.rows < MIN_CAVE_DIM {
            errors.push(ConfigError::RowsTooSmall(self.rows));
        }
        if self.rows > MAX_CAVE_DIM {
            errors.push(ConfigError::RowsTooLarge(self.rows));
        }
        if self.columns < MIN_CAVE_DIM {
            errors.push(ConfigError::ColumnsTooSmall(self.columns));
        }
        if self.columns > MAX_CAVE_DIM {
            errors.push(ConfigError::ColumnsTooLarge(self.columns));
        }
        if self.maze_threshold < MIN_CAVE_DIM {
            errors.push(ConfigError::MazeThresholdTooSmall(self.maze_threshold));
        }

        errors
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RowsTooSmall(usize),
    ColumnsTooSmall(usize),
    RowsTooLarge(usize),
    ColumnsTooLarge(usize),
    /// A threshold this low would ask for mazes with no room to carve.
    MazeThresholdTooSmall(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::RowsTooSmall(n) => {
                write!(f, "rows {} below minimum {}", n, MIN_CAVE_DIM)
            }
            ConfigError::ColumnsTooSmall(n) => {
                write!(f, "columns {} below minimum {}", n, MIN_CAVE_DIM)
            }
            ConfigError::RowsTooLarge(n) => {
                write!(f, "rows {} above maximum {}", n, MAX_CAVE_DIM)
            }
            ConfigError::ColumnsTooLarge(n) => {
                write!(f, "columns {} above maximum {}", n, MAX_CAVE_DIM)
            }
            ConfigError::MazeThresholdTooSmall(n) => {
                write!(f, "maze threshold {} below minimum {}", n, MIN_CAVE_DIM)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "default config should be valid: {errors:?}");
        assert_eq!((config.rows, config.columns), (12, 12));
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn collects_every_problem() {
        let config = GameConfig {
            rows: 2,
            columns: 4000,
            maze_threshold: 1,
            ..GameConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ConfigError::RowsTooSmall(2)));
        assert!(errors.contains(&ConfigError::ColumnsTooLarge(4000)));
        assert!(errors.contains(&ConfigError::MazeThresholdTooSmall(1)));
    }

    #[test]
    fn minimum_size_is_accepted() {
        assert!(GameConfig::with_size(MIN_CAVE_DIM, MIN_CAVE_DIM).validate().is_empty());
        assert!(GameConfig::with_size(MIN_CAVE_DIM - 1, MIN_CAVE_DIM)
            .validate()
            .contains(&ConfigError::RowsTooSmall(MIN_CAVE_DIM - 1)));
    }

    #[test]
    fn json_roundtrip() {
        let config = GameConfig {
            rows: 40,
            columns: 31,
            seed: 11,
            reward_model: RewardModel::Model2,
            maze_algorithm: MazeAlgorithm::Prim,
            move_wumpus: true,
            ..GameConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"prim\""));
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "rows": 30, "maze_algorithm": "backtracker" }"#).unwrap();
        assert_eq!(config.rows, 30);
        assert_eq!(config.columns, 12);
        assert_eq!(config.maze_algorithm, MazeAlgorithm::Backtracker);
        assert_eq!(config.reward_model, RewardModel::Model1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{ rows: ").is_err());
    }
}
