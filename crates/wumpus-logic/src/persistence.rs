//! Save/Load of in-progress episodes.
//!
//! Snapshots are bincode: a `u32` format version followed by the
//! [`GameSnapshot`] body. The version is read first so a stale file is
//! rejected before its body is decoded. Snapshots are for checkpointing and
//! replay debugging within one build; the format is not kept stable across
//! versions. A JSON form is available for inspection.

use crate::cave::Cave;
use crate::cell::Cell;
use crate::config::GameConfig;
use crate::direction::Position;
use crate::game::{Game, Player};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Version number for snapshot format (increment when format changes)
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume an episode except the random stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub cave: Cave,
    pub player: Player,
    pub explored: Vec<f64>,
    pub steps: u32,
    pub start: Option<Position>,
    pub episode: u32,
}

impl GameSnapshot {
    /// Check that the parts of the snapshot agree with each other: the
    /// visit map covers the cave, and every tracked position lies on the
    /// grid holding what it claims to.
    pub fn check(&self) -> Result<(), SnapshotError> {
        let cave = &self.cave;
        let (rows, cols) = (cave.rows(), cave.columns());

        if (self.config.rows, self.config.columns) != (rows, cols) {
            return Err(SnapshotError::Inconsistent(format!(
                "config is {}x{} but the cave is {}x{}",
                self.config.rows, self.config.columns, rows, cols
            )));
        }
        if self.explored.len() != rows * cols {
            return Err(SnapshotError::Inconsistent(format!(
                "visit map has {} entries for a {}x{} cave",
                self.explored.len(),
                rows,
                cols
            )));
        }

        let on_grid = |what: &str, pos: Position| {
            if cave.grid().in_bounds(pos) {
                Ok(())
            } else {
                Err(SnapshotError::Inconsistent(format!(
                    "{} at ({}, {}) is off the {}x{} grid",
                    what, pos.row, pos.col, rows, cols
                )))
            }
        };
        on_grid("player", self.player.position)?;
        if let Some(start) = self.start {
            on_grid("start", start)?;
        }
        for (what, pos, cell) in [
            ("wumpus", cave.wumpus_location(), Cell::Wumpus),
            ("treasure", cave.treasure_location(), Cell::Treasure),
        ] {
            if let Some(pos) = pos {
                on_grid(what, pos)?;
                if cave.cell(pos) != cell {
                    return Err(SnapshotError::Inconsistent(format!(
                        "{} at ({}, {}) but the cell holds {}",
                        what,
                        pos.row,
                        pos.col,
                        cave.cell(pos).name()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Write a snapshot to `writer`.
pub fn save_snapshot<W: Write>(mut writer: W, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
    bincode::serialize_into(&mut writer, &SNAPSHOT_VERSION)?;
    bincode::serialize_into(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

/// Read a snapshot written by [`save_snapshot`] and [`GameSnapshot::check`] it.
pub fn load_snapshot<R: Read>(mut reader: R) -> Result<GameSnapshot, SnapshotError> {
    let version: u32 = bincode::deserialize_from(&mut reader)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: version,
        });
    }
    let snapshot: GameSnapshot = bincode::deserialize_from(reader)?;
    snapshot.check()?;
    Ok(snapshot)
}

/// Save `game` in one call.
pub fn save_game<W: Write>(writer: W, game: &Game) -> Result<(), SnapshotError> {
    save_snapshot(writer, &game.snapshot())
}

/// Load and resume a game in one call.
pub fn load_game<R: Read>(reader: R) -> Result<Game, SnapshotError> {
    Game::from_snapshot(load_snapshot(reader)?)
}

/// Pretty JSON form of a snapshot.
pub fn snapshot_to_json(snapshot: &GameSnapshot) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn snapshot_from_json(json: &str) -> Result<GameSnapshot, SnapshotError> {
    let snapshot: GameSnapshot = serde_json::from_str(json)?;
    snapshot.check()?;
    Ok(snapshot)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
    /// Decoded fine, but the pieces disagree.
    Inconsistent(String),
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SnapshotError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SnapshotError::Bincode(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "IO error: {}", e),
            SnapshotError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SnapshotError::Json(e) => write!(f, "JSON error: {}", e),
            SnapshotError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Snapshot version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SnapshotError::Inconsistent(what) => write!(f, "Inconsistent snapshot: {}", what),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(e) => Some(e),
            SnapshotError::Bincode(e) => Some(e),
            SnapshotError::Json(e) => Some(e),
            SnapshotError::VersionMismatch { .. } | SnapshotError::Inconsistent(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::game::RewardModel;

    fn played_game() -> Game {
        let config = GameConfig {
            reward_model: RewardModel::Model2,
            seed: 4242,
            ..GameConfig::default()
        };
        let mut game = Game::new(config).unwrap();
        for dir in [Direction::North, Direction::East, Direction::East, Direction::South] {
            if game.step(dir).unwrap().done {
                break;
            }
        }
        game
    }

    #[test]
    fn test_save_load_roundtrip() {
        let game = played_game();

        let mut buffer = Vec::new();
        save_game(&mut buffer, &game).expect("Save failed");
        let loaded = load_game(&buffer[..]).expect("Load failed");

        assert_eq!(loaded.snapshot(), game.snapshot());
        assert_eq!(loaded.report(), game.report());
        assert_eq!(loaded.steps(), game.steps());
    }

    #[test]
    fn resumed_game_steps_like_the_saved_one() {
        let mut game = played_game();
        if game.is_done() {
            return;
        }
        let mut buffer = Vec::new();
        save_game(&mut buffer, &game).unwrap();
        let mut loaded = load_game(&buffer[..]).unwrap();

        // Without wandering hazards the random stream is not consulted.
        for dir in Direction::ALL {
            let a = game.step(dir);
            let b = loaded.step(dir);
            assert_eq!(a, b);
            if matches!(a, Ok(out) if out.done) {
                break;
            }
        }
    }

    #[test]
    fn rejects_other_versions() {
        let mut buffer = Vec::new();
        bincode::serialize_into(&mut buffer, &(SNAPSHOT_VERSION + 1)).unwrap();
        bincode::serialize_into(&mut buffer, &played_game().snapshot()).unwrap();
        match load_snapshot(&buffer[..]) {
            Err(SnapshotError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SNAPSHOT_VERSION);
                assert_eq!(found, SNAPSHOT_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other.map(|s| s.steps)),
        }
    }

    #[test]
    fn truncated_input_is_a_bincode_error() {
        let mut buffer = Vec::new();
        save_game(&mut buffer, &played_game()).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(load_snapshot(&buffer[..]), Err(SnapshotError::Bincode(_))));
    }

    #[test]
    fn short_visit_map_is_rejected() {
        let mut snapshot = played_game().snapshot();
        snapshot.explored.clear();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(matches!(snapshot_from_json(&json), Err(SnapshotError::Inconsistent(_))));

        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &snapshot).unwrap();
        assert!(matches!(load_game(&buffer[..]), Err(SnapshotError::Inconsistent(_))));
        assert!(matches!(Game::from_snapshot(snapshot), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let snapshot = played_game().snapshot();
        let mut value = serde_json::to_value(&snapshot).unwrap();
        value["cave"]["grid"]["cells"].as_array_mut().unwrap().truncate(3);
        let json = value.to_string();
        match snapshot_from_json(&json) {
            Err(SnapshotError::Json(e)) => assert!(e.to_string().contains("holds 3 cells")),
            other => panic!("expected a decode error, got {:?}", other.map(|s| s.steps)),
        }
    }

    #[test]
    fn off_grid_player_is_rejected() {
        let mut snapshot = played_game().snapshot();
        snapshot.player.position = Position::new(-1, 400);
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &snapshot).unwrap();
        match load_snapshot(&buffer[..]) {
            Err(SnapshotError::Inconsistent(what)) => assert!(what.starts_with("player")),
            other => panic!("expected inconsistency, got {:?}", other.map(|s| s.steps)),
        }
    }

    #[test]
    fn misplaced_wumpus_is_rejected() {
        let snapshot = played_game().snapshot();
        let mut value = serde_json::to_value(&snapshot).unwrap();
        // The player always stands on empty floor.
        value["cave"]["wumpus"] = serde_json::to_value(snapshot.player.position).unwrap();
        match snapshot_from_json(&value.to_string()) {
            Err(SnapshotError::Inconsistent(what)) => assert!(what.contains("holds empty")),
            other => panic!("expected inconsistency, got {:?}", other.map(|s| s.steps)),
        }
    }

    #[test]
    fn json_form_roundtrips() {
        let snapshot = played_game().snapshot();
        let json = snapshot_to_json(&snapshot).unwrap();
        assert!(json.contains("\"explored\""));
        let back = snapshot_from_json(&json).unwrap();
        assert_eq!(back.cave, snapshot.cave);
        assert_eq!(back.player, snapshot.player);
        assert_eq!(back.config, snapshot.config);
        assert_eq!(back.explored.len(), snapshot.explored.len());
        assert!(matches!(snapshot_from_json("[]"), Err(SnapshotError::Json(_))));
    }
}
