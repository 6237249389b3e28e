//! Step state machine - one call to [`Game::step`] per turn.
//!
//! Each step drains food on a fixed period, resolves the move against the
//! target cell, and scores it with the configured [`RewardModel`]. Both
//! models share the same skeleton and differ only at the exit and on empty
//! floor:
//!
//! | Target | Model 1 | Model 2 |
//! |--------|---------|---------|
//! | Exit | `gold × 100`, or −2 empty-handed; Win with any gold | `gold × 200 − 100`; Win only with exactly one gold |
//! | Empty | 0, overwritten by −1 when walking away from nearby treasure | explored weight, plus −1 when walking away from nearby treasure |
//!
//! Invalid moves are ordinary outcomes with a penalty that grows as food
//! runs out. The game never resets itself: once the status is terminal,
//! [`Game::step`] returns [`GameError::EpisodeFinished`] until `reset` or
//! `restart` is called.

use crate::cave::Cave;
use crate::cell::Cell;
use crate::config::GameConfig;
use crate::constants::{
    rewards, EXPLORED_DECAY, FOOD_DECAY_PERIOD, HUNGRY_LEVEL, MAX_FOOD, STARVING_LEVEL,
    TREASURE_NEAR,
};
use crate::direction::{Direction, Position};
use crate::error::GameError;
use crate::persistence::{GameSnapshot, SnapshotError};
use crate::render;
use crate::report::{PlayerStatus, Report};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Scoring policy applied to step outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RewardModel {
    /// Pays per gold at the exit; empty floor is worth nothing.
    #[default]
    Model1,
    /// Pays for fresh ground through the explored-decay map; winning
    /// requires leaving with exactly one gold.
    Model2,
}

impl RewardModel {
    /// `1` or `2`, as used on the command line.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(RewardModel::Model1),
            2 => Some(RewardModel::Model2),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            RewardModel::Model1 => 1,
            RewardModel::Model2 => 2,
        }
    }
}

/// The adventurer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub gold: u32,
    pub food: i32,
    pub status: PlayerStatus,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            gold: 0,
            food: MAX_FOOD,
            status: PlayerStatus::Alive,
        }
    }

    pub fn hunger(&self) -> Hunger {
        if self.food < STARVING_LEVEL {
            Hunger::Starving
        } else if self.food < HUNGRY_LEVEL {
            Hunger::Hungry
        } else {
            Hunger::Fed
        }
    }
}

/// Food tiers; they pick the reward for eating and drive the hunger log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hunger {
    Fed,
    Hungry,
    Starving,
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub reward: f64,
    /// True once the status is terminal.
    pub done: bool,
    pub status: PlayerStatus,
}

/// One episode of the cave game, with its own random stream.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    cave: Cave,
    player: Player,
    /// Per-cell visit weight, row-major, starting at 1.0.
    explored: Vec<f64>,
    steps: u32,
    start: Option<Position>,
    episode: u32,
}

impl Game {
    /// Shape of the action vector accepted by [`Game::step_action`]: one
    /// component choosing among the eight directions.
    pub const NUM_ACTIONS: [usize; 1] = [Direction::ALL.len()];

    /// Validate `config`, seed the generator, and build the first episode.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let (cave, player) = build_episode(&config, &mut rng)?;
        let explored = vec![1.0; cave.rows() * cave.columns()];
        let game = Self {
            config,
            rng,
            cave,
            player,
            explored,
            steps: 0,
            start: None,
            episode: 0,
        };
        game.log_reset();
        Ok(game)
    }

    /// Play in a prepared cave with the player standing at `start`.
    ///
    /// The configured size is replaced by the cave's own dimensions.
    pub fn from_cave(mut config: GameConfig, cave: Cave, start: Position) -> Self {
        config.rows = cave.rows();
        config.columns = cave.columns();
        let rng = StdRng::seed_from_u64(config.seed);
        let explored = vec![1.0; cave.rows() * cave.columns()];
        Self {
            config,
            rng,
            cave,
            player: Player::new(start),
            explored,
            steps: 0,
            start: None,
            episode: 0,
        }
    }

    /// Rebuild with new dimensions and seed.
    pub fn reset(&mut self, rows: usize, columns: usize, seed: u64) -> Result<(), GameError> {
        let config = GameConfig {
            rows,
            columns,
            seed,
            ..self.config.clone()
        };
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        self.config = config;
        self.rng = StdRng::seed_from_u64(seed);
        self.begin_episode()
    }

    /// Start the next episode with the current configuration.
    ///
    /// With `static_seed` the generator is reseeded first, so every episode
    /// replays the same cave; otherwise the stream continues and the cave
    /// changes.
    pub fn restart(&mut self) -> Result<(), GameError> {
        if self.config.static_seed {
            self.rng = StdRng::seed_from_u64(self.config.seed);
        }
        self.begin_episode()
    }

    fn begin_episode(&mut self) -> Result<(), GameError> {
        let (cave, player) = build_episode(&self.config, &mut self.rng)?;
        self.explored = vec![1.0; cave.rows() * cave.columns()];
        self.cave = cave;
        self.player = player;
        self.steps = 0;
        self.start = None;
        self.episode += 1;
        self.log_reset();
        Ok(())
    }

    fn log_reset(&self) {
        log::info!(
            "Episode {}: {}x{} {:?} cave, seed {}, {:?}, player at ({}, {})",
            self.episode,
            self.cave.rows(),
            self.cave.columns(),
            self.cave.layout(),
            self.config.seed,
            self.config.reward_model,
            self.player.position.row,
            self.player.position.col
        );
    }

    /// Advance one turn by moving in `direction`.
    pub fn step(&mut self, direction: Direction) -> Result<StepOutcome, GameError> {
        if self.player.status.is_terminal() {
            return Err(GameError::EpisodeFinished(self.player.status));
        }
        if self.start.is_none() {
            self.start = Some(self.player.position);
        }

        if self.steps % FOOD_DECAY_PERIOD == 0 {
            self.player.food -= 1;
        }

        let reward = if self.player.food <= 0 {
            log::debug!("Step {}: starved", self.steps);
            self.player.status = PlayerStatus::Dead;
            rewards::STARVED
        } else {
            self.resolve_move(direction)
        };

        if self.player.status == PlayerStatus::Alive {
            match self.player.hunger() {
                Hunger::Starving => {
                    log::debug!("Step {}: starving (food {})", self.steps, self.player.food)
                }
                Hunger::Hungry => {
                    log::debug!("Step {}: getting hungry (food {})", self.steps, self.player.food)
                }
                Hunger::Fed => {}
            }
        }

        self.steps += 1;

        let done = self.player.status.is_terminal();
        if self.config.move_wumpus && !done {
            self.cave.move_wumpus_avoiding(&mut self.rng, self.player.position);
        }

        Ok(StepOutcome {
            reward,
            done,
            status: self.player.status,
        })
    }

    /// [`Game::step`] driven by an action vector shaped like
    /// [`Game::NUM_ACTIONS`].
    pub fn step_action(&mut self, action: &[usize]) -> Result<StepOutcome, GameError> {
        if action.len() != Self::NUM_ACTIONS.len() {
            return Err(GameError::ActionArity {
                expected: Self::NUM_ACTIONS.len(),
                found: action.len(),
            });
        }
        let index = action[0];
        let direction = Direction::from_index(index).ok_or(GameError::ActionOutOfRange {
            index,
            max: Self::NUM_ACTIONS[0],
        })?;
        self.step(direction)
    }

    fn resolve_move(&mut self, direction: Direction) -> f64 {
        let from = self.player.position;
        let target = from.offset(direction);
        let before = self.treasure_distance(from);
        let near_gold = self.player.gold == 0 && before.is_some_and(|d| d < TREASURE_NEAR);

        let cell = if self.cave.can_move_into(target) {
            self.cave.cell(target)
        } else {
            Cell::Wall
        };

        match cell {
            Cell::Wall => {
                let mut reward = rewards::INVALID_MOVE;
                if near_gold {
                    reward = rewards::INVALID_MOVE_NEAR_TREASURE;
                }
                let food_pct = 1.0 - self.player.food as f64 / MAX_FOOD as f64;
                if food_pct > 0.0 {
                    reward /= food_pct;
                }
                log::debug!("Step {}: invalid move {}", self.steps, direction.as_str());
                reward
            }
            Cell::Wumpus => {
                log::debug!("Step {}: eaten by the Wumpus", self.steps);
                self.player.status = PlayerStatus::Dead;
                rewards::EATEN
            }
            Cell::Pit => {
                log::debug!("Step {}: fell in a pit", self.steps);
                self.player.status = PlayerStatus::Dead;
                rewards::FELL
            }
            Cell::Treasure => {
                self.player.gold += self.cave.take_gold(target);
                log::debug!("Step {}: found the treasure", self.steps);
                rewards::TREASURE
            }
            Cell::Exit => self.exit_reward(),
            Cell::Food => {
                let reward = match self.player.hunger() {
                    Hunger::Starving => rewards::FOOD_STARVING,
                    Hunger::Hungry => rewards::FOOD_HUNGRY,
                    Hunger::Fed => rewards::FOOD_WASTED,
                };
                log::debug!("Step {}: found food ({:?})", self.steps, self.player.hunger());
                let gained = self.cave.eat_food(target);
                self.player.food = (self.player.food + gained).min(MAX_FOOD);
                reward
            }
            Cell::Empty => {
                self.player.position = target;
                let idx = self.explored_index(target);
                let mut reward = match self.config.reward_model {
                    RewardModel::Model1 => 0.0,
                    RewardModel::Model2 => self.explored[idx],
                };

                let after = self.treasure_distance(target);
                let missed = near_gold && matches!((before, after), (Some(b), Some(a)) if b < a);
                if missed {
                    log::debug!("Step {}: walked away from the treasure", self.steps);
                    match self.config.reward_model {
                        RewardModel::Model1 => reward = rewards::MISSED_TREASURE,
                        RewardModel::Model2 => reward += rewards::MISSED_TREASURE,
                    }
                } else {
                    self.explored[idx] *= EXPLORED_DECAY;
                }
                reward
            }
        }
    }

    fn exit_reward(&mut self) -> f64 {
        let gold = self.player.gold as f64;
        let (reward, status) = match self.config.reward_model {
            RewardModel::Model1 => {
                if self.player.gold == 0 {
                    (rewards::EMPTY_HANDED_EXIT, PlayerStatus::Escaped)
                } else {
                    (gold * rewards::MODEL1_GOLD_PAYOUT, PlayerStatus::Win)
                }
            }
            RewardModel::Model2 => {
                let reward = gold * rewards::MODEL2_GOLD_PAYOUT - rewards::MODEL2_EXIT_COST;
                let status = if self.player.gold == 1 {
                    PlayerStatus::Win
                } else {
                    PlayerStatus::Escaped
                };
                (reward, status)
            }
        };
        log::debug!(
            "Step {}: left the cave with {} gold ({:?})",
            self.steps,
            self.player.gold,
            status
        );
        self.player.status = status;
        reward
    }

    fn treasure_distance(&self, pos: Position) -> Option<i32> {
        self.cave.treasure_location().map(|t| pos.chebyshev(t))
    }

    fn explored_index(&self, pos: Position) -> usize {
        pos.row as usize * self.cave.columns() + pos.col as usize
    }

    /// The observation handed to the learner.
    pub fn report(&self) -> Report {
        let pos = self.player.position;
        let row = pos.row.max(0) as usize;
        let column = pos.col.max(0) as usize;
        Report {
            row,
            column,
            gold: self.player.gold,
            location: row * self.cave.columns() + column,
            status: self.player.status,
            adjacent: self.cave.what_do_i_see(pos),
            food_level: self.player.food,
        }
    }

    /// Debug dump of the cave and the player's view.
    pub fn render(&self) -> String {
        render::draw_board(&self.cave, self.player.position, false)
    }

    /// Chebyshev distance walked from the first-step position, once known.
    pub fn distance_from_start(&self) -> Option<i32> {
        self.start.map(|s| s.chebyshev(self.player.position))
    }

    /// Visit weight of `pos`, or `None` off the grid.
    pub fn explored_weight(&self, pos: Position) -> Option<f64> {
        if !self.cave.grid().in_bounds(pos) {
            return None;
        }
        self.explored.get(self.explored_index(pos)).copied()
    }

    pub fn cave(&self) -> &Cave {
        &self.cave
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn status(&self) -> PlayerStatus {
        self.player.status
    }

    pub fn is_done(&self) -> bool {
        self.player.status.is_terminal()
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn start_position(&self) -> Option<Position> {
        self.start
    }

    /// Capture the episode state for [`crate::persistence::save_snapshot`].
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config.clone(),
            cave: self.cave.clone(),
            player: self.player.clone(),
            explored: self.explored.clone(),
            steps: self.steps,
            start: self.start,
            episode: self.episode,
        }
    }

    /// Resume from a snapshot.
    ///
    /// The random stream is not part of a snapshot; it is reseeded from the
    /// configured seed, the episode number and the step count, so Wumpus
    /// moves and later restarts differ from the uninterrupted run.
    ///
    /// Fails when [`GameSnapshot::check`] finds the parts disagree.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.check()?;
        let seed = snapshot.config.seed
            ^ ((snapshot.episode as u64) << 32)
            ^ snapshot.steps as u64;
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            config: snapshot.config,
            cave: snapshot.cave,
            player: snapshot.player,
            explored: snapshot.explored,
            steps: snapshot.steps,
            start: snapshot.start,
            episode: snapshot.episode,
        })
    }
}

/// Build a cave for `config` and drop the player somewhere sensible in it.
fn build_episode(config: &GameConfig, rng: &mut StdRng) -> Result<(Cave, Player), GameError> {
    let cave = Cave::generate(
        config.rows,
        config.columns,
        config.maze_algorithm,
        config.maze_threshold,
        rng,
    )?;
    let start = cave.random_start_location(rng);
    Ok((cave, Player::new(start)))
}
