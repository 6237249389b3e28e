//! Cave world - layout, entity placement, and what the player can see.
//!
//! A cave is built once per episode. Small caves get the traditional
//! "studio" plan (solid perimeter, open floor); caves above the maze
//! threshold on both axes get a generated maze. The Wumpus is placed first,
//! its treasure goes in the first free compass neighbor, and the pit, exit,
//! and food are scattered with [`Cave::random_start_location`], which tries
//! to keep them away from the Wumpus.

use crate::cell::Cell;
use crate::constants::{
    FOOD_PER_ITEM, MAZE_THRESHOLD, MIN_CAVE_DIM, NEAR_FACTOR, PLACEMENT_ATTEMPTS,
    WUMPUS_MOVE_ATTEMPTS,
};
use crate::direction::{Direction, Position};
use crate::error::MazeError;
use crate::grid::Grid;
use crate::maze::{self, MazeAlgorithm};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the cave floor plan was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// Perimeter wall around a fully open interior.
    Studio,
    /// Generated maze padded to the requested size.
    Maze(MazeAlgorithm),
    /// Supplied directly by the caller.
    Custom,
}

/// Result of one constrained placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    /// Random draws consumed, at most [`PLACEMENT_ATTEMPTS`].
    pub attempts: u32,
    /// False when every draw was rejected and `position` is the last one sampled.
    pub satisfied: bool,
}

/// The cave: a grid of cells plus the tracked Wumpus and treasure locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cave {
    grid: Grid,
    layout: Layout,
    wumpus: Option<Position>,
    treasure: Option<Position>,
}

impl Cave {
    /// Build a cave with the default maze threshold and generator.
    pub fn new<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Self, MazeError> {
        Self::generate(rows, cols, MazeAlgorithm::default(), MAZE_THRESHOLD, rng)
    }

    /// Build a cave, choosing a maze layout with `algorithm` when both sides
    /// exceed `maze_threshold`, then place every entity.
    pub fn generate<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        algorithm: MazeAlgorithm,
        maze_threshold: usize,
        rng: &mut R,
    ) -> Result<Self, MazeError> {
        if rows < MIN_CAVE_DIM || cols < MIN_CAVE_DIM {
            return Err(MazeError::DimensionsTooSmall {
                rows,
                cols,
                min: MIN_CAVE_DIM,
            });
        }

        let (grid, layout) = if rows > maze_threshold && cols > maze_threshold {
            (maze_plan(rows, cols, algorithm, rng)?, Layout::Maze(algorithm))
        } else {
            (Grid::bordered(rows, cols), Layout::Studio)
        };

        let mut cave = Self {
            grid,
            layout,
            wumpus: None,
            treasure: None,
        };
        cave.populate(rng);
        Ok(cave)
    }

    /// Wrap an existing grid. The Wumpus and treasure are located by scanning.
    pub fn from_grid(grid: Grid) -> Self {
        let wumpus = grid.find(Cell::Wumpus);
        let treasure = grid.find(Cell::Treasure);
        Self {
            grid,
            layout: Layout::Custom,
            wumpus,
            treasure,
        }
    }

    fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let lair = self.random_start_location(rng);
        self.grid.set(lair, Cell::Wumpus);
        self.wumpus = Some(lair);
        self.stash_treasure(lair);

        for item in [Cell::Pit, Cell::Exit, Cell::Food] {
            let p = self.random_start_location(rng);
            self.grid.set(p, item);
        }

        log::debug!(
            "Cave {}x{} ({:?}): wumpus={:?} treasure={:?}",
            self.rows(),
            self.columns(),
            self.layout,
            self.wumpus,
            self.treasure
        );
    }

    /// Drop the treasure in the first empty neighbor of `lair`, scanning in
    /// [`Direction::ALL`] order. A lair with no empty neighbor gets none.
    fn stash_treasure(&mut self, lair: Position) -> Option<Position> {
        let spot = Direction::ALL
            .iter()
            .map(|dir| lair.offset(*dir))
            .find(|spot| self.grid.get(*spot) == Some(Cell::Empty))?;
        self.grid.set(spot, Cell::Treasure);
        self.treasure = Some(spot);
        Some(spot)
    }

    /// Sample an interior cell that is empty and at least [`NEAR_FACTOR`] from
    /// the Wumpus on both axes.
    ///
    /// Best effort: after [`PLACEMENT_ATTEMPTS`] rejected draws the last
    /// sampled cell is returned anyway, even if it is occupied or too close.
    pub fn random_start_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        self.place(rng).position
    }

    /// [`Cave::random_start_location`] with the attempt count exposed.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> Placement {
        let row_end = self.rows().saturating_sub(2).max(2);
        let col_end = self.columns().saturating_sub(2).max(2);
        let mut candidate = Position::new(1, 1);

        for attempt in 1..=PLACEMENT_ATTEMPTS {
            candidate = Position::new(
                rng.gen_range(1..row_end) as i32,
                rng.gen_range(1..col_end) as i32,
            );
            if self.grid.get(candidate) != Some(Cell::Empty) {
                continue;
            }
            let far_enough = match self.wumpus {
                None => true,
                Some(w) => {
                    let (dr, dc) = candidate.axis_deltas(w);
                    dr >= NEAR_FACTOR && dc >= NEAR_FACTOR
                }
            };
            if far_enough {
                return Placement {
                    position: candidate,
                    attempts: attempt,
                    satisfied: true,
                };
            }
        }

        log::warn!(
            "Placement gave up after {} attempts, using {:?} (holds {})",
            PLACEMENT_ATTEMPTS,
            candidate,
            self.cell(candidate).name()
        );
        Placement {
            position: candidate,
            attempts: PLACEMENT_ATTEMPTS,
            satisfied: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn columns(&self) -> usize {
        self.grid.cols()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn wumpus_location(&self) -> Option<Position> {
        self.wumpus
    }

    /// Treasure position, or `None` once it has been collected.
    pub fn treasure_location(&self) -> Option<Position> {
        self.treasure
    }

    /// Cell contents, with off-grid positions reading as walls.
    pub fn cell(&self, pos: Position) -> Cell {
        self.grid.get_or_wall(pos)
    }

    pub fn find(&self, cell: Cell) -> Option<Position> {
        self.grid.find(cell)
    }

    /// The only movement gate: on the grid and not a wall.
    pub fn can_move_into(&self, pos: Position) -> bool {
        matches!(self.grid.get(pos), Some(c) if c != Cell::Wall)
    }

    /// The eight neighbors of `pos` in [`Direction::ALL`] order.
    pub fn what_do_i_see(&self, pos: Position) -> [Cell; 8] {
        let mut seen = [Cell::Wall; 8];
        for (slot, dir) in seen.iter_mut().zip(Direction::ALL) {
            *slot = self.cell(pos.offset(dir));
        }
        seen
    }

    /// Pick up the treasure at `pos`. Returns the gold gained (0 or 1).
    pub fn take_gold(&mut self, pos: Position) -> u32 {
        if self.grid.get(pos) == Some(Cell::Treasure) {
            self.grid.set(pos, Cell::Empty);
            self.treasure = None;
            return 1;
        }
        0
    }

    /// Eat the food at `pos`. Returns the food gained (0 or [`FOOD_PER_ITEM`]).
    pub fn eat_food(&mut self, pos: Position) -> i32 {
        if self.grid.get(pos) == Some(Cell::Food) {
            self.grid.set(pos, Cell::Empty);
            return FOOD_PER_ITEM;
        }
        0
    }

    /// Try to shuffle the Wumpus one compass step, staying within
    /// [`NEAR_FACTOR`] of its treasure on both axes while the treasure exists.
    ///
    /// Up to [`WUMPUS_MOVE_ATTEMPTS`] random directions are tried; the first
    /// empty cell that satisfies the leash wins. Returns the Wumpus position
    /// afterwards, or `None` if there is no Wumpus.
    pub fn move_wumpus<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Position> {
        self.relocate_wumpus(rng, None)
    }

    /// [`Cave::move_wumpus`], never stepping onto `avoid` (the player).
    pub fn move_wumpus_avoiding<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        avoid: Position,
    ) -> Option<Position> {
        self.relocate_wumpus(rng, Some(avoid))
    }

    fn relocate_wumpus<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        avoid: Option<Position>,
    ) -> Option<Position> {
        let from = self.wumpus?;
        for _ in 0..WUMPUS_MOVE_ATTEMPTS {
            let dir = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            let to = from.offset(dir);
            if Some(to) == avoid || self.grid.get(to) != Some(Cell::Empty) {
                continue;
            }
            if let Some(gold) = self.treasure {
                let (dr, dc) = to.axis_deltas(gold);
                if dr > NEAR_FACTOR || dc > NEAR_FACTOR {
                    continue;
                }
            }
            self.grid.set(from, Cell::Empty);
            self.grid.set(to, Cell::Wumpus);
            self.wumpus = Some(to);
            return Some(to);
        }
        Some(from)
    }
}

/// Carve a maze sized to fit inside `rows × cols`, padding any leftover
/// row or column with wall.
fn maze_plan<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    algorithm: MazeAlgorithm,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    let carved = maze::generate(algorithm, (rows - 1) / 2, (cols - 1) / 2, rng)?;
    let mut grid = Grid::new(rows, cols, Cell::Wall);
    grid.paste(&carved);
    Ok(grid)
}
