//! Maze generation - carves traversable layouts out of solid rock.
//!
//! Three interchangeable strategies sit behind [`MazeGenerator`]. All of them
//! take a *logical* size of `rows × cols` cells and return a grid of
//! `(2·rows+1) × (2·cols+1)` positions: logical cells live at odd
//! coordinates, the positions between them are walls that may be carved.
//! Every open cell of the result is reachable from every other.
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use wumpus_logic::maze::{generate, MazeAlgorithm};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let grid = generate(MazeAlgorithm::Kruskal, 10, 12, &mut rng).unwrap();
//! assert_eq!((grid.rows(), grid.cols()), (21, 25));
//! assert!(grid.is_connected());
//! ```

mod backtracker;
mod disjoint_set;
mod kruskal;
mod prim;

pub use backtracker::Backtracker;
pub use disjoint_set::DisjointSet;
pub use kruskal::Kruskal;
pub use prim::Prim;

use crate::error::MazeError;
use crate::grid::Grid;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest logical side accepted by every generator.
pub const MIN_LOGICAL_DIM: usize = 1;

/// A maze-carving strategy.
pub trait MazeGenerator {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Carve a maze of `rows × cols` logical cells.
    ///
    /// Callers must validate dimensions first; [`generate`] does so.
    fn carve<R: Rng + ?Sized>(&self, rows: usize, cols: usize, rng: &mut R) -> Grid;
}

/// Which generator a cave uses. Selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeAlgorithm {
    /// Randomized work-list carving. Grows a connected blob from one cell;
    /// the work list can drain early, leaving only a small open region.
    Backtracker,
    /// Randomized Kruskal over a union-find. Opens every logical cell.
    #[default]
    Kruskal,
    /// Randomized Prim from a random seed cell. Short dead-end branches.
    Prim,
}

impl MazeAlgorithm {
    pub const ALL: [MazeAlgorithm; 3] = [
        MazeAlgorithm::Backtracker,
        MazeAlgorithm::Kruskal,
        MazeAlgorithm::Prim,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MazeAlgorithm::Backtracker => Backtracker.name(),
            MazeAlgorithm::Kruskal => Kruskal.name(),
            MazeAlgorithm::Prim => Prim.name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    fn carve<R: Rng + ?Sized>(self, rows: usize, cols: usize, rng: &mut R) -> Grid {
        match self {
            MazeAlgorithm::Backtracker => Backtracker.carve(rows, cols, rng),
            MazeAlgorithm::Kruskal => Kruskal.carve(rows, cols, rng),
            MazeAlgorithm::Prim => Prim.carve(rows, cols, rng),
        }
    }
}

/// Grid size produced for a logical maze of `rows × cols` cells.
pub fn grid_dims(rows: usize, cols: usize) -> (usize, usize) {
    (2 * rows + 1, 2 * cols + 1)
}

/// Validate the logical size, then carve a maze with `algorithm`.
pub fn generate<R: Rng + ?Sized>(
    algorithm: MazeAlgorithm,
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    if rows < MIN_LOGICAL_DIM || cols < MIN_LOGICAL_DIM {
        return Err(MazeError::DimensionsTooSmall {
            rows,
            cols,
            min: MIN_LOGICAL_DIM,
        });
    }
    Ok(algorithm.carve(rows, cols, rng))
}

/// Grid coordinate of logical cell `(row, col)`.
pub(crate) fn cell_to_grid(row: usize, col: usize) -> (usize, usize) {
    (2 * row + 1, 2 * col + 1)
}

/// Open two adjacent logical cells and the wall between them.
pub(crate) fn open_passage(grid: &mut Grid, a: (usize, usize), b: (usize, usize)) {
    use crate::cell::Cell;
    let (r1, c1) = cell_to_grid(a.0, a.1);
    let (r2, c2) = cell_to_grid(b.0, b.1);
    grid.set_at(r1, c1, Cell::Empty);
    grid.set_at(r2, c2, Cell::Empty);
    grid.set_at((r1 + r2) / 2, (c1 + c2) / 2, Cell::Empty);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use rand::{rngs::StdRng, SeedableRng};

    /// Open positions with exactly one even coordinate sit between two logical
    /// cells; each is one removed wall.
    fn removed_walls(grid: &Grid) -> usize {
        let mut n = 0;
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                if grid.at(r, c) != Cell::Wall && (r % 2 == 0) != (c % 2 == 0) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn rejects_empty_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        for algo in MazeAlgorithm::ALL {
            let err = generate(algo, 0, 5, &mut rng).unwrap_err();
            assert_eq!(
                err,
                MazeError::DimensionsTooSmall { rows: 0, cols: 5, min: 1 }
            );
            assert!(generate(algo, 4, 0, &mut rng).is_err());
        }
    }

    #[test]
    fn every_algorithm_is_connected_across_seeds() {
        for algo in MazeAlgorithm::ALL {
            for seed in 0..25u64 {
                let mut rng = StdRng::seed_from_u64(seed);
                let (rows, cols) = (3 + (seed as usize % 9), 2 + (seed as usize % 13));
                let grid = generate(algo, rows, cols, &mut rng).unwrap();
                assert_eq!((grid.rows(), grid.cols()), grid_dims(rows, cols));
                assert!(grid.open_count() > 0, "{} seed {}", algo.name(), seed);
                assert!(grid.is_connected(), "{} seed {} disconnected", algo.name(), seed);
            }
        }
    }

    #[test]
    fn spanning_tree_generators_remove_cells_minus_one_walls() {
        for algo in [MazeAlgorithm::Kruskal, MazeAlgorithm::Prim] {
            for seed in 0..20u64 {
                let mut rng = StdRng::seed_from_u64(seed);
                let (rows, cols) = (4 + seed as usize % 5, 3 + seed as usize % 7);
                let grid = generate(algo, rows, cols, &mut rng).unwrap();
                assert_eq!(removed_walls(&grid), rows * cols - 1, "{} seed {}", algo.name(), seed);
                // every logical cell is open
                for r in 0..rows {
                    for c in 0..cols {
                        let (gr, gc) = cell_to_grid(r, c);
                        assert_eq!(grid.at(gr, gc), Cell::Empty);
                    }
                }
            }
        }
    }

    #[test]
    fn perimeter_stays_solid() {
        for algo in MazeAlgorithm::ALL {
            let mut rng = StdRng::seed_from_u64(99);
            let grid = generate(algo, 8, 6, &mut rng).unwrap();
            for c in 0..grid.cols() {
                assert_eq!(grid.at(0, c), Cell::Wall);
                assert_eq!(grid.at(grid.rows() - 1, c), Cell::Wall);
            }
            for r in 0..grid.rows() {
                assert_eq!(grid.at(r, 0), Cell::Wall);
                assert_eq!(grid.at(r, grid.cols() - 1), Cell::Wall);
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        for algo in MazeAlgorithm::ALL {
            let a = generate(algo, 9, 9, &mut StdRng::seed_from_u64(5)).unwrap();
            let b = generate(algo, 9, 9, &mut StdRng::seed_from_u64(5)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn single_cell_maze_is_one_open_position() {
        for algo in MazeAlgorithm::ALL {
            let grid = generate(algo, 1, 1, &mut StdRng::seed_from_u64(3)).unwrap();
            assert_eq!((grid.rows(), grid.cols()), (3, 3));
            assert_eq!(grid.open_count(), 1);
            assert_eq!(grid.at(1, 1), Cell::Empty);
        }
    }

    #[test]
    fn names_roundtrip() {
        for algo in MazeAlgorithm::ALL {
            assert_eq!(MazeAlgorithm::from_name(algo.name()), Some(algo));
        }
        assert_eq!(MazeAlgorithm::from_name("eller"), None);
    }
}
