//! Randomized Kruskal: shuffle every wall between adjacent cells, then knock
//! down each wall whose two sides are not yet connected.

use super::{grid_dims, open_passage, DisjointSet, MazeGenerator};
use crate::cell::Cell;
use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, Default)]
pub struct Kruskal;

type Edge = ((usize, usize), (usize, usize));

impl MazeGenerator for Kruskal {
    fn name(&self) -> &'static str {
        "kruskal"
    }

    fn carve<R: Rng + ?Sized>(&self, rows: usize, cols: usize, rng: &mut R) -> Grid {
        let (height, width) = grid_dims(rows, cols);
        let mut grid = Grid::new(height, width, Cell::Wall);
        for r in 0..rows {
            for c in 0..cols {
                grid.set_at(2 * r + 1, 2 * c + 1, Cell::Empty);
            }
        }

        let mut edges: Vec<Edge> = Vec::with_capacity(2 * rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                if r + 1 < rows {
                    edges.push(((r, c), (r + 1, c)));
                }
                if c + 1 < cols {
                    edges.push(((r, c), (r, c + 1)));
                }
            }
        }
        edges.shuffle(rng);

        let mut sets = DisjointSet::new(rows * cols);
        for (a, b) in edges {
            if sets.union(a.0 * cols + a.1, b.0 * cols + b.1) {
                open_passage(&mut grid, a, b);
                if sets.set_count() == 1 {
                    break;
                }
            }
        }
        grid
    }
}
