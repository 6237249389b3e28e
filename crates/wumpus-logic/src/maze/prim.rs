//! Randomized Prim: grow a tree from one random cell, each round opening a
//! uniformly chosen frontier wall that leads to an unvisited cell.

use super::{cell_to_grid, grid_dims, open_passage, MazeGenerator};
use crate::cell::Cell;
use crate::grid::Grid;
use rand::Rng;

#[derive(Debug, Clone, Copy, Default)]
pub struct Prim;

type Wall = ((usize, usize), (usize, usize));

impl MazeGenerator for Prim {
    fn name(&self) -> &'static str {
        "prim"
    }

    fn carve<R: Rng + ?Sized>(&self, rows: usize, cols: usize, rng: &mut R) -> Grid {
        let (height, width) = grid_dims(rows, cols);
        let mut grid = Grid::new(height, width, Cell::Wall);
        let mut visited = vec![false; rows * cols];
        let mut frontier: Vec<Wall> = Vec::new();

        let start = (rng.gen_range(0..rows), rng.gen_range(0..cols));
        visited[start.0 * cols + start.1] = true;
        let (sr, sc) = cell_to_grid(start.0, start.1);
        grid.set_at(sr, sc, Cell::Empty);
        push_walls(&grid, start, rows, cols, &mut frontier);

        while !frontier.is_empty() {
            let pick = rng.gen_range(0..frontier.len());
            let (a, b) = frontier.swap_remove(pick);

            let a_seen = visited[a.0 * cols + a.1];
            let b_seen = visited[b.0 * cols + b.1];
            if a_seen && b_seen {
                continue;
            }

            let fresh = if a_seen { b } else { a };
            visited[fresh.0 * cols + fresh.1] = true;
            open_passage(&mut grid, a, b);
            push_walls(&grid, fresh, rows, cols, &mut frontier);
        }
        grid
    }
}

/// Queue the walls from `cell` to each in-bounds neighbor that is still solid.
fn push_walls(
    grid: &Grid,
    cell: (usize, usize),
    rows: usize,
    cols: usize,
    frontier: &mut Vec<Wall>,
) {
    let (r, c) = cell;
    let mut neighbors = Vec::with_capacity(4);
    if c + 1 < cols {
        neighbors.push((r, c + 1));
    }
    if r + 1 < rows {
        neighbors.push((r + 1, c));
    }
    if c > 0 {
        neighbors.push((r, c - 1));
    }
    if r > 0 {
        neighbors.push((r - 1, c));
    }
    for n in neighbors {
        let (gr, gc) = cell_to_grid(n.0, n.1);
        if grid.at(gr, gc) == Cell::Wall {
            frontier.push((cell, n));
        }
    }
}
