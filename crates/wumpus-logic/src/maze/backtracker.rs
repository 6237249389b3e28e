//! Randomized work-list carver.
//!
//! Starts from one interior position of an all-wall grid and grows outward:
//! each newly opened position queues a random subset of its still-walled
//! cardinal neighbors, and the queue is drained front first. Every queued
//! position touches an already-open one, so the carved region stays
//! connected. The outer ring is never carved.

use super::{grid_dims, MazeGenerator};
use crate::cell::Cell;
use crate::direction::{Direction, Position};
use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Default)]
pub struct Backtracker;

impl MazeGenerator for Backtracker {
    fn name(&self) -> &'static str {
        "backtracker"
    }

    fn carve<R: Rng + ?Sized>(&self, rows: usize, cols: usize, rng: &mut R) -> Grid {
        let (height, width) = grid_dims(rows, cols);
        let mut grid = Grid::new(height, width, Cell::Wall);

        let start = Position::new(
            1 + rng.gen_range(0..height - 2) as i32,
            1 + rng.gen_range(0..width - 2) as i32,
        );
        carve_from(&mut grid, start, rng);
        grid
    }
}

fn is_interior(grid: &Grid, pos: Position) -> bool {
    pos.row > 0
        && pos.col > 0
        && (pos.row as usize) < grid.rows() - 1
        && (pos.col as usize) < grid.cols() - 1
}

fn carve_from<R: Rng + ?Sized>(grid: &mut Grid, start: Position, rng: &mut R) {
    let mut directions = Direction::CARDINAL;
    let mut work: VecDeque<Position> = VecDeque::new();
    work.push_back(start);

    let mut current = start;
    let mut budget = (grid.rows() - 1) * (grid.cols() - 1);

    while !work.is_empty() && budget > 0 {
        if grid.get(current) == Some(Cell::Wall) {
            directions.shuffle(rng);
            grid.set(current, Cell::Empty);

            // Independent draw: how many neighbors may be queued from here.
            // A zero countdown only stops the loop if the first direction
            // queues nothing.
            let mut countdown = rng.gen_range(0..directions.len()) as i32;
            for dir in directions {
                let next = current.offset(dir);
                if is_interior(grid, next) && grid.get(next) == Some(Cell::Wall) {
                    work.push_back(next);
                    countdown -= 1;
                }
                if countdown == 0 {
                    break;
                }
            }
        }

        if let Some(next) = work.pop_front() {
            current = next;
        }
        budget -= 1;
    }
}
