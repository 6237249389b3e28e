//! Row-major grid of cells.
//!
//! The grid is the only storage for cave contents. It knows nothing about
//! entities; the cave layers placement rules on top of it.

use crate::cell::Cell;
use crate::direction::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fixed-size 2-D grid indexed by (row, column).
///
/// Deserialization rejects a cell vector that does not hold exactly
/// `rows × cols` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// Serialized shape of a [`Grid`], checked before it becomes one.
#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// A decoded grid whose cell count disagrees with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridShapeError {
    pub rows: usize,
    pub cols: usize,
    pub cells: usize,
}

impl std::fmt::Display for GridShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "grid of {}x{} holds {} cells",
            self.rows, self.cols, self.cells
        )
    }
}

impl std::error::Error for GridShapeError {}

impl TryFrom<RawGrid> for Grid {
    type Error = GridShapeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let expected = raw.rows.checked_mul(raw.cols);
        if expected != Some(raw.cells.len()) {
            return Err(GridShapeError {
                rows: raw.rows,
                cols: raw.cols,
                cells: raw.cells.len(),
            });
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
        })
    }
}

impl Grid {
    /// Create a grid with every position set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: Cell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    /// Solid outer wall, fully open interior.
    pub fn bordered(rows: usize, cols: usize) -> Self {
        let mut grid = Self::new(rows, cols, Cell::Empty);
        for r in 0..rows {
            for c in 0..cols {
                if r == 0 || r + 1 == rows || c == 0 || c + 1 == cols {
                    grid.cells[r * cols + c] = Cell::Wall;
                }
            }
        }
        grid
    }

    /// Parse a glyph drawing, one string per row. Returns `None` for ragged
    /// rows, an empty drawing, or an unknown glyph.
    pub fn from_glyphs(lines: &[&str]) -> Option<Self> {
        let rows = lines.len();
        let cols = lines.first()?.chars().count();
        if cols == 0 {
            return None;
        }
        let mut cells = Vec::with_capacity(rows * cols);
        for line in lines {
            if line.chars().count() != cols {
                return None;
            }
            for ch in line.chars() {
                cells.push(Cell::from_glyph(ch)?);
            }
        }
        Some(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        if r >= self.rows || c >= self.cols {
            return None;
        }
        Some(r * self.cols + c)
    }

    /// Cell at `pos`, or `None` when off the grid.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Cell at `pos`, treating off-grid positions as walls.
    pub fn get_or_wall(&self, pos: Position) -> Cell {
        self.get(pos).unwrap_or(Cell::Wall)
    }

    /// Cell at (row, column) in unsigned coordinates. Panics when out of range.
    pub fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Overwrite the cell at `pos`. Returns false when `pos` is off the grid.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_at(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_wall()).count()
    }

    /// First position holding `cell`, scanning row-major.
    pub fn find(&self, cell: Cell) -> Option<Position> {
        self.cells
            .iter()
            .position(|&c| c == cell)
            .map(|i| Position::new((i / self.cols) as i32, (i % self.cols) as i32))
    }

    /// Copy `other` into this grid with its top-left corner at (0, 0).
    /// Cells of `other` beyond this grid's bounds are dropped.
    pub fn paste(&mut self, other: &Grid) {
        for r in 0..other.rows.min(self.rows) {
            for c in 0..other.cols.min(self.cols) {
                self.set_at(r, c, other.at(r, c));
            }
        }
    }

    /// Label 4-connected regions of non-wall cells.
    ///
    /// Returns one list of positions per region, largest region first.
    pub fn open_components(&self) -> Vec<Vec<Position>> {
        let mut seen = vec![false; self.cells.len()];
        let mut components = Vec::new();

        for start in 0..self.cells.len() {
            if seen[start] || self.cells[start].is_wall() {
                continue;
            }
            let mut region = Vec::new();
            let mut queue = VecDeque::new();
            seen[start] = true;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                let pos = Position::new((current / self.cols) as i32, (current % self.cols) as i32);
                region.push(pos);
                for dir in Direction::CARDINAL {
                    if let Some(next) = self.index(pos.offset(dir)) {
                        if !seen[next] && !self.cells[next].is_wall() {
                            seen[next] = true;
                            queue.push_back(next);
                        }
                    }
                }
            }
            components.push(region);
        }

        components.sort_by(|a, b| b.len().cmp(&a.len()));
        components
    }

    /// True when every non-wall cell reaches every other through cardinal moves.
    pub fn is_connected(&self) -> bool {
        self.open_components().len() <= 1
    }

    /// Two-glyph dump: `#` for walls, space for anything else.
    pub fn wall_map(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.push(if self.at(r, c).is_wall() { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}
