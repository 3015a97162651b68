//! Grid module - fixed cell array, occupancy, and coordinate mapping
//!
//! Cells are addressed as (row, col) with row 0 at the top. The world-space
//! mapping is fixed at construction: `origin` is the world position of cell
//! (0, 0), columns grow toward +x and rows grow toward -y, so
//! row = round((origin_y - y) / cell_size) and
//! col = round((x - origin_x) / cell_size).
//! Earlier revisions of the game mapped rows from +x instead; this crate
//! commits to the convention above everywhere.

use crate::core::shape::Schema;
use crate::types::PieceId;

/// Back-reference from a cell to the atom occupying it. The cell does not
/// own the atom; the piece does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomRef {
    pub piece: PieceId,
    pub atom: usize,
}

/// A cell's occupant (None = vacant)
pub type Occupant = Option<AtomRef>;

/// The fixed board: R x C cells in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    origin: (f32, f32),
    cell_size: f32,
    cells: Vec<Occupant>,
}

impl Grid {
    /// Create an empty grid. Dimensions, origin, and cell size are immutable
    /// afterwards.
    pub fn new(rows: usize, cols: usize, origin: (f32, f32), cell_size: f32) -> Self {
        Self {
            rows,
            cols,
            origin,
            cell_size,
            cells: vec![None; rows * cols],
        }
    }

    /// Calculate flat index from (row, col); None when out of bounds
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= self.rows as i32 || col < 0 || col >= self.cols as i32 {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Get the occupant at (row, col).
    /// Returns None when out of bounds, Some(None) when vacant.
    pub fn get(&self, row: i32, col: i32) -> Option<Occupant> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Map a world position to the nearest cell index, or None when the
    /// rounded index falls outside the grid.
    pub fn cell_at_position(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let row = ((self.origin.1 - y) / self.cell_size).round() as i32;
        let col = ((x - self.origin.0) / self.cell_size).round() as i32;
        self.index(row, col).map(|_| (row as usize, col as usize))
    }

    /// World position of a cell's center
    pub fn cell_center(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.origin.0 + col as f32 * self.cell_size,
            self.origin.1 - row as f32 * self.cell_size,
        )
    }

    /// Bind an atom to a cell. Returns false when out of bounds.
    /// The occupant field is the only thing mutated.
    pub fn occupy(&mut self, row: usize, col: usize, atom: AtomRef) -> bool {
        match self.index(row as i32, col as i32) {
            Some(idx) => {
                self.cells[idx] = Some(atom);
                true
            }
            None => false,
        }
    }

    /// Clear a cell's occupant. Returns false when out of bounds.
    pub fn vacate(&mut self, row: usize, col: usize) -> bool {
        match self.index(row as i32, col as i32) {
            Some(idx) => {
                self.cells[idx] = None;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and vacant
    pub fn is_vacant(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Check if position is within bounds and occupied
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// Snapshot of vacancies: 1 where the occupant is absent.
    /// Recomputed on demand, never persisted.
    pub fn vacancy_map(&self) -> Schema {
        let mut map = Schema::new(self.rows, self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.cells[row * self.cols + col].is_none() {
                    map.set(row, col, 1);
                }
            }
        }
        map
    }

    /// True when every cell is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Iterate over (row, col, occupant) for every occupied cell
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, AtomRef)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|atom| (idx / self.cols, idx % self.cols, atom))
        })
    }
}
