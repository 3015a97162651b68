//! Shape module - canonical occupancy bitmaps and their rotation variants
//!
//! A [`Schema`] is a rows x cols bitmap of 0/1 derived from a piece's atom
//! offsets. Exactly four raw rotation variants are generated and deduplicated
//! by value equality, so symmetric shapes collapse to fewer. Generation is a
//! pure function of the offsets and safe to memoize per piece.

use std::collections::BTreeSet;
use std::fmt;

use arrayvec::ArrayVec;

/// Rows x cols bitmap of 0/1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Schema {
    /// Create a zeroed bitmap
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Build from explicit rows, for tests and fixtures
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let r = rows.len();
        let c = rows.first().map_or(0, |row| row.len());
        let mut schema = Self::new(r, c);
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                schema.set(i, j, v);
            }
        }
        schema
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at (row, col); out-of-range reads as 0
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row >= self.rows || col >= self.cols {
            return 0;
        }
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    /// Number of 1-cells
    pub fn ones(&self) -> u32 {
        self.cells.iter().map(|&v| u32::from(v)).sum()
    }

    /// Sum of the window of the given dims anchored at (row, col)
    pub fn window_sum(&self, row: usize, col: usize, rows: usize, cols: usize) -> u32 {
        let mut sum = 0;
        for m in 0..rows {
            for n in 0..cols {
                sum += u32::from(self.get(row + m, col + n));
            }
        }
        sum
    }

    /// Rotate 90 degrees clockwise: out[c][rows-1-r] = in[r][c] (dims swap)
    pub fn rotate90(&self) -> Self {
        let mut out = Self::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(c, self.rows - 1 - r, self.get(r, c));
            }
        }
        out
    }

    /// Rotate 180 degrees: out[rows-1-r][cols-1-c] = in[r][c]
    pub fn rotate180(&self) -> Self {
        let mut out = Self::new(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(self.rows - 1 - r, self.cols - 1 - c, self.get(r, c));
            }
        }
        out
    }

    /// Rotate 90 degrees counter-clockwise (inverse of [`Schema::rotate90`])
    pub fn rotate270(&self) -> Self {
        let mut out = Self::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.set(self.cols - 1 - c, r, self.get(r, c));
            }
        }
        out
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.get(r, c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Content-authoring defects detected at schema-generation time.
/// Fatal only for the offending piece template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    Empty,
    Overlapping,
    Disconnected,
}

impl SchemaError {
    pub fn code(self) -> &'static str {
        "malformed_piece"
    }

    pub fn message(self) -> &'static str {
        match self {
            SchemaError::Empty => "piece template has no atoms",
            SchemaError::Overlapping => "piece template has atoms on the same cell",
            SchemaError::Disconnected => "piece template atoms are not contiguous",
        }
    }
}

/// Derive the canonical bitmap of a piece from its atom offsets and produce
/// the deduplicated rotation variants.
///
/// Offsets are (dx, dy) in grid steps: dx columns toward +x, dy rows
/// downward. The bounding box is max-min+1 per axis; each atom marks one
/// cell.
pub fn generate_schemas(offsets: &[(i8, i8)]) -> Result<ArrayVec<Schema, 4>, SchemaError> {
    let base = base_schema(offsets)?;

    let mut variants: ArrayVec<Schema, 4> = ArrayVec::new();
    variants.push(base.clone());
    for rotated in [base.rotate90(), base.rotate180(), base.rotate270()] {
        if !variants.contains(&rotated) {
            variants.push(rotated);
        }
    }
    Ok(variants)
}

fn base_schema(offsets: &[(i8, i8)]) -> Result<Schema, SchemaError> {
    if offsets.is_empty() {
        return Err(SchemaError::Empty);
    }

    let distinct: BTreeSet<(i8, i8)> = offsets.iter().copied().collect();
    if distinct.len() != offsets.len() {
        return Err(SchemaError::Overlapping);
    }
    if !is_contiguous(&distinct) {
        return Err(SchemaError::Disconnected);
    }

    let min_dx = offsets.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
    let max_dx = offsets.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    let min_dy = offsets.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    let max_dy = offsets.iter().map(|&(_, dy)| dy).max().unwrap_or(0);

    let rows = (max_dy - min_dy) as usize + 1;
    let cols = (max_dx - min_dx) as usize + 1;
    let mut schema = Schema::new(rows, cols);
    for &(dx, dy) in offsets {
        schema.set((dy - min_dy) as usize, (dx - min_dx) as usize, 1);
    }
    Ok(schema)
}

/// Flood fill over 4-adjacency; every atom must be reachable from the first
fn is_contiguous(atoms: &BTreeSet<(i8, i8)>) -> bool {
    let mut seen: BTreeSet<(i8, i8)> = BTreeSet::new();
    let mut stack: Vec<(i8, i8)> = Vec::new();
    if let Some(&first) = atoms.iter().next() {
        stack.push(first);
        seen.insert(first);
    }
    while let Some((dx, dy)) = stack.pop() {
        for next in [(dx + 1, dy), (dx - 1, dy), (dx, dy + 1), (dx, dy - 1)] {
            if atoms.contains(&next) && seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen.len() == atoms.len()
}
