//! The 7x8 Connect Four grid.

use crate::types::{Cell, Icon};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Number of rows. Row 0 is the top of the board.
pub const ROWS: usize = 7;

/// Number of columns.
pub const COLS: usize = 8;

/// Why a piece could not be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum DropError {
    /// Column index outside `0..COLS`.
    #[display("column {_0} is out of range")]
    OutOfRange(#[error(not(source))] usize),
    /// Top cell of the column is occupied.
    #[display("column {_0} is full")]
    ColumnFull(#[error(not(source))] usize),
}

/// Fixed-size grid of cells.
///
/// Pieces only ever rest on the lowest empty cell of a column, so every
/// column is an unbroken stack growing up from the bottom row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Gets the cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Row-major view of every cell.
    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// True if `col` is a valid column index.
    pub fn in_bounds(col: usize) -> bool {
        col < COLS
    }

    /// Checks whether the top cell of `col` is taken.
    ///
    /// Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        !Self::in_bounds(col) || !self.cells[0][col].is_empty()
    }

    /// Number of pieces stacked in `col`.
    pub fn column_height(&self, col: usize) -> usize {
        if !Self::in_bounds(col) {
            return 0;
        }
        (0..ROWS).filter(|&row| !self.cells[row][col].is_empty()).count()
    }

    /// Row a piece dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if !Self::in_bounds(col) {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_empty())
    }

    /// Columns that still accept a piece, left to right.
    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Checks if every column is full.
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Drops a piece into `col`, returning the row where it landed.
    pub(crate) fn drop_piece(&mut self, col: usize, icon: Icon) -> Result<usize, DropError> {
        if !Self::in_bounds(col) {
            return Err(DropError::OutOfRange(col));
        }
        let row = self.landing_row(col).ok_or(DropError::ColumnFull(col))?;
        self.cells[row][col] = Cell::Occupied(icon);
        Ok(row)
    }

    /// Copy of this board with `icon` dropped into `col`. The original is untouched.
    pub fn with_drop(&self, col: usize, icon: Icon) -> Result<Board, DropError> {
        let mut next = self.clone();
        next.drop_piece(col, icon)?;
        Ok(next)
    }

    /// Formats the board as rows of cells separated by `" | "`.
    ///
    /// Empty cells print as `0`, matching the wire format.
    pub fn display(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => "0".to_string(),
                        Cell::Occupied(icon) => icon.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Builds a board by dropping pieces in order. Test fixtures only.
    #[cfg(test)]
    pub(crate) fn from_drops(drops: &[(usize, Icon)]) -> Self {
        let mut board = Self::new();
        for &(col, icon) in drops {
            board.drop_piece(col, icon).expect("fixture drop must be legal");
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
