//! Win detection.
//!
//! A win is any run of four same-icon cells in one of four orientations.
//! Every 4-cell window on the grid is scanned; only existence matters, so the
//! scan order is irrelevant.

use crate::board::{Board, COLS, ROWS};
use crate::types::{Cell, Icon};
use tracing::instrument;

/// Length of a winning run.
pub const RUN: usize = 4;

/// Orientation of a line of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Left to right along a row.
    Horizontal,
    /// Top to bottom along a column.
    Vertical,
    /// Top-left to bottom-right.
    DiagonalDownRight,
    /// Top-right to bottom-left.
    DiagonalDownLeft,
}

impl Direction {
    /// Row and column step for one cell along this direction.
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }
}

/// Location of a winning run: its first cell and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    /// Row of the anchor cell.
    pub row: usize,
    /// Column of the anchor cell.
    pub col: usize,
    /// Direction the run extends in.
    pub direction: Direction,
}

impl WinningLine {
    /// The four `(row, col)` cells of this line.
    pub fn cells(&self) -> [(usize, usize); RUN] {
        let (dr, dc) = self.direction.step();
        std::array::from_fn(|i| {
            let row = self.row as isize + dr * i as isize;
            let col = self.col as isize + dc * i as isize;
            (row as usize, col as usize)
        })
    }
}

/// Checks a single window anchored at `(row, col)`.
fn window_matches(board: &Board, row: usize, col: usize, direction: Direction, icon: Icon) -> bool {
    let (dr, dc) = direction.step();
    (0..RUN as isize).all(|i| {
        let r = row as isize + dr * i;
        let c = col as isize + dc * i;
        if r < 0 || c < 0 {
            return false;
        }
        board.get(r as usize, c as usize) == Some(Cell::Occupied(icon))
    })
}

/// Finds the first winning line for `icon`, scanning every valid window.
#[instrument(skip(board))]
pub fn winning_line(board: &Board, icon: Icon) -> Option<WinningLine> {
    use strum::IntoEnumIterator;

    for direction in Direction::iter() {
        let (rows, cols) = match direction {
            Direction::Horizontal => (0..ROWS, 0..COLS - (RUN - 1)),
            Direction::Vertical => (0..ROWS - (RUN - 1), 0..COLS),
            Direction::DiagonalDownRight => (0..ROWS - (RUN - 1), 0..COLS - (RUN - 1)),
            Direction::DiagonalDownLeft => (0..ROWS - (RUN - 1), RUN - 1..COLS),
        };
        for row in rows {
            for col in cols.clone() {
                if window_matches(board, row, col, direction, icon) {
                    return Some(WinningLine { row, col, direction });
                }
            }
        }
    }
    None
}

/// True if `icon` has four in a row anywhere on the board.
pub fn has_four(board: &Board, icon: Icon) -> bool {
    winning_line(board, icon).is_some()
}

/// Would dropping `icon` into `col` complete a line?
///
/// Returns `false` for full or out-of-range columns.
pub fn wins_after_drop(board: &Board, col: usize, icon: Icon) -> bool {
    board
        .with_drop(col, icon)
        .is_ok_and(|probe| has_four(&probe, icon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert!(!has_four(&board, Icon::X));
        assert!(!has_four(&board, Icon::O));
    }

    #[test]
    fn test_horizontal_win() {
        let board = Board::from_drops(&[(2, Icon::O), (3, Icon::O), (4, Icon::O), (5, Icon::O)]);
        let line = winning_line(&board, Icon::O).unwrap();
        assert_eq!(line.direction, Direction::Horizontal);
        assert_eq!(line.cells(), [(6, 2), (6, 3), (6, 4), (6, 5)]);
        assert!(!has_four(&board, Icon::X));
    }

    #[test]
    fn test_horizontal_win_at_right_edge() {
        let board = Board::from_drops(&[(4, Icon::X), (5, Icon::X), (6, Icon::X), (7, Icon::X)]);
        assert!(has_four(&board, Icon::X));
    }

    #[test]
    fn test_vertical_win() {
        let board = Board::from_drops(&[(0, Icon::X), (0, Icon::X), (0, Icon::X), (0, Icon::X)]);
        let line = winning_line(&board, Icon::X).unwrap();
        assert_eq!(line.direction, Direction::Vertical);
        assert_eq!(line.cells(), [(3, 0), (4, 0), (5, 0), (6, 0)]);
    }

    #[test]
    fn test_diagonal_down_right_win() {
        // Staircase rising to the left: X at (3,0), (4,1), (5,2), (6,3).
        let board = Board::from_drops(&[
            (3, Icon::X),
            (2, Icon::O),
            (2, Icon::X),
            (1, Icon::O),
            (1, Icon::O),
            (1, Icon::X),
            (0, Icon::O),
            (0, Icon::O),
            (0, Icon::O),
            (0, Icon::X),
        ]);
        let line = winning_line(&board, Icon::X).unwrap();
        assert_eq!(line.direction, Direction::DiagonalDownRight);
        assert_eq!(line.cells(), [(3, 0), (4, 1), (5, 2), (6, 3)]);
    }

    #[test]
    fn test_diagonal_down_left_win() {
        // Staircase rising to the right: O at (6,4), (5,5), (4,6), (3,7).
        let board = Board::from_drops(&[
            (4, Icon::O),
            (5, Icon::X),
            (5, Icon::O),
            (6, Icon::X),
            (6, Icon::X),
            (6, Icon::O),
            (7, Icon::X),
            (7, Icon::X),
            (7, Icon::X),
            (7, Icon::O),
        ]);
        let line = winning_line(&board, Icon::O).unwrap();
        assert_eq!(line.direction, Direction::DiagonalDownLeft);
        assert_eq!(line.cells(), [(3, 7), (4, 6), (5, 5), (6, 4)]);
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let board = Board::from_drops(&[(0, Icon::X), (1, Icon::X), (2, Icon::X)]);
        assert!(!has_four(&board, Icon::X));
    }

    #[test]
    fn test_mixed_icons_are_not_a_win() {
        let board = Board::from_drops(&[(0, Icon::X), (1, Icon::X), (2, Icon::O), (3, Icon::X)]);
        assert!(!has_four(&board, Icon::X));
        assert!(!has_four(&board, Icon::O));
    }

    #[test]
    fn test_wins_after_drop_probe() {
        let board = Board::from_drops(&[(0, Icon::X), (1, Icon::X), (2, Icon::X)]);
        assert!(wins_after_drop(&board, 3, Icon::X));
        assert!(!wins_after_drop(&board, 4, Icon::X));
        assert!(!wins_after_drop(&board, 3, Icon::O));
        assert!(!wins_after_drop(&board, COLS, Icon::X));
        // Probe must not touch the original.
        assert_eq!(board.column_height(3), 0);
    }
}
