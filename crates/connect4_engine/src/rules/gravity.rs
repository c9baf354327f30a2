//! Gravity invariant: no floating pieces.

use crate::board::{Board, COLS, ROWS};

/// Every column's occupied cells form one contiguous stack on the bottom row.
pub fn is_settled(board: &Board) -> bool {
    (0..COLS).all(|col| {
        let height = board.column_height(col);
        (0..ROWS).all(|row| {
            let occupied = board.get(row, col).is_some_and(|cell| !cell.is_empty());
            occupied == (row >= ROWS - height)
        })
    })
}
