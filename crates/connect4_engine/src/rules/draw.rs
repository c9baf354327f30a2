//! Draw detection.

use super::win::has_four;
use crate::board::Board;
use crate::types::Icon;
use tracing::instrument;

/// Checks if the board is full (every column topped out).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// A full board on which neither icon has four in a row.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && !has_four(board, Icon::X) && !has_four(board, Icon::O)
}
