//! Heuristic opponent.

use super::MoveChooser;
use anyhow::{Result, bail};
use async_trait::async_trait;
use connect4_engine::{Board, COLS, Icon, rules};
use derive_new::new;
use std::time::Duration;
use tracing::debug;

/// Columns tried first: centre outwards.
const PREFERENCE: [usize; COLS] = [3, 4, 2, 5, 1, 6, 0, 7];

/// Picks a column by simple rules.
///
/// 1. Win now if possible.
/// 2. Otherwise block the opponent's immediate win.
/// 3. Otherwise avoid columns that hand the opponent a win on the next drop.
/// 4. Otherwise prefer the centre.
pub fn pick_column(board: &Board, icon: Icon) -> Option<usize> {
    let open: Vec<usize> = PREFERENCE
        .iter()
        .copied()
        .filter(|&col| !board.is_column_full(col))
        .collect();
    let opponent = icon.opponent();

    if let Some(&col) = open.iter().find(|&&col| rules::wins_after_drop(board, col, icon)) {
        debug!(col, "Winning drop");
        return Some(col);
    }
    if let Some(&col) = open
        .iter()
        .find(|&&col| rules::wins_after_drop(board, col, opponent))
    {
        debug!(col, "Blocking drop");
        return Some(col);
    }

    let safe = open.iter().copied().find(|&col| {
        board.with_drop(col, icon).is_ok_and(|next| {
            !next
                .open_columns()
                .into_iter()
                .any(|reply| rules::wins_after_drop(&next, reply, opponent))
        })
    });
    safe.or_else(|| open.first().copied())
}

/// Bot that thinks for a moment, then plays [`pick_column`].
#[derive(Debug, Clone, new)]
pub struct HeuristicBot {
    think_time: Duration,
}

impl Default for HeuristicBot {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl MoveChooser for HeuristicBot {
    async fn choose(&mut self, board: &Board, icon: Icon) -> Result<i64> {
        debug!(%icon, "Bot making move");
        tokio::time::sleep(self.think_time).await;
        match pick_column(board, icon) {
            Some(col) => Ok(col as i64),
            None => bail!("No valid moves available"),
        }
    }
}
