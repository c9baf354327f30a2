//! Turn coordination: registration, activation, the polling loop and the
//! end-of-game announcements.

mod local;
mod remote;

pub use local::LocalCoordinator;
pub use remote::RemoteCoordinator;

use connect4_engine::{GameStatus, PlayerSlot};
use derive_getters::Getters;
use derive_more::Display;
use derive_new::new;

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameOutcome {
    /// Four in a row for this slot.
    #[display("player {} ({}) won", _0.id(), _0.icon())]
    Won(PlayerSlot),
    /// Full board, no winner.
    #[display("draw")]
    Draw,
}

impl GameOutcome {
    /// The outcome recorded in `status`, if the game is over.
    pub fn from_status(status: &GameStatus) -> Option<Self> {
        match (&status.winner, status.draw) {
            (Some(winner), _) => Some(GameOutcome::Won(winner.clone())),
            (None, true) => Some(GameOutcome::Draw),
            (None, false) => None,
        }
    }
}

/// Final result handed back by a coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameReport {
    /// How the game ended.
    outcome: GameOutcome,
    /// Turn counter when the game ended.
    turn_number: u32,
}
