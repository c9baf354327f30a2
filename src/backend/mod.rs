//! Access to a game engine, in-process or over HTTP.
//!
//! Front-ends never touch the engine directly. They go through a
//! [`GameBackend`], which hands out snapshots and reports moves as accepted
//! or rejected.

mod http_client;
mod local;

pub use http_client::HttpGameClient;
pub use local::{LocalBackend, SharedEngine};

use async_trait::async_trait;
use connect4_engine::{Board, GameStatus, Icon, PlayerId};
use derive_more::{Display, Error};

/// Answer to a status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReply {
    /// The second player has not registered yet. Not an error.
    NotReady,
    /// Both players registered.
    Ready(GameStatus),
}

impl StatusReply {
    /// The status, if the game is ready.
    pub fn ready(self) -> Option<GameStatus> {
        match self {
            StatusReply::NotReady => None,
            StatusReply::Ready(status) => Some(status),
        }
    }
}

/// Result of submitting a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied. The landing row is known only in-process.
    Accepted {
        /// Row the piece landed in.
        row: Option<usize>,
    },
    /// The move was not accepted; nothing changed.
    Rejected {
        /// Why, for display only.
        reason: String,
    },
}

/// Failure talking to the engine. Rejected moves are not errors.
#[derive(Debug, Display, Error)]
pub enum BackendError {
    /// The request never produced a response. The reqwest error is the source.
    #[display("request to game server failed")]
    Transport(reqwest::Error),
    /// The response did not match the contract.
    #[display("unexpected response from game server: {_0}")]
    Protocol(#[error(not(source))] String),
    /// Registration was refused. The caller cannot join this game.
    #[display("registration rejected: {_0}")]
    RegistrationRejected(#[error(not(source))] String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err)
    }
}

impl BackendError {
    /// Transient failures are worth retrying; the rest are fatal.
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

/// The four engine operations a front-end may use.
#[async_trait]
pub trait GameBackend: Send + Sync {
    /// Claims a slot for `player_id`.
    async fn register(&self, player_id: &PlayerId) -> Result<Icon, BackendError>;

    /// Current status, or [`StatusReply::NotReady`] before both players joined.
    async fn status(&self) -> Result<StatusReply, BackendError>;

    /// Snapshot of the board.
    async fn board(&self) -> Result<Board, BackendError>;

    /// Submits a move for `player_id`, subject to turn order.
    async fn submit_move(
        &self,
        column: i64,
        player_id: &PlayerId,
    ) -> Result<MoveOutcome, BackendError>;
}
