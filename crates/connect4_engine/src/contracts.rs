//! Status snapshots and request/response bodies shared by every topology.
//!
//! These are the payloads front-ends see. In-process coordinators receive
//! them by value; the HTTP boundary serializes them as JSON.

use crate::board::Board;
use crate::types::{Icon, PlayerId, PlayerSlot};
use serde::{Deserialize, Serialize};

/// Read-only snapshot of the game state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStatus {
    /// Icon of the player allowed to move, once the game has been activated.
    #[serde(alias = "active_player")]
    pub active_icon: Option<Icon>,
    /// Identifier of the player allowed to move.
    pub active_id: Option<PlayerId>,
    /// Set once, when a move completes four in a row.
    pub winner: Option<PlayerSlot>,
    /// Number of accepted moves that did not end the game.
    pub turn_number: u32,
    /// True when the board filled up without a winner.
    #[serde(default)]
    pub draw: bool,
}

impl GameStatus {
    /// No further moves will be accepted.
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.draw
    }

    /// Checks whether `(player_id, icon)` matches the active player.
    pub fn is_active(&self, player_id: &str, icon: Icon) -> bool {
        self.active_icon == Some(icon)
            && self.active_id.as_ref().map(PlayerId::as_str) == Some(player_id)
    }
}

/// Body of a registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Identifier the caller wants to play under.
    #[serde(default)]
    pub player_id: Option<String>,
}

/// Body of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Icon assigned to the new player.
    pub player_icon: Icon,
}

/// Body of a move submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Column to drop into. Signed so that negative input is rejected as a
    /// move rather than as malformed JSON.
    pub column: i64,
    /// Identifier of the mover.
    pub player_id: String,
}

/// Body of a move response, accepted or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Whether the move was applied.
    pub accepted: bool,
    /// Echo of the column, on acceptance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Echo of the mover, on acceptance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    /// Human-readable rejection reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MoveResponse {
    /// An accepted move.
    pub fn accepted(column: usize, player_id: impl Into<String>) -> Self {
        Self {
            accepted: true,
            column: Some(column),
            player_id: Some(player_id.into()),
            reason: None,
        }
    }

    /// A rejected move.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            column: None,
            player_id: None,
            reason: Some(reason.into()),
        }
    }
}

/// Body of a board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardResponse {
    /// Rows of cells, top row first.
    pub board: Board,
}

/// Marker value for [`NotReadyResponse`].
pub const NOT_READY: &str = "not_ready";

/// Status query made before both players registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotReadyResponse {
    /// Always [`NOT_READY`].
    pub status: String,
}

impl Default for NotReadyResponse {
    fn default() -> Self {
        Self {
            status: NOT_READY.to_string(),
        }
    }
}

/// Generic rejection body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong.
    pub message: String,
}
