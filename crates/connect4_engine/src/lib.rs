//! Connect Four game engine.
//!
//! Pure game logic with no I/O: a 7x8 board with gravity, two player slots
//! assigned in registration order, an explicit activation step, strict turn
//! alternation and four-in-a-row win detection.
//!
//! # Example
//!
//! ```
//! use connect4_engine::{GameEngine, Icon, play_turn};
//!
//! let mut engine = GameEngine::new();
//! assert_eq!(engine.register("alice"), Ok(Icon::X));
//! assert_eq!(engine.register("bob"), Ok(Icon::O));
//! engine.activate("alice").unwrap();
//!
//! let row = play_turn(&mut engine, 3, "alice").unwrap();
//! assert_eq!(row, 6);
//! assert!(play_turn(&mut engine, 3, "alice").is_err());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod contracts;
mod engine;
pub mod rules;
mod turn;
mod types;

pub use board::{Board, COLS, DropError, ROWS};
pub use contracts::{
    BoardResponse, ErrorResponse, GameStatus, MoveRequest, MoveResponse, NOT_READY,
    NotReadyResponse, RegisterRequest, RegisterResponse,
};
pub use engine::{ActivationRejected, GameEngine, MoveRejection, Phase, RegisterRejected};
pub use turn::{is_players_turn, play_turn};
pub use types::{Cell, EmptyPlayerId, Icon, PlayerId, PlayerSlot};
