//! Turn-ownership policy layered over the engine's board physics.
//!
//! [`GameEngine::is_legal_move`] only knows about columns and registered
//! players. Whether the mover is the active player is decided here, so every
//! coordinator (in-process or behind the HTTP boundary) enforces alternation
//! the same way.

use crate::contracts::GameStatus;
use crate::engine::{GameEngine, MoveRejection};
use crate::types::Icon;
use tracing::{instrument, warn};

/// Checks whether `(player_id, icon)` is the active player in `status`.
pub fn is_players_turn(status: &GameStatus, player_id: &str, icon: Icon) -> bool {
    status.is_active(player_id, icon)
}

/// Applies a move only if `player_id` is the active player.
///
/// Out-of-turn moves are rejected before the engine is touched. Callers
/// sharing one engine must hold exclusive access for the whole call so the
/// turn check and the move form one step.
#[instrument(skip(engine))]
pub fn play_turn(
    engine: &mut GameEngine,
    column: i64,
    player_id: &str,
) -> Result<usize, MoveRejection> {
    let status = engine.get_status();
    if status.is_over() {
        return Err(MoveRejection::GameOver);
    }
    let slot = engine
        .slot(player_id)
        .ok_or_else(|| MoveRejection::UnknownPlayer(player_id.to_string()))?;
    if status.active_icon.is_none() {
        return Err(MoveRejection::NotStarted);
    }
    if !is_players_turn(&status, player_id, slot.icon()) {
        warn!(active = ?status.active_icon, "Player tried to move out of turn");
        return Err(MoveRejection::NotYourTurn);
    }
    let column = usize::try_from(column).map_err(|_| MoveRejection::ColumnOutOfRange(column))?;
    engine.apply_move(column, player_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> GameEngine {
        let mut engine = GameEngine::new();
        engine.register("p1").unwrap();
        engine.register("p2").unwrap();
        engine.activate("p1").unwrap();
        engine
    }

    #[test]
    fn test_same_player_cannot_move_twice() {
        let mut engine = started();
        assert!(play_turn(&mut engine, 3, "p1").is_ok());

        // Board physics still allow it...
        assert!(engine.is_legal_move(3, "p1"));
        // ...but the turn policy does not.
        assert_eq!(play_turn(&mut engine, 3, "p1"), Err(MoveRejection::NotYourTurn));
        assert_eq!(engine.get_status().turn_number, 1);
        assert_eq!(engine.board().column_height(3), 1);

        assert!(play_turn(&mut engine, 3, "p2").is_ok());
        assert!(play_turn(&mut engine, 3, "p1").is_ok());
        assert_eq!(engine.get_status().turn_number, 3);
    }

    #[test]
    fn test_second_player_cannot_open() {
        let mut engine = started();
        assert_eq!(play_turn(&mut engine, 0, "p2"), Err(MoveRejection::NotYourTurn));
    }

    #[test]
    fn test_negative_column_rejected() {
        let mut engine = started();
        assert_eq!(
            play_turn(&mut engine, -1, "p1"),
            Err(MoveRejection::ColumnOutOfRange(-1))
        );
        assert_eq!(engine.get_status().turn_number, 0);
    }

    #[test]
    fn test_unknown_and_unstarted() {
        let mut engine = GameEngine::new();
        engine.register("p1").unwrap();
        engine.register("p2").unwrap();
        assert_eq!(play_turn(&mut engine, 0, "p1"), Err(MoveRejection::NotStarted));
        assert_eq!(
            play_turn(&mut engine, 0, "ghost"),
            Err(MoveRejection::UnknownPlayer("ghost".to_string()))
        );
    }

    #[test]
    fn test_turn_check_matches_status() {
        let engine = started();
        let status = engine.get_status();
        assert!(is_players_turn(&status, "p1", Icon::X));
        assert!(!is_players_turn(&status, "p2", Icon::O));
    }
}
