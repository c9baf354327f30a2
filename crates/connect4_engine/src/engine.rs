//! The authoritative game state machine.
//!
//! ```text
//! Registering(0/2) -> Registering(1/2) -> Ready -> InProgress -> Finished | Drawn
//! ```
//!
//! Registration fills the two slots in order. Activation (an explicit call,
//! never a side effect of registering) hands the first move to the
//! first-registered slot. Each accepted move either ends the game or passes
//! the turn to the other slot. Nothing leaves `Finished` or `Drawn`.

use crate::board::{Board, DropError};
use crate::contracts::GameStatus;
use crate::rules;
use crate::types::{Icon, PlayerId, PlayerSlot};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// Fewer than two players registered.
    #[display("registering ({registered}/2)")]
    Registering {
        /// Slots filled so far.
        registered: usize,
    },
    /// Both slots filled, no active player yet.
    #[display("ready")]
    Ready,
    /// Players alternate moves.
    #[display("in progress")]
    InProgress,
    /// A player completed four in a row.
    #[display("finished")]
    Finished,
    /// The board filled without a winner.
    #[display("drawn")]
    Drawn,
}

/// Registration was refused. The engine state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RegisterRejected {
    /// Empty or whitespace-only identifier.
    #[display("player id must not be empty")]
    EmptyId,
    /// Identifier already holds a slot.
    #[display("player {_0} is already registered")]
    Duplicate(#[error(not(source))] String),
    /// Both slots are taken.
    #[display("game already has two players")]
    Full,
}

/// Activation was refused. The engine state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ActivationRejected {
    /// Both slots must be registered first.
    #[display("both players must register before the game starts")]
    NotReady,
    /// Identifier holds no slot.
    #[display("unknown player {_0}")]
    UnknownPlayer(#[error(not(source))] String),
    /// Only the first registrant may open the game.
    #[display("player {_0} did not register first")]
    NotFirst(#[error(not(source))] String),
    /// A different player is active or moves have been made.
    #[display("game has already started")]
    AlreadyStarted,
}

/// A move was not accepted. The engine state is unchanged.
///
/// Callers outside the engine treat every variant the same way: the move was
/// simply not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveRejection {
    /// Identifier holds no slot.
    #[display("unknown player {_0}")]
    UnknownPlayer(#[error(not(source))] String),
    /// Column outside the grid.
    #[display("column {_0} is out of range")]
    ColumnOutOfRange(#[error(not(source))] i64),
    /// Column has no empty cell left.
    #[display("column {_0} is full")]
    ColumnFull(#[error(not(source))] usize),
    /// The game has not been activated.
    #[display("game has not started")]
    NotStarted,
    /// The game already has a result.
    #[display("game is over")]
    GameOver,
    /// Mover is not the active player.
    #[display("not your turn")]
    NotYourTurn,
}

impl From<DropError> for MoveRejection {
    fn from(err: DropError) -> Self {
        match err {
            DropError::OutOfRange(col) => MoveRejection::ColumnOutOfRange(col as i64),
            DropError::ColumnFull(col) => MoveRejection::ColumnFull(col),
        }
    }
}

/// Board, two player slots, and the turn state of one game.
///
/// One engine lives for exactly one game; a new game needs a new engine.
#[derive(Debug, Clone, Default)]
pub struct GameEngine {
    board: Board,
    slots: [Option<PlayerSlot>; 2],
    active: Option<Icon>,
    turn_number: u32,
    winner: Option<Icon>,
    drawn: bool,
    history: Vec<(usize, Icon)>,
}

fn slot_index(icon: Icon) -> usize {
    match icon {
        Icon::X => 0,
        Icon::O => 1,
    }
}

impl GameEngine {
    /// Creates an engine with an empty board and no players.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating game engine");
        Self::default()
    }

    /// Assigns the next free slot to `player_id`.
    ///
    /// The first registrant gets [`Icon::X`], the second [`Icon::O`].
    /// Registering does not make anyone active; see [`GameEngine::activate`].
    #[instrument(skip(self))]
    pub fn register(&mut self, player_id: &str) -> Result<Icon, RegisterRejected> {
        let id = PlayerId::parse(player_id).map_err(|_| {
            warn!("Rejected registration with empty player id");
            RegisterRejected::EmptyId
        })?;

        if self.slot(player_id).is_some() {
            warn!("Player already registered");
            return Err(RegisterRejected::Duplicate(player_id.to_string()));
        }

        let icon = match (&self.slots[0], &self.slots[1]) {
            (None, _) => Icon::X,
            (Some(_), None) => Icon::O,
            (Some(_), Some(_)) => {
                warn!("Game already has two players");
                return Err(RegisterRejected::Full);
            }
        };

        self.slots[slot_index(icon)] = Some(PlayerSlot::new(id, icon));
        info!(%icon, "Player registered");
        Ok(icon)
    }

    /// Makes the first-registered player active, opening the game.
    ///
    /// Repeating the call for the same player before any move is a no-op.
    #[instrument(skip(self))]
    pub fn activate(&mut self, player_id: &str) -> Result<(), ActivationRejected> {
        if self.registered() < 2 {
            return Err(ActivationRejected::NotReady);
        }
        let icon = self
            .slot(player_id)
            .map(PlayerSlot::icon)
            .ok_or_else(|| ActivationRejected::UnknownPlayer(player_id.to_string()))?;
        if icon != Icon::X {
            return Err(ActivationRejected::NotFirst(player_id.to_string()));
        }
        match self.active {
            None => {
                self.active = Some(icon);
                info!(%icon, "Game activated");
                Ok(())
            }
            Some(current) if current == icon && self.history.is_empty() => Ok(()),
            Some(_) => Err(ActivationRejected::AlreadyStarted),
        }
    }

    /// Read-only snapshot. Unset fields are `None`.
    pub fn get_status(&self) -> GameStatus {
        let active = self.active.and_then(|icon| self.slots[slot_index(icon)].as_ref());
        GameStatus {
            active_icon: active.map(PlayerSlot::icon),
            active_id: active.map(|slot| slot.id().clone()),
            winner: self
                .winner
                .and_then(|icon| self.slots[slot_index(icon)].clone()),
            turn_number: self.turn_number,
            draw: self.drawn,
        }
    }

    /// Copy of the current board.
    pub fn get_board(&self) -> Board {
        self.board.clone()
    }

    /// Borrowed view of the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board physics only: known player, column in range, column not full.
    ///
    /// Whose turn it is does not matter here; that policy lives in
    /// [`crate::turn::play_turn`].
    pub fn is_legal_move(&self, column: usize, player_id: &str) -> bool {
        self.slot(player_id).is_some() && !self.board.is_column_full(column)
    }

    /// Validates and applies a move for `player_id`.
    ///
    /// On success the mover's icon lands on the lowest empty cell of `column`,
    /// win detection runs for that icon, and the turn passes to the other
    /// slot unless the move ended the game. Returns the landing row.
    #[instrument(skip(self), fields(turn = self.turn_number))]
    pub fn apply_move(&mut self, column: usize, player_id: &str) -> Result<usize, MoveRejection> {
        match self.phase() {
            Phase::Finished | Phase::Drawn => return Err(MoveRejection::GameOver),
            Phase::Registering { .. } | Phase::Ready => return Err(MoveRejection::NotStarted),
            Phase::InProgress => {}
        }

        let icon = self
            .slot(player_id)
            .map(PlayerSlot::icon)
            .ok_or_else(|| MoveRejection::UnknownPlayer(player_id.to_string()))?;

        let row = self.board.drop_piece(column, icon).map_err(|e| {
            warn!(error = %e, "Illegal move");
            MoveRejection::from(e)
        })?;
        self.history.push((column, icon));
        debug_assert!(rules::is_settled(&self.board), "gravity invariant violated");

        if rules::has_four(&self.board, icon) {
            self.winner = Some(icon);
            info!(%icon, row, column, "Winning move");
        } else if rules::is_draw(&self.board) {
            self.drawn = true;
            info!(row, column, "Board full, game drawn");
        } else {
            self.active = Some(icon.opponent());
            self.turn_number += 1;
            debug!(%icon, row, column, next = %icon.opponent(), "Move applied");
        }

        Ok(row)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        let registered = self.registered();
        if registered < 2 {
            Phase::Registering { registered }
        } else if self.winner.is_some() {
            Phase::Finished
        } else if self.drawn {
            Phase::Drawn
        } else if self.active.is_none() {
            Phase::Ready
        } else {
            Phase::InProgress
        }
    }

    /// Slot held by `player_id`, if any.
    pub fn slot(&self, player_id: &str) -> Option<&PlayerSlot> {
        self.slots
            .iter()
            .flatten()
            .find(|slot| slot.id().as_str() == player_id)
    }

    /// Both slots in registration order.
    pub fn slots(&self) -> &[Option<PlayerSlot>; 2] {
        &self.slots
    }

    /// Columns and icons of every accepted move, in order.
    pub fn history(&self) -> &[(usize, Icon)] {
        &self.history
    }

    fn registered(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{COLS, ROWS};

    fn ready_engine() -> GameEngine {
        let mut engine = GameEngine::new();
        engine.register("p1").unwrap();
        engine.register("p2").unwrap();
        engine
    }

    fn started_engine() -> GameEngine {
        let mut engine = ready_engine();
        engine.activate("p1").unwrap();
        engine
    }

    #[test]
    fn test_registration_order_assigns_icons() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.phase(), Phase::Registering { registered: 0 });
        assert_eq!(engine.register("p1"), Ok(Icon::X));
        assert_eq!(engine.phase(), Phase::Registering { registered: 1 });
        assert_eq!(engine.register("p2"), Ok(Icon::O));
        assert_eq!(engine.phase(), Phase::Ready);
        assert_eq!(engine.get_status().active_icon, None);
    }

    #[test]
    fn test_third_registration_rejected_without_change() {
        let mut engine = started_engine();
        let before = engine.get_status();
        assert_eq!(engine.register("p3"), Err(RegisterRejected::Full));
        assert_eq!(engine.get_status(), before);
        assert_eq!(engine.slots()[0].as_ref().unwrap().id().as_str(), "p1");
        assert_eq!(engine.slots()[1].as_ref().unwrap().id().as_str(), "p2");
    }

    #[test]
    fn test_empty_and_duplicate_ids_rejected() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.register(""), Err(RegisterRejected::EmptyId));
        engine.register("p1").unwrap();
        assert_eq!(
            engine.register("p1"),
            Err(RegisterRejected::Duplicate("p1".to_string()))
        );
        assert_eq!(engine.phase(), Phase::Registering { registered: 1 });
    }

    #[test]
    fn test_status_before_registration_is_empty() {
        let engine = GameEngine::new();
        let status = engine.get_status();
        assert_eq!(status, GameStatus::default());
        // Queries never mutate.
        assert_eq!(engine.get_status(), status);
    }

    #[test]
    fn test_activation_rules() {
        let mut engine = GameEngine::new();
        engine.register("p1").unwrap();
        assert_eq!(engine.activate("p1"), Err(ActivationRejected::NotReady));
        engine.register("p2").unwrap();
        assert_eq!(
            engine.activate("ghost"),
            Err(ActivationRejected::UnknownPlayer("ghost".to_string()))
        );
        assert_eq!(
            engine.activate("p2"),
            Err(ActivationRejected::NotFirst("p2".to_string()))
        );
        assert_eq!(engine.activate("p1"), Ok(()));
        assert_eq!(engine.activate("p1"), Ok(()));
        assert_eq!(engine.phase(), Phase::InProgress);

        let status = engine.get_status();
        assert_eq!(status.active_icon, Some(Icon::X));
        assert_eq!(status.active_id.unwrap().as_str(), "p1");

        engine.apply_move(0, "p1").unwrap();
        assert_eq!(engine.activate("p1"), Err(ActivationRejected::AlreadyStarted));
    }

    #[test]
    fn test_moves_before_activation_rejected() {
        let mut engine = ready_engine();
        assert!(engine.is_legal_move(3, "p1"));
        assert_eq!(engine.apply_move(3, "p1"), Err(MoveRejection::NotStarted));
        assert_eq!(engine.board().column_height(3), 0);
    }

    #[test]
    fn test_legality_is_board_physics_only() {
        let mut engine = started_engine();
        assert!(engine.is_legal_move(0, "p2"));
        assert!(!engine.is_legal_move(0, "ghost"));
        assert!(!engine.is_legal_move(COLS, "p1"));

        for i in 0..ROWS {
            let mover = if i % 2 == 0 { "p1" } else { "p2" };
            engine.apply_move(0, mover).unwrap();
        }
        assert!(!engine.is_legal_move(0, "p1"));
    }

    #[test]
    fn test_accepted_move_alternates_and_counts() {
        let mut engine = started_engine();
        assert_eq!(engine.apply_move(3, "p1"), Ok(ROWS - 1));
        let status = engine.get_status();
        assert_eq!(status.turn_number, 1);
        assert_eq!(status.active_icon, Some(Icon::O));
        assert_eq!(status.active_id.unwrap().as_str(), "p2");

        assert_eq!(engine.apply_move(3, "p2"), Ok(ROWS - 2));
        assert_eq!(engine.get_status().turn_number, 2);
        assert_eq!(engine.get_status().active_icon, Some(Icon::X));
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut engine = started_engine();
        engine.apply_move(2, "p1").unwrap();
        let board = engine.get_board();
        let status = engine.get_status();

        assert_eq!(
            engine.apply_move(COLS, "p2"),
            Err(MoveRejection::ColumnOutOfRange(COLS as i64))
        );
        assert_eq!(
            engine.apply_move(1, "ghost"),
            Err(MoveRejection::UnknownPlayer("ghost".to_string()))
        );
        assert_eq!(engine.get_board(), board);
        assert_eq!(engine.get_status(), status);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_vertical_four_wins_and_freezes() {
        let mut engine = started_engine();
        // X stacks column 0, O stacks column 1.
        for _ in 0..3 {
            engine.apply_move(0, "p1").unwrap();
            engine.apply_move(1, "p2").unwrap();
        }
        assert_eq!(engine.get_status().turn_number, 6);

        assert_eq!(engine.apply_move(0, "p1"), Ok(3));
        let status = engine.get_status();
        let winner = status.winner.clone().unwrap();
        assert_eq!(winner.icon(), Icon::X);
        assert_eq!(winner.id().as_str(), "p1");
        assert_eq!(status.active_icon, Some(Icon::X));
        assert_eq!(status.turn_number, 6);
        assert_eq!(engine.phase(), Phase::Finished);

        assert_eq!(engine.apply_move(2, "p2"), Err(MoveRejection::GameOver));
        assert_eq!(engine.get_status(), status);
    }

    #[test]
    fn test_full_board_draws() {
        let mut engine = started_engine();
        // Fills the grid so that column pairs alternate between the stacks
        // OOOXOOO and XXXOXXX (bottom up), which never line up four.
        const ORDER: [usize; ROWS * COLS] = [
            2, 0, 2, 0, 2, 0, 0, 0, 3, 0, 3, 0, 3, 1, 6, 1, 6, 1, 1, 1, 6, 1, 7, 1, 7, 2, 2, 3,
            2, 4, 2, 4, 3, 4, 3, 5, 3, 5, 4, 4, 7, 5, 5, 6, 6, 4, 6, 4, 6, 7, 7, 5, 7, 5, 7, 5,
        ];
        for (i, &col) in ORDER.iter().enumerate() {
            let mover = if i % 2 == 0 { "p1" } else { "p2" };
            engine.apply_move(col, mover).unwrap();
            assert!(engine.get_status().winner.is_none());
        }
        assert_eq!(engine.phase(), Phase::Drawn);
        let status = engine.get_status();
        assert!(status.draw);
        assert!(status.winner.is_none());
        assert!(status.is_over());
        assert_eq!(status.turn_number, (ROWS * COLS - 1) as u32);
    }
}
