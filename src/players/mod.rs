//! Player front-ends.
//!
//! A front-end is assembled from three independent parts rather than a
//! class per variant:
//! - a [`GameBackend`] that reaches the engine (in-process or HTTP),
//! - a [`MoveChooser`] that picks a column (keyboard, joystick, bot),
//! - a [`View`] that shows the game (console, optionally mirrored on an LED matrix).
//!
//! [`Seat`] wires them together and implements [`Frontend`], the capability
//! set the coordinators drive.

mod bot;
mod console;
mod joystick;
mod matrix;

pub use bot::{HeuristicBot, pick_column};
pub use console::{ConsolePrompt, ConsoleView, StdinPrompt};
pub use joystick::{CrosstermStick, JoystickPrompt, ScriptedStick, StickDirection, StickEvents};
pub use matrix::{
    BLACK, Frame, FrameBuffer, GREEN, LedMatrix, MatrixView, RED, Rgb, TerminalMatrix, WHITE,
    board_frame, icon_colour,
};

use crate::backend::{BackendError, GameBackend, HttpGameClient, LocalBackend, MoveOutcome, StatusReply};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use connect4_engine::{Board, Icon, PlayerId, PlayerSlot, is_players_turn};
use std::io::Stdout;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Picks a column for the player holding `icon`.
#[async_trait]
pub trait MoveChooser: Send {
    /// Returns the column to try. Validity is decided by the engine.
    async fn choose(&mut self, board: &Board, icon: Icon) -> Result<i64>;
}

/// Presentation of the game to one player.
#[async_trait]
pub trait View: Send {
    /// Shows the board.
    async fn render(&mut self, board: &Board) -> Result<()>;
    /// Reports a move that was not accepted.
    async fn reject(&mut self, reason: &str) -> Result<()>;
    /// This player won.
    async fn celebrate(&mut self, icon: Icon) -> Result<()>;
    /// The opponent holding `winner` won.
    async fn lament(&mut self, winner: Icon) -> Result<()>;
    /// The board filled without a winner.
    async fn draw_game(&mut self) -> Result<()>;
    /// Free-form status line.
    async fn announce(&mut self, message: &str) -> Result<()>;
}

/// Everything a coordinator can ask of a player.
#[async_trait]
pub trait Frontend: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Identifier used with the engine.
    fn player_id(&self) -> &PlayerId;

    /// Icon assigned at registration.
    fn icon(&self) -> Option<Icon>;

    /// Claims a slot. A rejection means this player cannot join.
    async fn register(&mut self) -> Result<Icon, BackendError>;

    /// Current game status.
    async fn status(&mut self) -> Result<StatusReply, BackendError>;

    /// Compares this player's (id, icon) with the active player.
    async fn is_my_turn(&mut self) -> Result<bool, BackendError>;

    /// Obtains a move and submits it until one is accepted. Returns the column.
    async fn make_move(&mut self) -> Result<i64>;

    /// Shows the current board.
    async fn render(&mut self) -> Result<()>;

    /// Announces this player's win.
    async fn celebrate(&mut self) -> Result<()>;

    /// Announces the opponent's win.
    async fn lament(&mut self, winner: &PlayerSlot) -> Result<()>;

    /// Announces a drawn game.
    async fn draw_game(&mut self) -> Result<()>;

    /// Shows a status line.
    async fn announce(&mut self, message: &str) -> Result<()>;
}

/// A front-end built from a backend, a chooser and a view.
pub struct Seat<B, C, V> {
    name: String,
    id: PlayerId,
    icon: Option<Icon>,
    backend: B,
    chooser: C,
    view: V,
}

impl<B, C, V> Seat<B, C, V>
where
    B: GameBackend,
    C: MoveChooser,
    V: View,
{
    /// Creates a seat with a freshly generated player id.
    pub fn new(name: impl Into<String>, backend: B, chooser: C, view: V) -> Self {
        let name = name.into();
        let id = PlayerId::generate(&name);
        Self::with_id(name, id, backend, chooser, view)
    }

    /// Creates a seat with a caller-chosen player id.
    pub fn with_id(name: impl Into<String>, id: PlayerId, backend: B, chooser: C, view: V) -> Self {
        let name = name.into();
        info!(name = %name, player_id = %id, "Creating player seat");
        Self {
            name,
            id,
            icon: None,
            backend,
            chooser,
            view,
        }
    }

    fn registered_icon(&self) -> Result<Icon> {
        self.icon
            .ok_or_else(|| anyhow!("{} has not registered yet", self.name))
    }
}

/// Console human reading stdin.
pub type ConsoleSeat<B> = Seat<B, StdinPrompt, ConsoleView<Stdout>>;
/// Heuristic bot printing to the console.
pub type BotSeat<B> = Seat<B, HeuristicBot, ConsoleView<Stdout>>;
/// Joystick human with the board mirrored on an LED matrix.
pub type MatrixSeat<B> = Seat<
    B,
    JoystickPrompt<CrosstermStick, TerminalMatrix>,
    MatrixView<ConsoleView<Stdout>, TerminalMatrix>,
>;

/// Local CLI player.
pub type LocalConsolePlayer = ConsoleSeat<LocalBackend>;
/// Local player on the LED matrix and joystick.
pub type LocalMatrixPlayer = MatrixSeat<LocalBackend>;
/// Local heuristic bot.
pub type LocalBotPlayer = BotSeat<LocalBackend>;
/// Remote CLI player.
pub type RemoteConsolePlayer = ConsoleSeat<HttpGameClient>;
/// Remote player on the LED matrix and joystick.
pub type RemoteMatrixPlayer = MatrixSeat<HttpGameClient>;
/// Remote heuristic bot.
pub type RemoteBotPlayer = BotSeat<HttpGameClient>;

impl<B: GameBackend> ConsoleSeat<B> {
    /// Human typing columns on stdin.
    pub fn console(name: impl Into<String>, backend: B) -> Self {
        Self::new(name, backend, ConsolePrompt::stdin(), ConsoleView::stdout())
    }
}

impl<B: GameBackend> BotSeat<B> {
    /// Bot that waits `think_time` before each move.
    pub fn bot(name: impl Into<String>, backend: B, think_time: Duration) -> Self {
        Self::new(name, backend, HeuristicBot::new(think_time), ConsoleView::stdout())
    }
}

impl<B: GameBackend> MatrixSeat<B> {
    /// Human steering a cursor with the arrow keys on a terminal-drawn matrix.
    pub fn matrix(name: impl Into<String>, backend: B) -> Self {
        let matrix = TerminalMatrix::default();
        Self::new(
            name,
            backend,
            JoystickPrompt::new(CrosstermStick, matrix.clone()),
            MatrixView::new(ConsoleView::stdout(), matrix),
        )
    }
}

#[async_trait]
impl<B, C, V> Frontend for Seat<B, C, V>
where
    B: GameBackend,
    C: MoveChooser,
    V: View,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn player_id(&self) -> &PlayerId {
        &self.id
    }

    fn icon(&self) -> Option<Icon> {
        self.icon
    }

    #[instrument(skip(self), fields(name = %self.name, player_id = %self.id))]
    async fn register(&mut self) -> Result<Icon, BackendError> {
        let icon = self.backend.register(&self.id).await?;
        info!(%icon, "Seat registered");
        self.icon = Some(icon);
        Ok(icon)
    }

    async fn status(&mut self) -> Result<StatusReply, BackendError> {
        self.backend.status().await
    }

    async fn is_my_turn(&mut self) -> Result<bool, BackendError> {
        let Some(icon) = self.icon else {
            return Ok(false);
        };
        Ok(match self.backend.status().await? {
            StatusReply::NotReady => false,
            StatusReply::Ready(status) => is_players_turn(&status, self.id.as_str(), icon),
        })
    }

    #[instrument(skip(self), fields(name = %self.name))]
    async fn make_move(&mut self) -> Result<i64> {
        let icon = self.registered_icon()?;
        loop {
            let board = self.backend.board().await?;
            let column = self.chooser.choose(&board, icon).await?;
            debug!(column, "Submitting move");
            match self.backend.submit_move(column, &self.id).await? {
                MoveOutcome::Accepted { row } => {
                    info!(%icon, column, ?row, "Move accepted");
                    return Ok(column);
                }
                MoveOutcome::Rejected { reason } => {
                    warn!(column, %reason, "Move rejected, asking again");
                    self.view.reject(&reason).await?;
                }
            }
        }
    }

    async fn render(&mut self) -> Result<()> {
        let board = self.backend.board().await?;
        self.view.render(&board).await
    }

    async fn celebrate(&mut self) -> Result<()> {
        let icon = self.registered_icon()?;
        self.view.celebrate(icon).await
    }

    async fn lament(&mut self, winner: &PlayerSlot) -> Result<()> {
        self.view.lament(winner.icon()).await
    }

    async fn draw_game(&mut self) -> Result<()> {
        self.view.draw_game().await
    }

    async fn announce(&mut self, message: &str) -> Result<()> {
        self.view.announce(message).await
    }
}
