//! Joystick column selection.

use super::MoveChooser;
use super::matrix::{BLACK, LedMatrix, SIZE, icon_colour};
use anyhow::{Result, bail};
use async_trait::async_trait;
use connect4_engine::{Board, COLS, Icon};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, instrument};

/// A joystick press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StickDirection {
    /// Move the cursor left.
    Left,
    /// Move the cursor right.
    Right,
    /// Confirm the current column.
    Middle,
    /// Ignored.
    Up,
    /// Ignored.
    Down,
}

/// Source of joystick presses.
#[async_trait]
pub trait StickEvents: Send {
    /// Waits for the next press.
    async fn next_press(&mut self) -> Result<StickDirection>;
}

/// Presses replayed from a list. Fails once the list runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStick {
    presses: VecDeque<StickDirection>,
}

impl ScriptedStick {
    /// Replays `presses` in order.
    pub fn new(presses: impl IntoIterator<Item = StickDirection>) -> Self {
        Self {
            presses: presses.into_iter().collect(),
        }
    }
}

#[async_trait]
impl StickEvents for ScriptedStick {
    async fn next_press(&mut self) -> Result<StickDirection> {
        match self.presses.pop_front() {
            Some(press) => Ok(press),
            None => bail!("Joystick script exhausted"),
        }
    }
}

/// Arrow keys as the stick, Enter or Space as the middle button.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermStick;

/// Leaves raw mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_press() -> Result<StickDirection> {
    let _raw = RawModeGuard::enable()?;
    loop {
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Left => return Ok(StickDirection::Left),
                KeyCode::Right => return Ok(StickDirection::Right),
                KeyCode::Up => return Ok(StickDirection::Up),
                KeyCode::Down => return Ok(StickDirection::Down),
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(StickDirection::Middle),
                KeyCode::Esc | KeyCode::Char('q') => bail!("Selection cancelled"),
                _ => {}
            }
        }
    }
}

#[async_trait]
impl StickEvents for CrosstermStick {
    async fn next_press(&mut self) -> Result<StickDirection> {
        tokio::task::spawn_blocking(read_press).await?
    }
}

/// Moves a cursor along the matrix's top row and picks the column under it.
pub struct JoystickPrompt<S, M> {
    stick: S,
    matrix: M,
}

impl<S: StickEvents, M: LedMatrix> JoystickPrompt<S, M> {
    /// Reads `stick` and shows the cursor on `matrix`.
    pub fn new(stick: S, matrix: M) -> Self {
        Self { stick, matrix }
    }

    fn show_cursor(&mut self, column: usize, icon: Icon) -> std::io::Result<()> {
        let mut row = [BLACK; SIZE];
        if let Some(pixel) = row.get_mut(column) {
            *pixel = icon_colour(icon);
        }
        self.matrix.set_row(0, &row)
    }
}

#[async_trait]
impl<S: StickEvents, M: LedMatrix> MoveChooser for JoystickPrompt<S, M> {
    #[instrument(skip(self, _board))]
    async fn choose(&mut self, _board: &Board, icon: Icon) -> Result<i64> {
        let mut column = 0;
        self.show_cursor(column, icon)?;
        loop {
            let press = self.stick.next_press().await?;
            debug!(%press, column, "Joystick event");
            match press {
                StickDirection::Right if column < COLS - 1 => column += 1,
                StickDirection::Left if column > 0 => column -= 1,
                StickDirection::Middle => return Ok(column as i64),
                _ => continue,
            }
            self.show_cursor(column, icon)?;
        }
    }
}
