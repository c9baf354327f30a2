//! 8x8 LED matrix output.
//!
//! The top row is the selection row for the joystick cursor; rows 1-7 show
//! the board. [`MatrixView`] mirrors every view call onto a matrix and then
//! hands it to the wrapped view, so any view gains a hardware display.

use super::View;
use anyhow::Result;
use async_trait::async_trait;
use connect4_engine::{Board, COLS, Cell, Icon, ROWS, rules};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, instrument};

/// Side length of the matrix.
pub const SIZE: usize = 8;

/// One pixel colour.
pub type Rgb = (u8, u8, u8);

/// A full matrix image, indexed `[y][x]`.
pub type Frame = [[Rgb; SIZE]; SIZE];

/// Unlit pixel.
pub const BLACK: Rgb = (0, 0, 0);
/// Colour of X.
pub const RED: Rgb = (255, 0, 0);
/// Colour of O.
pub const GREEN: Rgb = (0, 255, 0);
/// Neutral message colour.
pub const WHITE: Rgb = (255, 255, 255);

// The board must fit below the selection row.
const _: () = assert!(ROWS < SIZE && COLS <= SIZE);

/// Colour used for `icon`.
pub fn icon_colour(icon: Icon) -> Rgb {
    match icon {
        Icon::X => RED,
        Icon::O => GREEN,
    }
}

fn colour_name(icon: Icon) -> &'static str {
    match icon {
        Icon::X => "red",
        Icon::O => "green",
    }
}

/// Frame showing `board` below an empty selection row.
pub fn board_frame(board: &Board) -> Frame {
    let mut frame = [[BLACK; SIZE]; SIZE];
    for (row, cells) in board.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Cell::Occupied(icon) = cell {
                frame[row + 1][col] = icon_colour(*icon);
            }
        }
    }
    frame
}

/// Red cross shown after a rejected move.
fn cross_frame() -> Frame {
    let mut frame = [[BLACK; SIZE]; SIZE];
    for (y, row) in frame.iter_mut().enumerate() {
        for (x, pixel) in row.iter_mut().enumerate() {
            if x == 3 || x == 4 || y == 3 || y == 4 {
                *pixel = RED;
            }
        }
    }
    frame
}

/// An 8x8 RGB display.
pub trait LedMatrix: Send {
    /// Replaces the whole image.
    fn set_pixels(&mut self, frame: &Frame) -> std::io::Result<()>;

    /// Sets one pixel, `x` across and `y` down.
    fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> std::io::Result<()>;

    /// Replaces row `y` in one update.
    fn set_row(&mut self, y: usize, row: &[Rgb; SIZE]) -> std::io::Result<()> {
        for (x, &colour) in row.iter().enumerate() {
            self.set_pixel(x, y, colour)?;
        }
        Ok(())
    }

    /// Shows a text message.
    fn show_message(&mut self, text: &str, colour: Rgb) -> std::io::Result<()>;
}

#[derive(Debug, Default)]
struct FrameLog {
    current: Option<Frame>,
    frames: Vec<Frame>,
    messages: Vec<(String, Rgb)>,
}

/// In-memory matrix recording everything drawn on it.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    log: Arc<Mutex<FrameLog>>,
}

impl FrameBuffer {
    fn with_log<T>(&self, f: impl FnOnce(&mut FrameLog) -> T) -> T {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut log)
    }

    /// What the matrix shows now.
    pub fn current(&self) -> Frame {
        self.with_log(|log| log.current.unwrap_or([[BLACK; SIZE]; SIZE]))
    }

    /// Every full image set so far, in order.
    pub fn frames(&self) -> Vec<Frame> {
        self.with_log(|log| log.frames.clone())
    }

    /// Every message shown so far, in order.
    pub fn messages(&self) -> Vec<(String, Rgb)> {
        self.with_log(|log| log.messages.clone())
    }
}

impl LedMatrix for FrameBuffer {
    fn set_pixels(&mut self, frame: &Frame) -> std::io::Result<()> {
        self.with_log(|log| {
            log.current = Some(*frame);
            log.frames.push(*frame);
        });
        Ok(())
    }

    fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> std::io::Result<()> {
        self.with_log(|log| {
            let frame = log.current.get_or_insert([[BLACK; SIZE]; SIZE]);
            if let Some(pixel) = frame.get_mut(y).and_then(|row| row.get_mut(x)) {
                *pixel = colour;
            }
        });
        Ok(())
    }

    fn show_message(&mut self, text: &str, colour: Rgb) -> std::io::Result<()> {
        self.with_log(|log| log.messages.push((text.to_string(), colour)));
        Ok(())
    }
}

/// Matrix drawn on the terminal as coloured blocks.
#[derive(Debug, Clone, Default)]
pub struct TerminalMatrix {
    frame: Arc<Mutex<Frame>>,
}

impl TerminalMatrix {
    fn draw(&self) -> std::io::Result<()> {
        let frame = *self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = std::io::stdout();
        for row in frame {
            for (r, g, b) in row {
                queue!(out, SetForegroundColor(Color::Rgb { r, g, b }), Print("██"))?;
            }
            queue!(out, ResetColor, Print("\r\n"))?;
        }
        queue!(out, Print("\r\n"))?;
        out.flush()
    }
}

impl LedMatrix for TerminalMatrix {
    fn set_pixels(&mut self, frame: &Frame) -> std::io::Result<()> {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = *frame;
        self.draw()
    }

    fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> std::io::Result<()> {
        {
            let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(pixel) = frame.get_mut(y).and_then(|row| row.get_mut(x)) {
                *pixel = colour;
            }
        }
        self.draw()
    }

    fn set_row(&mut self, y: usize, row: &[Rgb; SIZE]) -> std::io::Result<()> {
        {
            let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(target) = frame.get_mut(y) {
                *target = *row;
            }
        }
        self.draw()
    }

    fn show_message(&mut self, text: &str, (r, g, b): Rgb) -> std::io::Result<()> {
        let mut out = std::io::stdout();
        queue!(
            out,
            SetForegroundColor(Color::Rgb { r, g, b }),
            Print(text),
            ResetColor,
            Print("\r\n")
        )?;
        out.flush()
    }
}

/// Decorator mirroring a view onto an LED matrix.
pub struct MatrixView<V, M> {
    inner: V,
    matrix: M,
    last: Frame,
    board: Option<Board>,
    frame_delay: Duration,
    flash_time: Duration,
}

impl<V: View, M: LedMatrix> MatrixView<V, M> {
    /// Wraps `inner`, drawing on `matrix`.
    pub fn new(inner: V, matrix: M) -> Self {
        Self {
            inner,
            matrix,
            last: [[BLACK; SIZE]; SIZE],
            board: None,
            frame_delay: Duration::from_millis(100),
            flash_time: Duration::from_millis(500),
        }
    }

    /// Sets animation timing. Zero disables the pauses.
    pub fn with_timing(mut self, frame_delay: Duration, flash_time: Duration) -> Self {
        self.frame_delay = frame_delay;
        self.flash_time = flash_time;
        self
    }

    /// Highlights the four cells that decided the game, if the last board shows them.
    async fn flash_line(&mut self, icon: Icon) -> Result<()> {
        let Some(line) = self.board.as_ref().and_then(|b| rules::winning_line(b, icon)) else {
            return Ok(());
        };
        debug!(?line, "Flashing winning line");
        let mut frame = self.last;
        for (row, col) in line.cells() {
            frame[row + 1][col] = WHITE;
        }
        self.matrix.set_pixels(&frame)?;
        tokio::time::sleep(self.flash_time).await;
        Ok(())
    }

    /// Fills the matrix row by row in `colour`, top first.
    async fn rain(&mut self, colour: Rgb) -> Result<()> {
        let mut frame = self.last;
        for y in 0..SIZE {
            frame[y] = [colour; SIZE];
            self.matrix.set_pixels(&frame)?;
            tokio::time::sleep(self.frame_delay).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<V: View, M: LedMatrix> View for MatrixView<V, M> {
    async fn render(&mut self, board: &Board) -> Result<()> {
        self.last = board_frame(board);
        self.board = Some(board.clone());
        self.matrix.set_pixels(&self.last)?;
        self.inner.render(board).await
    }

    #[instrument(skip(self))]
    async fn reject(&mut self, reason: &str) -> Result<()> {
        debug!("Flashing rejection cross");
        self.matrix.set_pixels(&cross_frame())?;
        tokio::time::sleep(self.flash_time).await;
        self.matrix.set_pixels(&self.last)?;
        self.inner.reject(reason).await
    }

    async fn celebrate(&mut self, icon: Icon) -> Result<()> {
        self.flash_line(icon).await?;
        let colour = icon_colour(icon);
        self.matrix
            .show_message(&format!("Player {} won!", colour_name(icon)), colour)?;
        self.rain(colour).await?;
        self.inner.celebrate(icon).await
    }

    async fn lament(&mut self, winner: Icon) -> Result<()> {
        self.flash_line(winner).await?;
        let colour = icon_colour(winner);
        self.matrix
            .show_message(&format!("Player {} won!", colour_name(winner)), colour)?;
        self.rain(colour).await?;
        self.inner.lament(winner).await
    }

    async fn draw_game(&mut self) -> Result<()> {
        self.matrix.show_message("Draw!", WHITE)?;
        self.inner.draw_game().await
    }

    async fn announce(&mut self, message: &str) -> Result<()> {
        self.inner.announce(message).await
    }
}
