//! Line-based console input and coloured text rendering.

use super::{MoveChooser, View};
use anyhow::{Result, bail};
use async_trait::async_trait;
use connect4_engine::{Board, COLS, Cell, Icon};
use crossterm::style::Stylize;
use std::io::{Stdout, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, instrument};

/// Prompt reading from the process's stdin.
pub type StdinPrompt = ConsolePrompt<BufReader<Stdin>>;

/// Asks for a column on one line of input.
pub struct ConsolePrompt<R> {
    lines: Lines<R>,
    out: Box<dyn Write + Send>,
}

impl StdinPrompt {
    /// Prompt on stdin/stdout.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), Box::new(std::io::stdout()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsolePrompt<R> {
    /// Prompt reading `input` and writing prompts to `out`.
    pub fn new(input: R, out: Box<dyn Write + Send>) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MoveChooser for ConsolePrompt<R> {
    #[instrument(skip(self, _board))]
    async fn choose(&mut self, _board: &Board, icon: Icon) -> Result<i64> {
        loop {
            write!(
                self.out,
                "Player {}, enter the column (0-{}) where you want to drop your chip: ",
                icon,
                COLS - 1
            )?;
            self.out.flush()?;

            let Some(line) = self.lines.next_line().await? else {
                bail!("Input closed");
            };
            match line.trim().parse::<i64>() {
                Ok(column) => {
                    debug!(column, "Column entered");
                    return Ok(column);
                }
                Err(_) => {
                    writeln!(
                        self.out,
                        "Invalid input: Please enter a number between 0-{}",
                        COLS - 1
                    )?;
                }
            }
        }
    }
}

/// Prints the board as rows joined by `" | "`, X in red and O in green.
pub struct ConsoleView<W> {
    out: W,
    colored: bool,
}

impl ConsoleView<Stdout> {
    /// Coloured view on stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), true)
    }
}

impl<W: Write + Send> ConsoleView<W> {
    /// View writing to `out`, with or without ANSI colours.
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    fn coloured(cell: Cell) -> String {
        match cell {
            Cell::Empty => "0".to_string(),
            Cell::Occupied(Icon::X) => "X".red().to_string(),
            Cell::Occupied(Icon::O) => "O".green().to_string(),
        }
    }

    fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> View for ConsoleView<W> {
    async fn render(&mut self, board: &Board) -> Result<()> {
        if self.colored {
            for row in board.rows() {
                let cells: Vec<String> = row.iter().map(|&cell| Self::coloured(cell)).collect();
                writeln!(self.out, "{}", cells.join(" | "))?;
            }
        } else {
            writeln!(self.out, "{}", board.display())?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    async fn reject(&mut self, reason: &str) -> Result<()> {
        self.line(&format!("Invalid move ({}). Please try again.", reason))
    }

    async fn celebrate(&mut self, icon: Icon) -> Result<()> {
        self.line(&format!("Congrats! Player {}, you have won the Game!", icon))
    }

    async fn lament(&mut self, _winner: Icon) -> Result<()> {
        self.line("You have lost the Game!")
    }

    async fn draw_game(&mut self) -> Result<()> {
        self.line("The board is full. The game is a draw!")
    }

    async fn announce(&mut self, message: &str) -> Result<()> {
        let message = if self.colored {
            message.bold().to_string()
        } else {
            message.to_string()
        };
        self.line(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prompt_skips_garbage_lines() {
        let input: &[u8] = b"abc\n\n  5 \n";
        let mut prompt = ConsolePrompt::new(input, Box::new(std::io::sink()));
        let column = prompt.choose(&Board::new(), Icon::X).await.unwrap();
        assert_eq!(column, 5);
    }

    #[tokio::test]
    async fn test_prompt_passes_out_of_range_through() {
        // Range is the engine's call, so it can report the reason.
        let input: &[u8] = b"-3\n";
        let mut prompt = ConsolePrompt::new(input, Box::new(std::io::sink()));
        assert_eq!(prompt.choose(&Board::new(), Icon::O).await.unwrap(), -3);
    }

    #[tokio::test]
    async fn test_prompt_fails_on_closed_input() {
        let input: &[u8] = b"";
        let mut prompt = ConsolePrompt::new(input, Box::new(std::io::sink()));
        assert!(prompt.choose(&Board::new(), Icon::X).await.is_err());
    }

    #[tokio::test]
    async fn test_plain_render_matches_wire_layout() {
        let mut view = ConsoleView::new(Vec::new(), false);
        let board: Board = serde_json::from_value(serde_json::json!([
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, "O", "X", 0, 0, 0]
        ]))
        .unwrap();
        view.render(&board).await.unwrap();

        let text = String::from_utf8(view.out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "0 | 0 | 0 | 0 | 0 | 0 | 0 | 0");
        assert_eq!(lines[6], "0 | 0 | 0 | O | X | 0 | 0 | 0");
        assert_eq!(text, format!("{}\n\n", board.display()));
    }

    #[tokio::test]
    async fn test_coloured_render_wraps_icons() {
        let mut view = ConsoleView::new(Vec::new(), true);
        assert_eq!(ConsoleView::<Vec<u8>>::coloured(Cell::Empty), "0");
        assert_ne!(ConsoleView::<Vec<u8>>::coloured(Cell::Occupied(Icon::X)), "X");
        assert!(ConsoleView::<Vec<u8>>::coloured(Cell::Occupied(Icon::O)).contains('O'));
        view.celebrate(Icon::O).await.unwrap();
        let text = String::from_utf8(view.out).unwrap();
        assert!(text.contains("Player O, you have won"));
    }
}
