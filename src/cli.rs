//! Command-line interface for connect4.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Connect Four - two players, one engine, local or over HTTP
#[derive(Parser, Debug)]
#[command(name = "connect4")]
#[command(about = "Connect Four server and clients", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host one game over HTTP
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Play both seats in this process
    Local {
        /// Front-end for the first player (X)
        #[arg(long, value_enum, default_value_t = SeatKind::Console)]
        first: SeatKind,

        /// Front-end for the second player (O)
        #[arg(long, value_enum, default_value_t = SeatKind::Bot)]
        second: SeatKind,
    },

    /// Join a game hosted by `connect4 serve`
    Remote {
        /// Game server URL, e.g. http://192.168.1.104:5000
        #[arg(long)]
        api_url: Option<String>,

        /// Front-end for this player
        #[arg(long, value_enum, default_value_t = SeatKind::Console)]
        seat: SeatKind,
    },
}

/// Kind of front-end to put in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SeatKind {
    /// Type columns on the console
    Console,
    /// Arrow keys on a terminal-drawn LED matrix
    Matrix,
    /// Heuristic bot
    Bot,
}
