//! Connect Four for two players, in one process or across a network.
//!
//! The game rules live in [`connect4_engine`]. This crate puts players in
//! front of an engine:
//!
//! # Architecture
//!
//! - **Server**: axum HTTP server hosting one engine per process
//! - **Backend**: engine access, either in-process or over HTTP
//! - **Players**: front-ends composed from a backend, a move chooser and a view
//! - **Coordinators**: local (both players in one process) and remote (one
//!   player polling a shared server)
//!
//! # Example
//!
//! ```no_run
//! use connect4::{BotSeat, LocalBackend, LocalCoordinator};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = LocalBackend::fresh();
//! let engine = backend.engine().clone();
//! let first = BotSeat::bot("Bot_1", backend.clone(), Duration::ZERO);
//! let second = BotSeat::bot("Bot_2", backend, Duration::ZERO);
//!
//! let report = LocalCoordinator::new(engine, Box::new(first), Box::new(second))
//!     .run()
//!     .await?;
//! println!("{}", report.outcome());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod backend;
mod cli;
mod config;
mod coordinator;
mod players;
mod server;

// Crate-level exports - Engine access
pub use backend::{
    BackendError, GameBackend, HttpGameClient, LocalBackend, MoveOutcome, SharedEngine,
    StatusReply,
};

// Crate-level exports - Command line
pub use cli::{Cli, Command, SeatKind};

// Crate-level exports - Configuration
pub use config::{
    Config, ConfigError, ENV_API_URL, ENV_HOST, ENV_POLL_INTERVAL_MS, ENV_PORT,
};

// Crate-level exports - Coordination
pub use coordinator::{GameOutcome, GameReport, LocalCoordinator, RemoteCoordinator};

// Crate-level exports - Players
pub use players::{
    BLACK, BotSeat, ConsolePrompt, ConsoleSeat, ConsoleView, CrosstermStick, Frame, FrameBuffer,
    Frontend, GREEN, HeuristicBot, JoystickPrompt, LedMatrix, LocalBotPlayer, LocalConsolePlayer,
    LocalMatrixPlayer, MatrixSeat, MatrixView, MoveChooser, RED, RemoteBotPlayer,
    RemoteConsolePlayer, RemoteMatrixPlayer, Rgb, ScriptedStick, Seat, StdinPrompt,
    StickDirection, StickEvents, TerminalMatrix, View, WHITE, board_frame, icon_colour,
    pick_column,
};

// Crate-level exports - Server
pub use server::{AppState, create_app, run as run_server, serve};
