//! Connect Four - Unified CLI
//!
//! One binary for the game server and both kinds of client.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use connect4::{
    BotSeat, Cli, Command, Config, ConsoleSeat, Frontend, GameBackend, HttpGameClient,
    LocalBackend, LocalCoordinator, MatrixSeat, RemoteCoordinator, SeatKind, run_server,
};
use std::path::Path;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,connect4=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { port, host } => {
            let config = config.with_bind(host, port);
            init_console_tracing();
            log_config(cli.config.as_deref(), &config);
            run_server(&config).await
        }
        Command::Local { first, second } => {
            init_file_tracing(config.log_file())?;
            log_config(cli.config.as_deref(), &config);
            run_local(&config, first, second).await
        }
        Command::Remote { api_url, seat } => {
            let config = config.with_api_url(api_url);
            init_file_tracing(config.log_file())?;
            log_config(cli.config.as_deref(), &config);
            run_remote(&config, seat).await
        }
    }
}

/// Config is resolved before a subscriber exists, so it is logged afterwards.
fn log_config(path: Option<&Path>, config: &Config) {
    match path {
        Some(path) => info!(config_file = %path.display(), "Configuration loaded from file"),
        None => info!("No config file given, using defaults"),
    }
    debug!(?config, "Effective configuration");
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Server logs go to the terminal.
fn init_console_tracing() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Interactive modes log to a file so the board stays readable.
fn init_file_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();
    info!(log_file = %path.display(), "Logging to file");
    Ok(())
}

/// Builds the front-end for `kind` over `backend`.
fn build_seat<B>(kind: SeatKind, name: &str, backend: B, config: &Config) -> Box<dyn Frontend>
where
    B: GameBackend + 'static,
{
    match kind {
        SeatKind::Console => Box::new(ConsoleSeat::console(name, backend)),
        SeatKind::Matrix => Box::new(MatrixSeat::matrix(name, backend)),
        SeatKind::Bot => Box::new(BotSeat::bot(name, backend, config.bot_think_time())),
    }
}

/// Runs both seats against one in-process engine.
#[instrument(skip(config))]
async fn run_local(config: &Config, first: SeatKind, second: SeatKind) -> Result<()> {
    info!("Starting local game");
    let backend = LocalBackend::fresh();
    let engine = backend.engine().clone();

    let first = build_seat(first, &format!("Player_1_{first}"), backend.clone(), config);
    let second = build_seat(second, &format!("Player_2_{second}"), backend, config);

    let report = LocalCoordinator::new(engine, first, second).run().await?;
    println!("Game over after {} turns: {}", report.turn_number(), report.outcome());
    Ok(())
}

/// Joins the game hosted at the configured URL.
#[instrument(skip(config), fields(api_url = %config.api_url()))]
async fn run_remote(config: &Config, kind: SeatKind) -> Result<()> {
    info!("Starting remote client");
    let client = HttpGameClient::new(config.api_url().clone());
    let seat = build_seat(kind, &format!("Remote_{kind}"), client, config);

    let report = RemoteCoordinator::new(seat, config.poll_interval())
        .with_max_poll_failures(*config.max_poll_failures())
        .run()
        .await?;
    println!("Game over after {} turns: {}", report.turn_number(), report.outcome());
    Ok(())
}
