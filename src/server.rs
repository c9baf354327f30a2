//! HTTP server hosting one game.
//!
//! Routes:
//! - GET  /                    - Welcome text
//! - GET  /connect4/status     - Game status, or 400 `not_ready` before both players joined
//! - POST /connect4/register   - Claim a slot, returns the assigned icon
//! - GET  /connect4/board      - Board snapshot
//! - POST /connect4/make_move  - Submit a move for the active player
//!
//! 200 signals acceptance and 400 rejection. The server is the coordinator
//! for its engine: once the second player registers it activates the first.

use crate::config::Config;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use connect4_engine::{
    BoardResponse, ErrorResponse, GameEngine, GameStatus, Icon, MoveRequest, MoveResponse,
    NotReadyResponse, Phase, RegisterRequest, RegisterResponse, play_turn,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Shared application state: the one engine this process serves.
#[derive(Debug, Default)]
pub struct AppState {
    /// Reads take the read lock; registrations and moves take the write lock.
    pub engine: RwLock<GameEngine>,
}

impl AppState {
    /// State around a fresh engine.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

type Rejected<T> = (StatusCode, Json<T>);

fn bad_request(message: impl Into<String>) -> Rejected<ErrorResponse> {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

/// Builds the router. Separate from [`serve`] so tests can drive it in-process.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/connect4/status", get(status))
        .route("/connect4/register", post(register))
        .route("/connect4/board", get(board))
        .route("/connect4/make_move", post(make_move))
        .with_state(state)
}

async fn index() -> &'static str {
    "Welcome to Connect Four! Register at /connect4/register, then poll /connect4/status."
}

#[instrument(skip(state))]
async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameStatus>, Rejected<NotReadyResponse>> {
    let engine = state.engine.read().await;
    match engine.phase() {
        Phase::Registering { registered } => {
            debug!(registered, "Status requested before both players joined");
            Err((StatusCode::BAD_REQUEST, Json(NotReadyResponse::default())))
        }
        _ => Ok(Json(engine.get_status())),
    }
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, Rejected<ErrorResponse>> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed registration body");
        bad_request(e.body_text())
    })?;
    let player_id = request.player_id.unwrap_or_default();

    let mut engine = state.engine.write().await;
    let icon = engine.register(&player_id).map_err(|e| {
        warn!(%player_id, error = %e, "Registration rejected");
        bad_request(e.to_string())
    })?;
    info!(%player_id, %icon, "Player registered");

    if icon == Icon::O {
        let first = engine.slots()[0].as_ref().map(|slot| slot.id().to_string());
        if let Some(first) = first {
            match engine.activate(&first) {
                Ok(()) => info!(player_id = %first, "Both players joined, game activated"),
                Err(e) => error!(error = %e, "Failed to activate game"),
            }
        }
    }

    Ok(Json(RegisterResponse { player_icon: icon }))
}

#[instrument(skip(state))]
async fn board(State(state): State<Arc<AppState>>) -> Json<BoardResponse> {
    let board = state.engine.read().await.get_board();
    Json(BoardResponse { board })
}

#[instrument(skip(state, payload))]
async fn make_move(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Rejected<MoveResponse> {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed move body");
            return (
                StatusCode::BAD_REQUEST,
                Json(MoveResponse::rejected(e.body_text())),
            );
        }
    };

    let mut engine = state.engine.write().await;
    match play_turn(&mut engine, request.column, &request.player_id) {
        Ok(row) => {
            info!(player_id = %request.player_id, column = request.column, row, "Move accepted");
            // play_turn only accepts non-negative columns.
            let column = request.column as usize;
            (
                StatusCode::OK,
                Json(MoveResponse::accepted(column, request.player_id)),
            )
        }
        Err(rejection) => {
            warn!(player_id = %request.player_id, column = request.column, %rejection, "Move rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(MoveResponse::rejected(rejection.to_string())),
            )
        }
    }
}

/// Serves `state` on `listener` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Completes on Ctrl+C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping server..."),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Runs the server for one game with the configured bind address.
#[instrument(skip(config), fields(addr = %config.bind_address()))]
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Connect Four server ready at http://{}/", config.bind_address());

    serve(listener, AppState::new(), shutdown_signal()).await?;

    info!("Server shut down gracefully");
    Ok(())
}
