//! In-process backend sharing one engine.

use super::{BackendError, GameBackend, MoveOutcome, StatusReply};
use async_trait::async_trait;
use connect4_engine::{Board, GameEngine, Icon, Phase, PlayerId, play_turn};
use derive_new::new;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// One engine shared by every front-end of a game.
pub type SharedEngine = Arc<RwLock<GameEngine>>;

/// Backend that calls the engine directly.
#[derive(Debug, Clone, new)]
pub struct LocalBackend {
    engine: SharedEngine,
}

impl LocalBackend {
    /// Backend over a fresh engine.
    pub fn fresh() -> Self {
        Self::new(Arc::new(RwLock::new(GameEngine::new())))
    }

    /// The shared engine handle.
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }
}

#[async_trait]
impl GameBackend for LocalBackend {
    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn register(&self, player_id: &PlayerId) -> Result<Icon, BackendError> {
        let mut engine = self.engine.write().await;
        engine.register(player_id.as_str()).map_err(|e| {
            warn!(error = %e, "Local registration rejected");
            BackendError::RegistrationRejected(e.to_string())
        })
    }

    async fn status(&self) -> Result<StatusReply, BackendError> {
        let engine = self.engine.read().await;
        match engine.phase() {
            Phase::Registering { registered } => {
                debug!(registered, "Status queried before both players joined");
                Ok(StatusReply::NotReady)
            }
            _ => Ok(StatusReply::Ready(engine.get_status())),
        }
    }

    async fn board(&self) -> Result<Board, BackendError> {
        Ok(self.engine.read().await.get_board())
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn submit_move(
        &self,
        column: i64,
        player_id: &PlayerId,
    ) -> Result<MoveOutcome, BackendError> {
        let mut engine = self.engine.write().await;
        match play_turn(&mut engine, column, player_id.as_str()) {
            Ok(row) => Ok(MoveOutcome::Accepted { row: Some(row) }),
            Err(rejection) => Ok(MoveOutcome::Rejected {
                reason: rejection.to_string(),
            }),
        }
    }
}
