//! HTTP client for the game server.

use super::{BackendError, GameBackend, MoveOutcome, StatusReply};
use async_trait::async_trait;
use connect4_engine::{
    Board, BoardResponse, ErrorResponse, GameStatus, Icon, MoveRequest, MoveResponse, NOT_READY,
    NotReadyResponse, PlayerId, RegisterRequest, RegisterResponse,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

/// Talks to a server hosting one game over its JSON routes.
///
/// 200 means accepted and 400 means rejected. Anything else is a protocol
/// error.
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    /// Base URL of game server, without trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpGameClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating HTTP game client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/connect4/{}", self.base_url, path)
    }
}

/// Decodes a JSON body, turning a mismatch into a protocol error.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        error!(error = %e, body = %text, "Failed to parse response body");
        BackendError::Protocol(format!("invalid JSON body: {}", e))
    })
}

fn unexpected(status: StatusCode) -> BackendError {
    error!(%status, "Unexpected HTTP status from game server");
    BackendError::Protocol(format!("unexpected HTTP status {}", status))
}

#[async_trait]
impl GameBackend for HttpGameClient {
    #[instrument(skip(self), fields(base_url = %self.base_url, player_id = %player_id))]
    async fn register(&self, player_id: &PlayerId) -> Result<Icon, BackendError> {
        info!("Registering with game server");
        let request = RegisterRequest {
            player_id: Some(player_id.to_string()),
        };
        let response = self
            .client
            .post(self.url("register"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send registration request");
                BackendError::from(e)
            })?;

        match response.status() {
            StatusCode::OK => {
                let body: RegisterResponse = decode(response).await?;
                info!(icon = %body.player_icon, "Registered successfully with server");
                Ok(body.player_icon)
            }
            StatusCode::BAD_REQUEST => {
                let body: ErrorResponse = decode(response).await?;
                warn!(message = %body.message, "Server refused registration");
                Err(BackendError::RegistrationRejected(body.message))
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    async fn status(&self) -> Result<StatusReply, BackendError> {
        let response = self.client.get(self.url("status")).send().await?;
        match response.status() {
            StatusCode::OK => {
                let status: GameStatus = decode(response).await?;
                debug!(
                    active = ?status.active_icon,
                    turn = status.turn_number,
                    "Polled server status"
                );
                Ok(StatusReply::Ready(status))
            }
            StatusCode::BAD_REQUEST => {
                let body: NotReadyResponse = decode(response).await?;
                if body.status == NOT_READY {
                    debug!("Server not ready, waiting for second player");
                    Ok(StatusReply::NotReady)
                } else {
                    Err(BackendError::Protocol(format!(
                        "unknown status marker {:?}",
                        body.status
                    )))
                }
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    async fn board(&self) -> Result<Board, BackendError> {
        let response = self.client.get(self.url("board")).send().await?;
        match response.status() {
            StatusCode::OK => {
                let body: BoardResponse = decode(response).await?;
                Ok(body.board)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn submit_move(
        &self,
        column: i64,
        player_id: &PlayerId,
    ) -> Result<MoveOutcome, BackendError> {
        info!("Sending move to server");
        let request = MoveRequest {
            column,
            player_id: player_id.to_string(),
        };
        let response = self
            .client
            .post(self.url("make_move"))
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: MoveResponse = decode(response).await?;
                debug!(accepted = body.accepted, "Move response");
                Ok(MoveOutcome::Accepted { row: None })
            }
            StatusCode::BAD_REQUEST => {
                let body: MoveResponse = decode(response).await?;
                let reason = body.reason.unwrap_or_else(|| "move not accepted".to_string());
                warn!(%reason, "Server rejected move");
                Ok(MoveOutcome::Rejected { reason })
            }
            other => Err(unexpected(other)),
        }
    }
}
