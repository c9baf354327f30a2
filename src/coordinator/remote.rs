//! One front-end playing against a server it shares with a remote opponent.

use super::{GameOutcome, GameReport};
use crate::backend::StatusReply;
use crate::players::Frontend;
use anyhow::{Context, Result};
use connect4_engine::is_players_turn;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Polls the server until it is this player's turn, plays, and repeats.
///
/// "Not ready" means the opponent has not registered yet and is simply
/// waited out. Transport failures are retried up to a limit; anything else
/// ends the run with an error.
pub struct RemoteCoordinator {
    seat: Box<dyn Frontend>,
    poll_interval: Duration,
    max_poll_failures: u32,
}

impl RemoteCoordinator {
    /// Creates a coordinator polling every `poll_interval`.
    pub fn new(seat: Box<dyn Frontend>, poll_interval: Duration) -> Self {
        Self {
            seat,
            poll_interval,
            max_poll_failures: 5,
        }
    }

    /// Sets how many consecutive failed polls are tolerated.
    pub fn with_max_poll_failures(mut self, max_poll_failures: u32) -> Self {
        self.max_poll_failures = max_poll_failures;
        self
    }

    /// Runs the polling loop until the game ends.
    #[instrument(skip(self), fields(name = %self.seat.name(), poll_ms = self.poll_interval.as_millis() as u64))]
    pub async fn run(mut self) -> Result<GameReport> {
        info!("Starting remote game");
        let icon = self
            .seat
            .register()
            .await
            .context("Failed to register with the game server")?;
        let player_id = self.seat.player_id().clone();
        info!(%icon, %player_id, "Registered, waiting for the game to start");

        let mut failures = 0u32;
        let mut announced_waiting = false;
        let mut announced_joined = false;
        let mut just_moved = false;

        loop {
            let reply = match self.seat.status().await {
                Ok(reply) => {
                    failures = 0;
                    reply
                }
                Err(e) if e.is_transient() && failures < self.max_poll_failures => {
                    failures += 1;
                    warn!(error = ?e, failures, "Failed to poll server, retrying");
                    sleep(self.poll_interval).await;
                    continue;
                }
                Err(e) => return Err(e).context("Lost contact with the game server"),
            };

            let status = match reply {
                StatusReply::NotReady => {
                    if !announced_waiting {
                        self.seat
                            .announce("Waiting for the other player to register...")
                            .await?;
                        announced_waiting = true;
                    }
                    debug!("Server not ready");
                    sleep(self.poll_interval).await;
                    continue;
                }
                StatusReply::Ready(status) => status,
            };

            if !announced_joined {
                self.seat
                    .announce("Both players registered. The game is on!")
                    .await?;
                announced_joined = true;
            }

            if let Some(outcome) = GameOutcome::from_status(&status) {
                self.seat.render().await?;
                match &outcome {
                    GameOutcome::Won(winner) if winner.id() == &player_id => {
                        self.seat.celebrate().await?
                    }
                    GameOutcome::Won(winner) => self.seat.lament(winner).await?,
                    GameOutcome::Draw => self.seat.draw_game().await?,
                }
                info!(%outcome, turn = status.turn_number, "Game over");
                return Ok(GameReport::new(outcome, status.turn_number));
            }

            if is_players_turn(&status, player_id.as_str(), icon) {
                self.seat.announce("It's your turn!").await?;
                self.seat.render().await?;
                let column = self.seat.make_move().await?;
                self.seat.render().await?;
                debug!(column, "Move made");
                just_moved = true;
                // Check for a result right away.
                continue;
            }

            if just_moved {
                self.seat
                    .announce("Waiting on the other player to make a move...")
                    .await?;
                just_moved = false;
            }
            debug!(active = ?status.active_icon, turn = status.turn_number, "Not my turn");
            sleep(self.poll_interval).await;
        }
    }
}
