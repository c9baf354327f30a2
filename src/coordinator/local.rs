//! Two front-ends sharing one in-process engine.

use super::{GameOutcome, GameReport};
use crate::backend::{SharedEngine, StatusReply};
use crate::players::Frontend;
use anyhow::{Context, Result, anyhow};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Drives two front-ends against one engine until the game ends.
pub struct LocalCoordinator {
    engine: SharedEngine,
    seats: [Box<dyn Frontend>; 2],
    idle_wait: Duration,
}

impl LocalCoordinator {
    /// Creates a coordinator. `first` registers first and therefore plays X.
    pub fn new(engine: SharedEngine, first: Box<dyn Frontend>, second: Box<dyn Frontend>) -> Self {
        Self {
            engine,
            seats: [first, second],
            idle_wait: Duration::from_millis(50),
        }
    }

    /// Runs the game loop.
    #[instrument(skip(self), fields(first = %self.seats[0].name(), second = %self.seats[1].name()))]
    pub async fn run(mut self) -> Result<GameReport> {
        info!("Starting local game");

        for seat in self.seats.iter_mut() {
            let icon = seat
                .register()
                .await
                .with_context(|| format!("{} could not join the game", seat.name()))?;
            info!(name = %seat.name(), %icon, "Registered");
        }

        let first = self.seats[0].player_id().clone();
        self.engine
            .write()
            .await
            .activate(first.as_str())
            .context("Failed to start the game")?;

        loop {
            let mut moved = false;
            for index in 0..self.seats.len() {
                if !self.seats[index].is_my_turn().await? {
                    continue;
                }
                moved = true;

                let seat = &mut self.seats[index];
                debug!(name = %seat.name(), "Waiting for move");
                seat.announce("It's your turn!").await?;
                seat.render().await?;
                let column = seat.make_move().await?;
                seat.render().await?;
                debug!(name = %seat.name(), column, "Move made");

                let status = match seat.status().await? {
                    StatusReply::Ready(status) => status,
                    StatusReply::NotReady => return Err(anyhow!("Game lost its players mid-play")),
                };
                if let Some(outcome) = GameOutcome::from_status(&status) {
                    self.finish(index, &outcome).await?;
                    info!(%outcome, turn = status.turn_number, "Game over");
                    return Ok(GameReport::new(outcome, status.turn_number));
                }
            }

            if !moved {
                debug!("No player is active, waiting");
                tokio::time::sleep(self.idle_wait).await;
            }
        }
    }

    /// Renders the final board and lets each seat react.
    async fn finish(&mut self, mover: usize, outcome: &GameOutcome) -> Result<()> {
        self.seats[mover].render().await?;
        for (index, seat) in self.seats.iter_mut().enumerate() {
            match outcome {
                GameOutcome::Won(winner) if winner.id() == seat.player_id() => seat.celebrate().await?,
                GameOutcome::Won(winner) => {
                    // The mover already shows the final board.
                    if index != mover {
                        seat.render().await?;
                    }
                    seat.lament(winner).await?
                }
                GameOutcome::Draw => seat.draw_game().await?,
            }
        }
        Ok(())
    }
}
