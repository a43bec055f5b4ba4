//! Real-time frame loop around a match

use std::future::Future;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::game::snapshot::MatchSnapshot;
use crate::game::{GameMatch, MatchError, MatchRecord, MatchSetup, TickOutcome};
use crate::input::InputSource;
use crate::util::time::{frame_duration, Timer};

use super::SimContext;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Match finished and the grace period elapsed
    Finished(MatchRecord),
    /// Match discarded by a seat or by shutdown
    Aborted,
}

/// Drives a [`GameMatch`] at a fixed frame rate from an input source
pub struct MatchRunner<I> {
    game: GameMatch,
    input: I,
    clock: Timer,
    fps: u32,
}

impl<I: InputSource> MatchRunner<I> {
    pub fn new(ctx: &SimContext, setup: MatchSetup, input: I, fps: u32) -> Result<Self, MatchError> {
        let clock = Timer::new();
        let game = GameMatch::new(ctx, setup, clock.elapsed_ms())?;
        Ok(Self {
            game,
            input,
            clock,
            fps: fps.max(1),
        })
    }

    pub fn game(&self) -> &GameMatch {
        &self.game
    }

    /// Run until the match returns to the lobby or `shutdown` resolves
    pub async fn run<S>(mut self, shutdown: S) -> RunOutcome
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = interval(frame_duration(self.fps));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.game.abort();
                    return RunOutcome::Aborted;
                }
                _ = ticker.tick() => {}
            }

            let intents = self.input.poll_both();
            let now = self.clock.elapsed_ms();

            match self.game.tick(intents, now) {
                TickOutcome::Running => {
                    if self.game.frame() % u64::from(self.fps) == 0 {
                        self.log_snapshot();
                    }
                }
                TickOutcome::Ended { winner } => {
                    info!(
                        match_id = %self.game.id(),
                        winner = ?winner,
                        frame = self.game.frame(),
                        "Match decided"
                    );
                    self.log_snapshot();
                }
                TickOutcome::GraceWait => {}
                TickOutcome::ReturnToLobby(record) => {
                    info!(
                        match_id = %record.match_id,
                        score_1 = record.player1_score,
                        score_2 = record.player2_score,
                        duration_ms = record.duration_ms,
                        "Returning to lobby"
                    );
                    return RunOutcome::Finished(record);
                }
                TickOutcome::AbortRequested => {
                    self.game.abort();
                    return RunOutcome::Aborted;
                }
                TickOutcome::Closed => {
                    warn!(match_id = %self.game.id(), "Ticked a closed match");
                    return RunOutcome::Aborted;
                }
            }
        }
    }

    fn log_snapshot(&self) {
        let snap = MatchSnapshot::capture(&self.game);
        let [a, b] = [&snap.combatants[0], &snap.combatants[1]];
        debug!(
            match_id = %self.game.id(),
            frame = snap.frame,
            clock = %snap.clock_label(),
            health_1 = a.health,
            health_2 = b.health,
            score_1 = a.score,
            score_2 = b.score,
            "Snapshot"
        );
    }
}
