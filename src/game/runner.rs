//! Drives a [`GameSession`] against a [`GameBackend`].
//!
//! The runner owns the session and performs the service calls and timed delays around it.
//! Every operation takes `&mut self`, so only one round and one request are ever in flight.
//! Visual effects (tile highlights, feedback text) are reported to an [`EventSink`].

use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

use super::session::{GameSession, Phase, SessionError, TapOutcome};
use crate::backend::GameBackend;
use crate::config::TimingConfig;
use crate::logutil::escape_log;
use crate::metrics;
use crate::validation::validate_player_name;

pub const MSG_FETCH_FAILED: &str = "Failed to fetch pattern";
pub const MSG_CORRECT: &str = "Correct!";
pub const MSG_GAME_OVER: &str = "Wrong! Game Over";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Highlight(usize),
    Unhighlight(usize),
    /// Feedback text; an empty string clears it.
    Message(String),
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Delays between visual steps.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub highlight: Duration,
    pub gap: Duration,
    pub tap_flash: Duration,
    pub correct_delay: Duration,
    pub game_over_delay: Duration,
}

impl Pacing {
    /// No delays at all; used by tests and non-interactive play.
    pub fn instant() -> Self {
        Self {
            highlight: Duration::ZERO,
            gap: Duration::ZERO,
            tap_flash: Duration::ZERO,
            correct_delay: Duration::ZERO,
            game_over_delay: Duration::ZERO,
        }
    }
}

impl From<&TimingConfig> for Pacing {
    fn from(t: &TimingConfig) -> Self {
        Self {
            highlight: Duration::from_millis(t.highlight_ms),
            gap: Duration::from_millis(t.gap_ms),
            tap_flash: Duration::from_millis(t.tap_flash_ms),
            correct_delay: Duration::from_millis(t.correct_delay_ms),
            game_over_delay: Duration::from_millis(t.game_over_delay_ms),
        }
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        sleep(d).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The sequence was played back and taps are now accepted.
    Ready { length: usize },
    /// The service call failed; the session is idle and the round can be retried.
    FetchFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResult {
    /// Tap matched; `remaining` more taps are expected.
    Continue { remaining: usize },
    /// Level cleared; the session now sits at `level` with `score`.
    LevelUp { level: u32, points: u32, score: u32 },
    /// Wrong tile. `score` and `level` are what a submission would record.
    GameOver { score: u32, level: u32 },
}

pub struct GameRunner<B> {
    backend: B,
    session: GameSession,
    pacing: Pacing,
}

impl<B: GameBackend> GameRunner<B> {
    pub fn new(backend: B, session: GameSession, pacing: Pacing) -> Self {
        Self {
            backend,
            session,
            pacing,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch a sequence for the current level and play it back.
    ///
    /// A failed or unusable fetch is reported as [`StartOutcome::FetchFailed`], leaving the
    /// session idle; calling this while a round is already running is a [`SessionError`].
    pub async fn start_round(&mut self, sink: &mut impl EventSink) -> Result<StartOutcome, SessionError> {
        match self.session.phase() {
            Phase::Idle => {}
            Phase::GameOver => return Err(SessionError::GameOver),
            _ => return Err(SessionError::RoundInProgress),
        }
        sink.emit(GameEvent::Message(String::new()));

        let level = self.session.level();
        let tile_count = self.session.tile_count();
        let sequence = match self.backend.tile_sequence(level, tile_count).await {
            Ok(seq) => seq,
            Err(e) => {
                warn!("[{}] tile sequence fetch failed: {}", self.session.id(), e);
                return Ok(self.fetch_failed(sink));
            }
        };
        if sequence.len() != level as usize {
            debug!(
                "[{}] service sent {} tiles for level {}",
                self.session.id(),
                sequence.len(),
                level
            );
        }
        if let Err(e) = self.session.begin_round(sequence) {
            warn!("[{}] unusable tile sequence: {}", self.session.id(), e);
            return Ok(self.fetch_failed(sink));
        }
        metrics::inc_rounds_started();
        debug!("[{}] playing sequence {:?}", self.session.id(), self.session.sequence());

        let tiles = self.session.sequence().to_vec();
        for &tile in &tiles {
            sink.emit(GameEvent::Highlight(tile));
            pause(self.pacing.highlight).await;
            sink.emit(GameEvent::Unhighlight(tile));
            pause(self.pacing.gap).await;
        }
        self.session.start_input()?;
        Ok(StartOutcome::Ready {
            length: tiles.len(),
        })
    }

    fn fetch_failed(&mut self, sink: &mut impl EventSink) -> StartOutcome {
        metrics::inc_fetch_failures();
        sink.emit(GameEvent::Message(MSG_FETCH_FAILED.to_string()));
        StartOutcome::FetchFailed
    }

    /// Enter one tap. Rejected taps (wrong phase, out-of-range tile) change nothing.
    pub async fn submit_tap(
        &mut self,
        index: usize,
        sink: &mut impl EventSink,
    ) -> Result<TapResult, SessionError> {
        let outcome = self.session.tap(index)?;

        sink.emit(GameEvent::Highlight(index));
        pause(self.pacing.tap_flash).await;
        sink.emit(GameEvent::Unhighlight(index));

        match outcome {
            TapOutcome::Matched { entered } => Ok(TapResult::Continue {
                remaining: self.session.sequence().len() - entered,
            }),
            TapOutcome::Mismatch { expected, got } => {
                info!(
                    "[{}] game over at level {} (expected {}, got {})",
                    self.session.id(),
                    self.session.level(),
                    expected,
                    got
                );
                metrics::inc_rounds_lost();
                sink.emit(GameEvent::Message(MSG_GAME_OVER.to_string()));
                pause(self.pacing.game_over_delay).await;
                Ok(TapResult::GameOver {
                    score: self.session.score(),
                    level: self.session.level(),
                })
            }
            TapOutcome::LevelComplete => {
                sink.emit(GameEvent::Message(MSG_CORRECT.to_string()));
                pause(self.pacing.correct_delay).await;
                let points = match self
                    .backend
                    .points_for_level(self.session.tile_count(), true)
                    .await
                {
                    Ok(p) => p,
                    Err(e) => {
                        warn!("[{}] points fetch failed: {}", self.session.id(), e);
                        metrics::inc_fetch_failures();
                        0
                    }
                };
                self.session.complete_level(points)?;
                metrics::inc_rounds_won();
                sink.emit(GameEvent::Message(String::new()));
                info!(
                    "[{}] level cleared, +{} points, now level {} with score {}",
                    self.session.id(),
                    points,
                    self.session.level(),
                    self.session.score()
                );
                Ok(TapResult::LevelUp {
                    level: self.session.level(),
                    points,
                    score: self.session.score(),
                })
            }
        }
    }

    /// Finish a game: submit the score when the game was lost and `player_name` is usable,
    /// then reset the session whatever the outcome. Returns whether the service accepted it.
    pub async fn end_game(&mut self, player_name: &str) -> bool {
        let mut submitted = false;
        if self.session.phase() == Phase::GameOver {
            match validate_player_name(player_name) {
                Ok(name) => {
                    let (score, level) = (self.session.score(), self.session.level());
                    match self.backend.submit_score(&name, score, level).await {
                        Ok(accepted) => {
                            submitted = accepted;
                            if accepted {
                                metrics::inc_scores_submitted();
                            }
                        }
                        Err(e) => warn!("[{}] score submission failed: {}", self.session.id(), e),
                    }
                }
                Err(e) => debug!(
                    "[{}] skipping submission for '{}': {}",
                    self.session.id(),
                    escape_log(player_name),
                    e
                ),
            }
        }
        self.session.reset();
        submitted
    }
}
