//! # Game Core
//!
//! - [`session`] - the level/score/sequence state machine, free of I/O
//! - [`runner`] - service calls and timed playback around a session
//! - [`leaderboard`] - top-10 retrieval and display
//! - [`difficulty`] - tile-count presets
//! - [`render`] - text grid for the terminal driver
//!
//! ## Round Lifecycle
//!
//! 1. `start_round` fetches a sequence of `level` tiles and plays it back
//! 2. `submit_tap` checks each tap against the sequence position it fills
//! 3. A full, matching sequence earns points and advances the level
//! 4. A wrong tap ends the game; `end_game` submits the score and resets

pub mod difficulty;
pub mod leaderboard;
pub mod render;
pub mod runner;
pub mod session;

pub use difficulty::Difficulty;
pub use leaderboard::{fetch_top, format_leaderboard, LeaderboardEntry, TOP_N};
pub use runner::{EventSink, GameEvent, GameRunner, Pacing, StartOutcome, TapResult};
pub use session::{GameSession, Phase, SessionError, TapOutcome, MAX_LEVEL};
