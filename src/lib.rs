//! # Tilerecall - Tile Memory Game
//!
//! A "simon-says" memory game: a grid of tiles lights up in a sequence, the player repeats
//! it tap by tap, and each cleared level adds one tile to the next sequence. A remote game
//! service supplies the sequences, the points per level and the leaderboard.
//!
//! ## Features
//!
//! - **Game Session**: explicit level/score/sequence state machine with prefix-checked taps
//! - **Remote Service**: typed HTTP client for the sequence, points, score and leaderboard endpoints
//! - **Offline Play**: seeded local sequences and a file-locked JSON leaderboard
//! - **Terminal Driver**: timed highlight playback and a text tile grid
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tilerecall::backend::local::LocalBackend;
//! use tilerecall::game::{GameRunner, GameSession, Pacing, StartOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = LocalBackend::new("./data", Some(7));
//!     let mut runner = GameRunner::new(backend, GameSession::new(1, 4), Pacing::instant());
//!     let mut events = Vec::new();
//!     if let StartOutcome::Ready { .. } = runner.start_round(&mut events).await? {
//!         let first = runner.session().sequence()[0];
//!         runner.submit_tap(first, &mut events).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - session state machine, round runner, leaderboard retrieval
//! - [`backend`] - game service trait with HTTP and offline implementations
//! - [`config`] - TOML configuration
//! - [`validation`] - player name checks
//! - [`logutil`] - logger setup and log-safe escaping
//! - [`metrics`] - process-wide game counters
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   GameRunner    │ ← Playback timing, service calls
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameSession   │ ← Level, score, sequence, taps
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameBackend   │ ← Remote HTTP service or offline store
//! └─────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod game;
pub mod logutil;
pub mod metrics;
pub mod validation;
