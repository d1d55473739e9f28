//! # Game Service Backends
//!
//! The game relies on an external service for three things: the tile sequence to
//! reproduce, the points earned for a completed level, and the leaderboard. The
//! [`GameBackend`] trait captures those calls; two implementations ship with the crate:
//!
//! - [`http::HttpBackend`] (feature `remote`) - the remote PHP service
//! - [`local::LocalBackend`] - an offline stand-in with seeded sequences and a JSON leaderboard
//!
//! Callers treat every error as recoverable: a failed call aborts the attempted
//! operation and degrades to a default result plus a user-visible message.

#[cfg(feature = "remote")]
pub mod http;
pub mod local;

use crate::game::LeaderboardEntry;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("leaderboard storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Sequence, scoring and leaderboard service used by a game.
#[allow(async_fn_in_trait)]
pub trait GameBackend {
    /// A sequence of `level` tile indices in `0..tile_count`.
    async fn tile_sequence(&self, level: u32, tile_count: usize) -> Result<Vec<usize>, BackendError>;

    /// Points earned for a level on a grid of `tile_count` tiles.
    async fn points_for_level(&self, tile_count: usize, completed: bool) -> Result<u32, BackendError>;

    /// Record a finished game. `Ok(false)` means the service declined the entry.
    async fn submit_score(&self, name: &str, score: u32, level: u32) -> Result<bool, BackendError>;

    /// All leaderboard entries in the order the service ranks them.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError>;
}

impl<B: GameBackend> GameBackend for &B {
    async fn tile_sequence(&self, level: u32, tile_count: usize) -> Result<Vec<usize>, BackendError> {
        (**self).tile_sequence(level, tile_count).await
    }

    async fn points_for_level(&self, tile_count: usize, completed: bool) -> Result<u32, BackendError> {
        (**self).points_for_level(tile_count, completed).await
    }

    async fn submit_score(&self, name: &str, score: u32, level: u32) -> Result<bool, BackendError> {
        (**self).submit_score(name, score, level).await
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        (**self).leaderboard().await
    }
}
