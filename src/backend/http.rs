//! HTTP client for the remote game service.
//!
//! Endpoints, relative to `server.base_url`:
//! - `GET getTileSequence.php?level=&tileCount=` - plain list of integers, e.g. `[2, 0, 3]`
//! - `GET getPointsForLevel.php?tileCount=&completed=` - `{"success": bool, "points": int}`
//! - `POST submitScore.php` (form: name, score, level) - `{"success": bool}`
//! - `GET getLeaderboard.php` - `{"success": bool, "data": [{"name", "score"}, ...]}`
//!
//! Response bodies are parsed by free functions so the decoding rules can be
//! tested without a server.

use log::{debug, warn};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;

use super::{BackendError, GameBackend};
use crate::config::ServerConfig;
use crate::game::LeaderboardEntry;
use crate::logutil::escape_log;

#[derive(Debug, Deserialize)]
struct PointsResponse {
    success: bool,
    #[serde(default)]
    points: u32,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<LeaderboardEntry>>,
}

/// Parse a tile sequence body.
///
/// Surrounding whitespace and one pair of brackets are stripped, the rest is split on
/// commas, and items that are not non-negative integers are dropped.
pub fn parse_sequence(body: &str) -> Vec<usize> {
    let trimmed = body.trim();
    let trimmed = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(']').unwrap_or(trimmed);
    trimmed
        .split(',')
        .filter_map(|item| item.trim().parse::<usize>().ok())
        .collect()
}

/// Points from a `getPointsForLevel` body; `success: false` earns nothing.
pub fn parse_points(body: &str) -> Result<u32, BackendError> {
    let resp: PointsResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Malformed(e.to_string()))?;
    Ok(if resp.success { resp.points } else { 0 })
}

/// Whether a `submitScore` body reports success. Undecodable bodies count as failure.
pub fn parse_submit(body: &str) -> bool {
    match serde_json::from_str::<SubmitResponse>(body) {
        Ok(resp) => resp.success,
        Err(e) => {
            debug!("submitScore: undecodable body ({}): {}", e, escape_log(body));
            false
        }
    }
}

/// Entries from a `getLeaderboard` body; `success: false` or missing `data` is an empty board.
pub fn parse_leaderboard(body: &str) -> Result<Vec<LeaderboardEntry>, BackendError> {
    let resp: LeaderboardResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Malformed(e.to_string()))?;
    if !resp.success {
        return Ok(Vec::new());
    }
    Ok(resp.data.unwrap_or_default())
}

/// Client for the remote game service.
pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a service endpoint
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    /// Send a request under the configured timeout and return the body of a 2xx response.
    async fn fetch_body(&self, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = timeout(self.timeout, request.send())
            .await
            .map_err(|_| BackendError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        timeout(self.timeout, response.text())
            .await
            .map_err(|_| BackendError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| BackendError::Transport(e.to_string()))
    }
}

impl GameBackend for HttpBackend {
    async fn tile_sequence(&self, level: u32, tile_count: usize) -> Result<Vec<usize>, BackendError> {
        let url = self.endpoint("getTileSequence.php");
        debug!("Fetching tile sequence from {} (level={}, tileCount={})", url, level, tile_count);
        let request = self
            .client
            .get(&url)
            .query(&[("level", level.to_string()), ("tileCount", tile_count.to_string())]);
        let body = self.fetch_body(request).await?;
        let sequence = parse_sequence(&body);
        debug!("Sequence: {:?}", sequence);
        Ok(sequence)
    }

    async fn points_for_level(&self, tile_count: usize, completed: bool) -> Result<u32, BackendError> {
        let url = self.endpoint("getPointsForLevel.php");
        let request = self.client.get(&url).query(&[
            ("tileCount", tile_count.to_string()),
            ("completed", completed.to_string()),
        ]);
        let body = self.fetch_body(request).await?;
        parse_points(&body)
    }

    async fn submit_score(&self, name: &str, score: u32, level: u32) -> Result<bool, BackendError> {
        let url = self.endpoint("submitScore.php");
        let request = self.client.post(&url).form(&[
            ("name", name.to_string()),
            ("score", score.to_string()),
            ("level", level.to_string()),
        ]);
        let body = self.fetch_body(request).await?;
        let accepted = parse_submit(&body);
        if !accepted {
            warn!("submitScore rejected for {}: {}", escape_log(name), escape_log(&body));
        }
        Ok(accepted)
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        let url = self.endpoint("getLeaderboard.php");
        let body = self.fetch_body(self.client.get(&url)).await?;
        parse_leaderboard(&body)
    }
}
