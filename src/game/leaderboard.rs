//! Leaderboard retrieval and display.
//!
//! The service is the sole source of ranking: entries are kept in the order received
//! and only truncated to the top [`TOP_N`].

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::GameBackend;

/// Most entries ever shown.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(deserialize_with = "score_from_number_or_text")]
    pub score: u32,
}

/// Scores may arrive as JSON numbers or as numeric strings (`"90"`), as MySQL rows often do.
fn score_from_number_or_text<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(u32),
        Text(String),
    }

    match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => Ok(n),
        RawScore::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Fetch the leaderboard and keep at most `n` (never more than [`TOP_N`]) entries.
///
/// A failed request yields an empty list.
pub async fn fetch_top<B: GameBackend>(backend: &B, n: usize) -> Vec<LeaderboardEntry> {
    match backend.leaderboard().await {
        Ok(mut entries) => {
            entries.truncate(n.min(TOP_N));
            entries
        }
        Err(e) => {
            warn!("Leaderboard fetch failed: {}", e);
            crate::metrics::inc_fetch_failures();
            Vec::new()
        }
    }
}

/// Render ranked lines, or a notice when there is nothing to show.
pub fn format_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No scores available.\n".to_string();
    }
    let mut out = format!("Top {} Leaderboard\n", TOP_N);
    for (idx, entry) in entries.iter().take(TOP_N).enumerate() {
        out.push_str(&format!("{:>2}. {} — {}\n", idx + 1, entry.name, entry.score));
    }
    out
}
