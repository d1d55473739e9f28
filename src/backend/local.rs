//! Offline game service.
//!
//! Overview
//! - Sequences: one seeded stream per (seed, tile count); level N plays the first N tiles,
//!   so each level extends the previous one by a single tile
//! - Points: `POINTS_PER_TILE` for every tile on the grid, awarded only for a completed level
//! - Leaderboard: JSON file at `<data_dir>/leaderboard.json`, ranked by score (descending),
//!   ties keep submission order, capped at `MAX_STORED_ENTRIES`
//! - Concurrency: file access guarded with fs2 file locks (shared for read, exclusive for write)

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{BackendError, GameBackend};
use crate::game::LeaderboardEntry;
use crate::logutil::escape_log;

/// Points per grid tile for a completed level (4 tiles => 20 points).
pub const POINTS_PER_TILE: u32 = 5;
/// Lowest-ranked entries are dropped beyond this many stored results.
pub const MAX_STORED_ENTRIES: usize = 100;

/// One stored result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    pub level: u32,
    pub submitted_at: DateTime<Utc>,
}

/// On-disk schema stored at `<data_dir>/leaderboard.json`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LeaderboardFile {
    #[serde(default)]
    pub entries: Vec<ScoreRecord>,
}

impl LeaderboardFile {
    /// Insert keeping score-descending order; equal scores stay in submission order.
    fn insert(&mut self, record: ScoreRecord) {
        let pos = self
            .entries
            .iter()
            .position(|e| e.score < record.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);
        self.entries.truncate(MAX_STORED_ENTRIES);
    }
}

/// Deterministic sequence for `level` on a `tile_count` grid.
///
/// The stream depends only on `seed` and `tile_count`, so a longer level always starts
/// with the tiles of the shorter ones.
pub fn generate_sequence(seed: u64, level: u32, tile_count: usize) -> Vec<usize> {
    if tile_count == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed ^ (tile_count as u64).rotate_left(32));
    (0..level).map(|_| rng.gen_range(0..tile_count)).collect()
}

pub fn points_for(tile_count: usize, completed: bool) -> u32 {
    if !completed {
        return 0;
    }
    (tile_count as u32).saturating_mul(POINTS_PER_TILE)
}

pub struct LocalBackend {
    data_dir: PathBuf,
    seed: u64,
}

impl LocalBackend {
    /// Create a backend storing its leaderboard under `data_dir`. A random seed is drawn when
    /// `seed` is `None`.
    pub fn new(data_dir: impl AsRef<Path>, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        debug!("local backend: seed {}", seed);
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.data_dir.join("leaderboard.json")
    }

    /// Read the stored leaderboard under a shared lock. A missing file is an empty board.
    pub fn load(&self) -> Result<LeaderboardFile, BackendError> {
        let path = self.leaderboard_path();
        let mut f = match fs::OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LeaderboardFile::default())
            }
            Err(e) => return Err(e.into()),
        };
        f.lock_shared()?;
        let mut s = String::new();
        let read = f.read_to_string(&mut s);
        let _ = f.unlock();
        read?;
        decode(&s)
    }

    /// Read-modify-write of the leaderboard file under an exclusive lock.
    fn record(&self, record: ScoreRecord) -> Result<(), BackendError> {
        fs::create_dir_all(&self.data_dir)?;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.leaderboard_path())?;
        f.lock_exclusive()?;
        let result = rewrite_locked(&mut f, record);
        let _ = f.unlock();
        result
    }
}

fn rewrite_locked(f: &mut fs::File, record: ScoreRecord) -> Result<(), BackendError> {
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    let mut board = decode(&s)?;
    board.insert(record);
    let data =
        serde_json::to_string_pretty(&board).map_err(|e| BackendError::Malformed(e.to_string()))?;
    // Rewrite from the start so a shorter board leaves no trailing bytes
    f.seek(SeekFrom::Start(0))?;
    f.set_len(0)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    Ok(())
}

fn decode(s: &str) -> Result<LeaderboardFile, BackendError> {
    let cleaned = s.trim_start_matches('\0').trim();
    if cleaned.is_empty() {
        return Ok(LeaderboardFile::default());
    }
    serde_json::from_str(cleaned).map_err(|e| BackendError::Malformed(e.to_string()))
}

impl GameBackend for LocalBackend {
    async fn tile_sequence(&self, level: u32, tile_count: usize) -> Result<Vec<usize>, BackendError> {
        Ok(generate_sequence(self.seed, level, tile_count))
    }

    async fn points_for_level(&self, tile_count: usize, completed: bool) -> Result<u32, BackendError> {
        Ok(points_for(tile_count, completed))
    }

    async fn submit_score(&self, name: &str, score: u32, level: u32) -> Result<bool, BackendError> {
        self.record(ScoreRecord {
            name: name.to_string(),
            score,
            level,
            submitted_at: Utc::now(),
        })?;
        info!("local leaderboard: recorded {} (score {}, level {})", escape_log(name), score, level);
        Ok(true)
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, BackendError> {
        Ok(self
            .load()?
            .entries
            .into_iter()
            .map(|r| LeaderboardEntry {
                name: r.name,
                score: r.score,
            })
            .collect())
    }
}
