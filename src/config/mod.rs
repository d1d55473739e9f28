//! # Configuration Management Module
//!
//! Centralized, TOML-backed configuration for the game client.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - Remote game service location and request timeout
//! - [`GameConfig`] - Default difficulty, starting level and offline play
//! - [`TimingConfig`] - Highlight and feedback delays used while playing
//! - [`StorageConfig`] - Data directory for the offline leaderboard
//! - [`LoggingConfig`] - Logging level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tilerecall::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Service: {}", config.server.base_url);
//!
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! base_url = "http://192.168.254.100:8080/MemoryGame"
//! timeout_seconds = 10
//!
//! [game]
//! difficulty = "easy"
//! starting_level = 1
//! offline = false
//!
//! [timing]
//! highlight_ms = 500
//! gap_ms = 300
//! ```
//!
//! Every section is optional; missing sections and fields fall back to the defaults below.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

use crate::game::{Difficulty, MAX_LEVEL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the game service; endpoint names are appended after a `/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for any single request, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://192.168.254.100:8080/MemoryGame".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_starting_level")]
    pub starting_level: u32,
    /// Play against the built-in offline service instead of the remote one.
    #[serde(default)]
    pub offline: bool,
    /// Fixed seed for offline sequence generation. A random seed is drawn when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_starting_level() -> u32 {
    1
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            starting_level: default_starting_level(),
            offline: false,
            seed: None,
        }
    }
}

/// Animation and feedback delays, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// How long each tile stays lit while the sequence plays.
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
    /// Pause after a tile goes dark before the next one lights up.
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
    /// Flash length for a tapped tile.
    #[serde(default = "default_tap_flash_ms")]
    pub tap_flash_ms: u64,
    /// "Correct!" display time before points are requested.
    #[serde(default = "default_correct_delay_ms")]
    pub correct_delay_ms: u64,
    /// "Wrong! Game Over" display time before the name prompt.
    #[serde(default = "default_game_over_delay_ms")]
    pub game_over_delay_ms: u64,
}

fn default_highlight_ms() -> u64 {
    500
}
fn default_gap_ms() -> u64 {
    300
}
fn default_tap_flash_ms() -> u64 {
    300
}
fn default_correct_delay_ms() -> u64 {
    800
}
fn default_game_over_delay_ms() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            highlight_ms: default_highlight_ms(),
            gap_ms: default_gap_ms(),
            tap_flash_ms: default_tap_flash_ms(),
            correct_delay_ms: default_correct_delay_ms(),
            game_over_delay_ms: default_game_over_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parse `level` into a filter, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Parse configuration from TOML text and check value ranges.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LEVEL).contains(&self.game.starting_level) {
            return Err(anyhow!(
                "game.starting_level must be between 1 and {}",
                MAX_LEVEL
            ));
        }
        if self.server.base_url.trim().is_empty() {
            return Err(anyhow!("server.base_url must not be empty"));
        }
        if self.server.timeout_seconds == 0 {
            return Err(anyhow!("server.timeout_seconds must be at least 1"));
        }
        Ok(())
    }
}
