//! Binary entrypoint for the tilerecall CLI.
//!
//! Commands:
//! - `play [--difficulty easy|intermediate|hard] [--level <n>] [--offline]` - play in the terminal
//! - `leaderboard [--offline]` - show the top 10 scores
//! - `init` - write a starter `config.toml`
//!
//! See the library crate docs for module-level details: `tilerecall::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use tilerecall::backend::local::LocalBackend;
use tilerecall::backend::GameBackend;
use tilerecall::config::Config;
use tilerecall::game::render::{parse_tile_input, redraw_grid, render_grid, status_line};
use tilerecall::game::{
    fetch_top, format_leaderboard, Difficulty, EventSink, GameEvent, GameRunner, GameSession,
    Pacing, StartOutcome, TapResult, MAX_LEVEL, TOP_N,
};
use tilerecall::logutil::init_logging;
use tilerecall::metrics;

#[derive(Parser)]
#[command(name = "tilerecall")]
#[command(about = "A tile memory game backed by a remote scoring service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play {
        /// Easy (4 tiles), intermediate (6) or hard (8); defaults to the configured difficulty
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
        /// Level to start from (1-1000)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_LEVEL)))]
        level: Option<u32>,
        /// Use the built-in offline service
        #[arg(long)]
        offline: bool,
    },
    /// Show the top 10 leaderboard
    Leaderboard {
        /// Read the offline leaderboard instead of the remote one
        #[arg(long)]
        offline: bool,
    },
    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before a config file exists; every other command loads one or falls back to defaults
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Some(load_config(&cli.config, cli.verbose).await),
    };

    match cli.command {
        Commands::Play {
            difficulty,
            level,
            offline,
        } => {
            let config = pre_config.unwrap_or_default();
            let difficulty = difficulty.unwrap_or(config.game.difficulty);
            let level = level.unwrap_or(config.game.starting_level).max(1);
            if offline || config.game.offline {
                let backend = LocalBackend::new(&config.storage.data_dir, config.game.seed);
                play(backend, &config, difficulty, level).await?;
            } else {
                #[cfg(feature = "remote")]
                {
                    let backend = tilerecall::backend::http::HttpBackend::new(&config.server);
                    play(backend, &config, difficulty, level).await?;
                }
                #[cfg(not(feature = "remote"))]
                return Err(anyhow!("built without the `remote` feature; use --offline"));
            }
        }
        Commands::Leaderboard { offline } => {
            let config = pre_config.unwrap_or_default();
            if offline || config.game.offline {
                let backend = LocalBackend::new(&config.storage.data_dir, config.game.seed);
                show_leaderboard(&backend).await;
            } else {
                #[cfg(feature = "remote")]
                {
                    let backend = tilerecall::backend::http::HttpBackend::new(&config.server);
                    show_leaderboard(&backend).await;
                }
                #[cfg(not(feature = "remote"))]
                return Err(anyhow!("built without the `remote` feature; use --offline"));
            }
        }
        Commands::Init => {
            init_logging(None, cli.verbose);
            if tokio::fs::try_exists(&cli.config).await.unwrap_or(false) {
                return Err(anyhow!("{} already exists; not overwriting", cli.config));
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
    }

    Ok(())
}

async fn load_config(path: &str, verbosity: u8) -> Config {
    match Config::load(path).await {
        Ok(config) => {
            init_logging(Some(&config.logging), verbosity);
            config
        }
        Err(e) => {
            let config = Config::default();
            init_logging(Some(&config.logging), verbosity);
            warn!("{} (using defaults)", e);
            config
        }
    }
}

async fn show_leaderboard<B: GameBackend>(backend: &B) {
    let entries = fetch_top(backend, TOP_N).await;
    print!("{}", format_leaderboard(&entries));
}

/// Prints playback frames and feedback to stdout.
///
/// Consecutive frames overwrite each other, so once a tile goes dark nothing lit is left
/// on screen.
struct TerminalSink {
    tile_count: usize,
    /// The last output was a grid this sink drew.
    grid_on_screen: bool,
}

impl TerminalSink {
    fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            grid_on_screen: false,
        }
    }

    fn draw(&mut self, lit: Option<usize>) {
        if self.grid_on_screen {
            print!("{}", redraw_grid(self.tile_count, lit, &[]));
        } else {
            println!();
            print!("{}", render_grid(self.tile_count, lit, &[]));
        }
        let _ = std::io::stdout().flush();
        self.grid_on_screen = true;
    }

    /// Something else was printed or echoed; the next frame starts below it.
    fn release(&mut self) {
        self.grid_on_screen = false;
    }
}

impl EventSink for TerminalSink {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::Highlight(tile) => self.draw(Some(tile)),
            GameEvent::Unhighlight(_) => self.draw(None),
            GameEvent::Message(text) if !text.is_empty() => {
                println!("{}", text);
                self.release();
            }
            GameEvent::Message(_) => {}
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

async fn play<B: GameBackend>(
    backend: B,
    config: &Config,
    difficulty: Difficulty,
    level: u32,
) -> Result<()> {
    let tile_count = difficulty.tile_count();
    let session = GameSession::new(level, tile_count);
    info!(
        "Starting game {} ({} tiles, level {})",
        session.id(),
        tile_count,
        level
    );
    let mut runner = GameRunner::new(backend, session, Pacing::from(&config.timing));
    let mut sink = TerminalSink::new(tile_count);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Memory Game - {} ({} tiles)", difficulty, tile_count);
    'game: loop {
        println!();
        println!("{}", status_line(runner.session()));
        print!("{}", render_grid(tile_count, None, &[]));
        println!("Press Enter to start, q to quit.");
        match read_line(&mut lines).await? {
            None => break,
            Some(l) if l.trim().eq_ignore_ascii_case("q") => break,
            Some(_) => {}
        }
        sink.release();

        match runner.start_round(&mut sink).await? {
            StartOutcome::FetchFailed => continue,
            StartOutcome::Ready { length } => {
                // The last playback frame is the dark grid
                println!(
                    "Your turn: enter {} tile number(s) from 1 to {}.",
                    length, tile_count
                );
                sink.release();
            }
        }

        loop {
            let Some(line) = read_line(&mut lines).await? else {
                break 'game;
            };
            sink.release();
            for token in line.split_whitespace() {
                let Some(index) = parse_tile_input(token, tile_count) else {
                    println!("Enter a tile number from 1 to {}.", tile_count);
                    sink.release();
                    continue;
                };
                match runner.submit_tap(index, &mut sink).await {
                    Ok(TapResult::Continue { remaining }) => {
                        debug!("{} taps remaining", remaining);
                    }
                    Ok(TapResult::LevelUp {
                        level,
                        points,
                        score,
                    }) => {
                        println!("+{} points. On to level {} (score {}).", points, level, score);
                        continue 'game;
                    }
                    Ok(TapResult::GameOver { score, .. }) => {
                        println!("Game Over");
                        println!("Your score: {}", score);
                        println!("Enter your name for the leaderboard (blank to skip):");
                        let name = read_line(&mut lines).await?.unwrap_or_default();
                        if runner.end_game(&name).await {
                            println!("Score submitted.");
                        } else if !name.trim().is_empty() {
                            println!("Score could not be submitted.");
                        }
                        break 'game;
                    }
                    Err(e) => {
                        println!("{}", e);
                        sink.release();
                    }
                }
            }
        }
    }

    debug!("Session metrics: {}", metrics::snapshot().summary());
    Ok(())
}
