//! Logging setup and helpers.
//!
//! - [`init_logging`] installs `env_logger` with a `"{timestamp} [{level}] {message}"` format,
//!   optionally appending to a log file.
//! - [`escape_log`] keeps player-supplied text on a single log line.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::validation::MAX_NAME_CHARS;

/// Longest preview of player or service text kept in a log line: room for a full
/// player name plus its escapes.
pub const LOG_PREVIEW_CHARS: usize = MAX_NAME_CHARS * 2;

/// Keep untrusted text on one log line. Control characters and backslashes are written
/// as Rust escapes (`\n`, `\u{1b}`, `\\`) and anything past [`LOG_PREVIEW_CHARS`] is cut to `…`.
pub fn escape_log(s: &str) -> String {
    let mut chars = s.chars();
    let mut out = String::with_capacity(s.len().min(LOG_PREVIEW_CHARS));
    for c in chars.by_ref().take(LOG_PREVIEW_CHARS) {
        if c.is_control() || c == '\\' {
            out.extend(c.escape_debug());
        } else {
            out.push(c);
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

/// CLI verbosity wins over the configured level: `-v` is Debug, `-vv` Trace.
pub fn level_for(config: Option<&LoggingConfig>, verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => config
            .map(LoggingConfig::level_filter)
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Install the global logger. With a log file configured, lines go to the file and are
/// mirrored to the console only when stdout is a terminal.
pub fn init_logging(config: Option<&LoggingConfig>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_for(config, verbosity));

    let file = config
        .and_then(|c| c.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    match file {
        Some(f) => {
            let file = Arc::new(Mutex::new(f));
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
