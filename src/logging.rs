//! Tracing subscriber setup.
//!
//! The quiz screens own stdout and stderr while they run, so during play
//! events only go to a log file. Plain commands log to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Where log events are written.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Append to this file.
    File(&'a Path),
    Stderr,
    /// Drop every event.
    Off,
}

/// Build the filter: `RUST_LOG` wins over `level` when set.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(target: LogTarget<'_>, level: &str) -> io::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(level));

    // `try_init` only fails when a subscriber is already installed.
    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = builder.with_writer(io::stderr).try_init();
        }
        LogTarget::Off => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.log");

        init(LogTarget::File(&path), "debug").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("quiz.log");

        assert!(init(LogTarget::File(&path), "info").is_err());
    }
}
