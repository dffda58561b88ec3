//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `<config dir>/stagetimer.log`
//! so the terminal surfaces stay clean. Logs rotate on every start, keeping
//! nine previous sessions.

use crate::error::{Result, StageTimerError, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Base name of the log file
pub const LOG_FILE_NAME: &str = "stagetimer.log";

/// Maximum number of historical log files to keep (stagetimer.log.1 through stagetimer.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Initialize the logging system
///
/// Log level defaults to INFO (DEBUG when `verbose`) and can be overridden via `RUST_LOG`.
pub fn init_logging(log_dir: &Path, verbose: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_logs_on_startup(&log_path)?;

    // Rotation is done above on startup, so the appender never rolls on its own
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("stagetimer")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| StageTimerError::ConfigError(Box::new(e)))?;

    let default_level = if verbose { "debug" } else { "info" };
    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| StageTimerError::ConfigError(Box::new(e)))?;

    tracing::info!("stagetimer v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Rotate log files on startup
///
/// `stagetimer.log.9` is deleted, every `.N` moves to `.N+1`, and the current
/// log becomes `.1`. The logger then starts a fresh file.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| StageTimerError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| StageTimerError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;
    use std::fs;

    fn session(dir: &Path, content: &str) {
        fs::write(dir.join(LOG_FILE_NAME), content).unwrap();
        rotate_logs_on_startup(&dir.join(LOG_FILE_NAME)).unwrap();
    }

    #[test]
    fn test_rotation_moves_current_log() {
        let temp_dir = create_test_dir();
        session(temp_dir.path(), "Session 1");

        assert!(!temp_dir.path().join(LOG_FILE_NAME).exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("stagetimer.log.1")).unwrap(),
            "Session 1"
        );
    }

    #[test]
    fn test_rotation_keeps_nine_sessions() {
        let temp_dir = create_test_dir();
        for i in 1..=12 {
            session(temp_dir.path(), &format!("Session {i}"));
        }

        for i in 1..=MAX_LOG_FILES {
            assert!(temp_dir.path().join(format!("stagetimer.log.{i}")).exists());
        }
        assert!(!temp_dir.path().join("stagetimer.log.10").exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("stagetimer.log.9")).unwrap(),
            "Session 4"
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("stagetimer.log.1")).unwrap(),
            "Session 12"
        );
    }

    #[test]
    fn test_rotation_without_existing_log() {
        let temp_dir = create_test_dir();
        rotate_logs_on_startup(&temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rotation_with_gaps() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("stagetimer.log.5"), "Very old").unwrap();
        session(temp_dir.path(), "Current");

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("stagetimer.log.6")).unwrap(),
            "Very old"
        );
        assert!(!temp_dir.path().join("stagetimer.log.2").exists());
    }
}
