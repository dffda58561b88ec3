#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for `stagetimer` unit tests.
//!
//! This module provides common test infrastructure used across multiple test modules.
//! It is only compiled during testing (`#[cfg(test)]`).

use crate::api::Notifier;
use crate::config::CONFIG_DIR_ENV;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the config directory environment variable.
static CONFIG_DIR_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that points `STAGETIMER_CONFIG_DIR` at a temp directory for a test scope
/// and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because another thread
/// may read the environment concurrently. `CONFIG_DIR_LOCK` serializes every test that
/// touches the variable, and the guard restores the previous value on drop (also on panic).
pub struct ConfigDirGuard {
    original: Option<String>,
    // Held for the guard's lifetime so only one test changes the variable at a time
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under CONFIG_DIR_LOCK"
)]
impl ConfigDirGuard {
    /// Create a new guard that sets the config directory to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = CONFIG_DIR_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var(CONFIG_DIR_ENV).ok();
        // SAFETY: CONFIG_DIR_LOCK is held, so no other test reads or writes this variable.
        unsafe {
            std::env::set_var(CONFIG_DIR_ENV, temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under CONFIG_DIR_LOCK"
)]
impl Drop for ConfigDirGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held until this guard's fields drop.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var(CONFIG_DIR_ENV, original);
            }
        } else {
            unsafe {
                std::env::remove_var(CONFIG_DIR_ENV);
            }
        }
    }
}

/// `Notifier` that remembers every notice
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Notices received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Cloneable in-memory writer for console output
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
