//! Configuration management module
//!
//! This module handles loading, saving, and managing client configuration:
//! where the timer service lives, how often to poll it, and the operator's
//! console preferences. Saves are atomic to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::{CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigManager};
pub use models::{
    AdminPreferences, ClientConfig, MIN_POLL_INTERVAL_MS, PageTheme, PollingSettings,
    ServiceSettings,
};
