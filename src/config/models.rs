//! Configuration data models
//!
//! This module defines the data structures used for client configuration.
//! Every section defaults field by field, so a partial `config.json` is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Light/dark preference for the operator console itself
///
/// Cosmetic only; unrelated to the viewer theme stored by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTheme {
    /// Light console palette
    #[default]
    Light,
    /// Dark console palette
    Dark,
}

impl PageTheme {
    /// The opposite theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Where and how to reach the timer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the service (e.g. `http://127.0.0.1:5000`)
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Path under which uploaded logos are served
    pub uploads_path: String,
}

/// Shortest polling interval honoured, whatever the config file says
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Status polling cadence for both surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Viewer status polling interval in milliseconds
    pub viewer_interval_ms: u64,
    /// Admin console status polling interval in milliseconds
    pub admin_interval_ms: u64,
}

/// Operator preferences persisted between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminPreferences {
    /// Console light/dark preference
    pub page_theme: PageTheme,
}

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service connection settings
    pub service: ServiceSettings,
    /// Polling cadence
    pub polling: PollingSettings,
    /// Operator preferences
    pub preferences: AdminPreferences,
}

impl ServiceSettings {
    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl PollingSettings {
    /// Viewer polling interval, at least `MIN_POLL_INTERVAL_MS`
    pub fn viewer_interval(&self) -> Duration {
        Duration::from_millis(self.viewer_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Admin polling interval, at least `MIN_POLL_INTERVAL_MS`
    pub fn admin_interval(&self) -> Duration {
        Duration::from_millis(self.admin_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 5000,
            uploads_path: "/static/uploads".to_string(),
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            viewer_interval_ms: 1000,
            admin_interval_ms: 2000,
        }
    }
}
