//! Configuration manager for loading and saving client configuration
//!
//! The file lives at `<config dir>/config.json`. The directory is taken from
//! `STAGETIMER_CONFIG_DIR`, then `$XDG_CONFIG_HOME/stagetimer`, then
//! `$HOME/.config/stagetimer`, then `./stagetimer`.

use crate::config::models::ClientConfig;
use crate::error::{Result, StageTimerError, StringError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "STAGETIMER_CONFIG_DIR";

/// File name of the client configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the client configuration directory
    pub fn get_config_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("stagetimer");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config").join("stagetimer");
        }
        PathBuf::from(".").join("stagetimer")
    }

    /// Path of the configuration file inside `config_dir`
    pub fn config_path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load configuration from `path`
    ///
    /// A missing or unparseable file yields the default configuration.
    pub fn load_from(path: &Path) -> Result<ClientConfig> {
        if !path.exists() {
            info!("Configuration file not found at {}, using defaults", path.display());
            return Ok(ClientConfig::default());
        }

        let json = std::fs::read_to_string(path)?;

        match serde_json::from_str(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(ClientConfig::default())
            }
        }
    }

    /// Save configuration to `path` atomically
    ///
    /// Writes a temporary file in the same directory and persists it over the target.
    pub fn save_to(path: &Path, config: &ClientConfig) -> Result<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| StageTimerError::ConfigError(StringError::new("Invalid config path")))?;
        std::fs::create_dir_all(config_dir)?;

        let json = serde_json::to_string_pretty(config)?;
        let mut temp = tempfile::NamedTempFile::new_in(config_dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(path)
            .map_err(|e| StageTimerError::ConfigError(Box::new(e)))?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::PageTheme;
    use crate::test_utils::{ConfigDirGuard, create_test_dir};

    #[test]
    fn test_config_path_uses_env_override() {
        let temp_dir = create_test_dir();
        let _guard = ConfigDirGuard::new(&temp_dir);

        let path = ConfigManager::config_path_in(&ConfigManager::get_config_dir());
        assert_eq!(path, temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_load_missing_config_returns_defaults() {
        let temp_dir = create_test_dir();
        let config = ConfigManager::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_then_load_preserves_preferences() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = ClientConfig::default();
        config.preferences.page_theme = PageTheme::Dark;
        config.service.base_url = "http://stage.local:8080".to_string();
        ConfigManager::save_to(&path, &config).unwrap();

        let loaded = ConfigManager::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = ConfigManager::load_from(&path).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("config.json");
        ConfigManager::save_to(&path, &ClientConfig::default()).unwrap();
        ConfigManager::save_to(&path, &ClientConfig::default()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.json")]);
    }
}
