//! Configuration loading for itemsync.
//!
//! Configuration is loaded from a TOML file (default: `itemsync.toml` in the
//! data directory). Every section and field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint configuration.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Periodic sync configuration.
    #[serde(default)]
    pub sync: SyncSettings,
    /// Persistence configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Collection URL; `GET` returns the snapshot, `POST` accepts new items.
    #[serde(default = "default_remote_url")]
    pub url: String,
    /// Maximum records taken from a snapshot; 0 means no limit (default: 5).
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: usize,
    /// Category given to remote records that carry none (default: "Server").
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Periodic sync configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Interval between cycles in milliseconds (default: 15000).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Whether polling at `interval_ms` is allowed (default: true).
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,
}

/// Which key-value backend persists the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key.
    #[default]
    File,
    /// SQLite database.
    Sqlite,
    /// Nothing survives the process.
    Memory,
}

/// Persistence configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend (default: file).
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory (file) or database file (sqlite). Relative paths resolve
    /// against the data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_remote_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_snapshot_limit() -> usize {
    5
}

fn default_category() -> String {
    "Server".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval_ms() -> u64 {
    15_000
}

fn default_sync_enabled() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: default_remote_url(),
            snapshot_limit: default_snapshot_limit(),
            default_category: default_category(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            enabled: default_sync_enabled(),
        }
    }
}

impl RemoteConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SyncSettings {
    /// Polling interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.remote.snapshot_limit, 5);
        assert_eq!(config.remote.default_category, "Server");
        assert_eq!(config.sync.interval_ms, 15_000);
        assert!(config.sync.enabled);
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[remote]
url = "http://localhost:3000/items"
snapshot_limit = 0
timeout_secs = 2

[sync]
interval_ms = 500
enabled = false

[storage]
backend = "sqlite"
path = "/data/items.db"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.remote.url, "http://localhost:3000/items");
        assert_eq!(config.remote.snapshot_limit, 0);
        assert_eq!(config.remote.timeout(), Duration::from_secs(2));
        assert_eq!(config.sync.interval(), Duration::from_millis(500));
        assert!(!config.sync.enabled);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.path, Some(PathBuf::from("/data/items.db")));
    }

    #[test]
    fn config_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[sync]\ninterval_ms = 1000\n").unwrap();
        assert_eq!(config.sync.interval_ms, 1000);
        assert!(config.sync.enabled);
        assert_eq!(config.remote, RemoteConfig::default());
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[storage]\nbackend = \"redis\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("itemsync.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("itemsync.toml");
        std::fs::write(&path, "[sync\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
