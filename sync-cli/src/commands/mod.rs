//! CLI command implementations.

pub mod add;
pub mod categories;
pub mod conflicts;
pub mod list;
pub mod resolve;
pub mod select;
pub mod show;
pub mod status;
pub mod sync;
pub mod watch;

use anyhow::{Context as _, Result};
use chrono::Utc;
use itemsync_client::{normalize_records, Config, HttpRemote, MockRemote, RemoteAdapter, SyncClient};
use itemsync_core::SystemClock;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Client type used by every command.
pub type Client = SyncClient<Arc<dyn RemoteAdapter>>;

/// Settings shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    data_dir: PathBuf,
    config_path: Option<PathBuf>,
    mock: bool,
}

impl Context {
    /// Create a command context.
    pub fn new(data_dir: PathBuf, config_path: Option<PathBuf>, mock: bool) -> Self {
        Self {
            data_dir,
            config_path,
            mock,
        }
    }

    /// The data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// True when running against the canned remote.
    pub fn is_mock(&self) -> bool {
        self.mock
    }

    /// Path of the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("itemsync.toml"))
    }

    /// Load the configuration (defaults when the file is missing).
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load_or_default(&self.config_path())?)
    }

    /// Open the collection with the configured storage and remote.
    pub async fn open(&self) -> Result<Client> {
        let config = self.load_config()?;

        let remote: Arc<dyn RemoteAdapter> = if self.mock {
            Arc::new(mock_remote(&config))
        } else {
            Arc::new(
                HttpRemote::new(config.remote.clone(), Arc::new(SystemClock))
                    .context("Failed to create HTTP client")?,
            )
        };

        SyncClient::open(config, remote, &self.data_dir)
            .await
            .context("Failed to open item collection")
    }
}

/// A remote serving a fixed snapshot shaped like the default HTTP endpoint.
fn mock_remote(config: &Config) -> MockRemote {
    let records = vec![
        json!({"id": 1, "title": "Simplicity is prerequisite for reliability."}),
        json!({"id": 2, "title": "Make it work, make it right, make it fast."}),
        json!({"id": 3, "title": "Premature optimization is the root of all evil."}),
        json!({"id": 4, "title": "Programs must be written for people to read.", "category": "Craft"}),
        json!({"id": 5, "title": "Talk is cheap. Show me the code."}),
        json!({"id": 6, "title": "Beyond the snapshot limit."}),
    ];
    MockRemote::with_snapshot(normalize_records(
        records,
        &config.remote.default_category,
        config.remote.snapshot_limit,
        Utc::now(),
    ))
}

/// The category filter to apply: the explicit one, else the selected one.
pub async fn effective_category(client: &Client, explicit: Option<&str>) -> Result<Option<String>> {
    match explicit {
        Some(category) => Ok(Some(category.to_string())),
        None => Ok(client.selected_category().await?),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Context;
    use tempfile::TempDir;

    /// A mock-remote context over a fresh temporary data directory.
    pub fn mock_context() -> (TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None, true);
        (dir, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::mock_context;
    use super::*;

    #[tokio::test]
    async fn config_path_defaults_to_data_dir() {
        let (dir, ctx) = mock_context();
        assert_eq!(ctx.config_path(), dir.path().join("itemsync.toml"));
    }

    #[tokio::test]
    async fn mock_remote_honours_snapshot_limit() {
        let remote = mock_remote(&Config::default());
        let snapshot = remote.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[0].category(), "Server");
        assert_eq!(snapshot[3].category(), "Craft");
    }

    #[tokio::test]
    async fn open_reads_config_file() {
        let (dir, ctx) = mock_context();
        std::fs::write(
            dir.path().join("itemsync.toml"),
            "[storage]\nbackend = \"sqlite\"\n",
        )
        .unwrap();

        let client = ctx.open().await.unwrap();
        assert_eq!(client.items().await.len(), 3);
        assert!(dir.path().join("itemsync.db").exists());
    }
}
