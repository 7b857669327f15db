//! HTTP remote backed by reqwest.

use async_trait::async_trait;
use itemsync_core::Clock;
use itemsync_types::Item;
use serde_json::Value;
use std::sync::Arc;

use super::{normalize_records, RemoteAdapter, RemoteError};
use crate::config::RemoteConfig;

/// Remote collection reachable over HTTP.
///
/// `GET {url}` returns a JSON array of records; `POST {url}` accepts one
/// serialized item.
pub struct HttpRemote {
    config: RemoteConfig,
    http: reqwest::Client,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for HttpRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemote")
            .field("url", &self.config.url)
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    /// Create a client for the configured endpoint.
    pub fn new(config: RemoteConfig, clock: Arc<dyn Clock>) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            config,
            http,
            clock,
        })
    }

    /// The collection URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl RemoteAdapter for HttpRemote {
    async fn fetch_snapshot(&self) -> Result<Vec<Item>, RemoteError> {
        let response = self
            .http
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?;

        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        let fetched = values.len();

        let items = normalize_records(
            values,
            &self.config.default_category,
            self.config.snapshot_limit,
            self.clock.now(),
        );
        tracing::debug!(fetched, kept = items.len(), "Fetched remote snapshot");
        Ok(items)
    }

    async fn push_item(&self, item: &Item) -> Result<Item, RemoteError> {
        self.http
            .post(&self.config.url)
            .json(item)
            .send()
            .await?
            .error_for_status()?;
        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use itemsync_core::FixedClock;
    use itemsync_types::ItemId;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the endpoint URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/posts", addr)
    }

    /// Read request headers plus a `content-length` body.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    fn remote(url: String) -> HttpRemote {
        let config = RemoteConfig {
            url,
            timeout_secs: 5,
            ..RemoteConfig::default()
        };
        HttpRemote::new(config, Arc::new(FixedClock::new(Utc::now()))).unwrap()
    }

    #[tokio::test]
    async fn fetch_normalizes_records() {
        let url = serve_once(
            "200 OK",
            r#"[{"id":1,"title":"one"},{"id":2},{"id":3,"title":"three","category":"Humor"}]"#,
        )
        .await;

        let items = remote(url).fetch_snapshot().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category(), "Server");
        assert_eq!(items[1].category(), "Humor");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        let result = remote(url).fetch_snapshot().await;
        assert!(matches!(result, Err(RemoteError::Status(503))));
    }

    #[tokio::test]
    async fn non_array_body_is_malformed() {
        let url = serve_once("200 OK", r#"{"id":1}"#).await;
        let result = remote(url).fetch_snapshot().await;
        assert!(matches!(result, Err(RemoteError::Malformed(_))));
    }

    #[tokio::test]
    async fn push_returns_item_on_success() {
        let url = serve_once("201 Created", r#"{"id":101}"#).await;
        let item = Item::new(ItemId::new("local-1").unwrap(), "hi", "Mine", Utc::now()).unwrap();

        let accepted = remote(url).push_item(&item).await.unwrap();
        assert_eq!(accepted, item);
    }

    #[tokio::test]
    async fn unreachable_remote_is_unavailable() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = remote(format!("http://{}/posts", addr)).fetch_snapshot().await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
    }
}
