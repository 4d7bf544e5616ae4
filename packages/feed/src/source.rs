//! Where event batches come from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::FeedConfig;
use crate::{FeedBatch, FeedError, FeedQuery, decode, retry};

/// A provider of one batch of events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Human-readable description for logs (URL or path).
    fn describe(&self) -> String;

    /// Retrieves and decodes the batch.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if retrieval fails or the document is not a
    /// feed at all.
    async fn fetch(&self) -> Result<FeedBatch, FeedError>;
}

/// The live USGS summary feed.
pub struct UsgsFeedSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
    max_retries: u32,
}

impl UsgsFeedSource {
    /// Creates a source for `query` using the endpoint and retry settings
    /// in `config`.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &FeedConfig, query: FeedQuery) -> Self {
        Self {
            client,
            url: query.url(&config.base_url),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
        }
    }

    /// The feed URL this source downloads.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventSource for UsgsFeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<FeedBatch, FeedError> {
        log::info!("Fetching {}", self.url);
        let body = retry::send_bytes(
            || self.client.get(&self.url).timeout(self.timeout),
            self.max_retries,
        )
        .await?;
        decode::parse_feed(&body)
    }
}

/// A feed document saved on disk.
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSource for FileFeedSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<FeedBatch, FeedError> {
        log::info!("Reading feed from {}", self.path.display());
        let body = tokio::fs::read(&self.path).await?;
        decode::parse_feed(&body)
    }
}
