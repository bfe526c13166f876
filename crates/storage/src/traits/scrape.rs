use async_trait::async_trait;
use termforge_core::{ScrapeInput, ScrapeRecord};

use crate::error::StorageError;

/// Scraped page contents, cached by `source_url_hash`.
#[async_trait]
pub trait ScrapeStore: Send + Sync {
    /// Fetch the cached scrape for a URL hash, if any.
    async fn scrape_for_url(&self, url_hash: &str) -> Result<Option<ScrapeRecord>, StorageError>;

    /// Insert or refresh a scrape (upserts by `source_url_hash`).
    async fn upsert_scrape(&self, input: &ScrapeInput) -> Result<ScrapeRecord, StorageError>;
}
