//! Unified error type for the pipeline layer.

use termforge_github::GithubError;
use termforge_llm::LlmError;
use termforge_scrape::ScrapeError;
use termforge_serp::SerpError;
use termforge_storage::StorageError;
use thiserror::Error;

/// Errors from research and publish operations.
///
/// Wraps one variant per underlying subsystem so the retry supervisor can
/// delegate the transient/permanent call to the layer that knows.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Serp(#[from] SerpError),
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Github(#[from] GithubError),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A condition no retry can fix (missing entry, unusable LLM output).
    #[error("{0}")]
    Fatal(String),
}

impl ServiceError {
    /// Whether retrying the failed step could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Serp(e) => e.is_transient(),
            Self::Scrape(e) => e.is_transient(),
            Self::Llm(e) => e.is_transient(),
            Self::Github(e) => e.is_transient(),
            Self::Serialization(_) | Self::Fatal(_) => false,
        }
    }
}
