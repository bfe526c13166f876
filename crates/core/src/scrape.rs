//! Persisted page-scrape shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::sha256_hex;

/// A scraped page, cached by `source_url_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRecord {
    pub id: i64,
    pub source_url: String,
    pub source_url_hash: String,
    pub success: bool,
    pub markdown: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub status_code: Option<i32>,
    pub error: Option<String>,
    /// Term this scrape was first requested for. Later terms can hit the
    /// same cached row; only the first requester is recorded.
    pub input_term: Option<String>,
    pub input_term_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New scrape data, before the store assigns an id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeInput {
    pub source_url: String,
    pub source_url_hash: String,
    pub success: bool,
    pub markdown: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub status_code: Option<i32>,
    pub error: Option<String>,
    pub input_term: Option<String>,
    pub input_term_hash: Option<String>,
}

impl ScrapeInput {
    /// A failed scrape attempt, persisted so the failure is visible.
    #[must_use]
    pub fn failure(url: &str, error: String) -> Self {
        Self {
            source_url: url.to_owned(),
            source_url_hash: sha256_hex(url),
            success: false,
            markdown: None,
            title: None,
            description: None,
            language: None,
            status_code: None,
            error: Some(error),
            input_term: None,
            input_term_hash: None,
        }
    }
}

/// Markdown ATX headers (`# ...` through `###### ...`) from scraped content.
///
/// Used to feed the header-keyword extraction; setext headers are not
/// produced by the scrape provider and are ignored.
#[must_use]
pub fn markdown_headers(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim_start();
            let hashes = trimmed.chars().take_while(|c| *c == '#').count();
            let rest = &trimmed[hashes..];
            // ATX requires whitespace after the hashes; `#tag` is not a header.
            if (1..=6).contains(&hashes) && rest.starts_with([' ', '\t']) {
                let text = rest.trim();
                (!text.is_empty()).then(|| text.to_owned())
            } else {
                None
            }
        })
        .collect()
}
