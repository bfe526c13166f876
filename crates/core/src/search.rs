//! Persisted search-engine response shapes.
//!
//! These mirror the rows in `search_responses` and its child tables, not the
//! provider's raw wire format (that lives in `termforge-serp`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::sha256_hex;

/// A search response persisted for one (term, query) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: i64,
    pub input_term: String,
    pub input_term_hash: String,
    pub query: String,
    pub query_hash: String,
    pub organic_results: Vec<OrganicResult>,
    pub related_searches: Vec<RelatedSearch>,
    pub people_also_ask: Vec<Question>,
    pub top_stories: Vec<TopStory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One organic search result, ranked by `position` (1 = best).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub title: String,
    pub link: String,
    pub link_hash: String,
    pub snippet: String,
    pub position: i32,
    #[serde(default)]
    pub sitelinks: Vec<Sitelink>,
}

impl OrganicResult {
    #[must_use]
    pub fn new(title: String, link: String, snippet: String, position: i32) -> Self {
        let link_hash = sha256_hex(&link);
        Self { title, link, link_hash, snippet, position, sitelinks: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sitelink {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedSearch {
    pub query: String,
}

/// A "people also ask" box item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub snippet: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopStory {
    pub title: String,
    pub link: String,
    pub source: String,
    pub date: Option<String>,
}

/// Provider search data before the store assigns an id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchData {
    pub organic_results: Vec<OrganicResult>,
    pub related_searches: Vec<RelatedSearch>,
    pub people_also_ask: Vec<Question>,
    pub top_stories: Vec<TopStory>,
}

/// The `position`-ascending top slice used for scraping.
///
/// Positions are expected unique per response; if they are not, ties land in
/// whichever order the unstable sort produces.
#[must_use]
pub fn top_results(results: &[OrganicResult], count: usize) -> Vec<OrganicResult> {
    let mut sorted = results.to_vec();
    sorted.sort_unstable_by_key(|r| r.position);
    sorted.truncate(count);
    sorted
}
