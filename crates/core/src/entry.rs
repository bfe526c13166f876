//! Glossary entries and their canonical search queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::{normalize_term, sha256_hex};

/// A glossary entry, keyed by the normalized input term.
///
/// Created on the first research request for a term and accumulated into by
/// every later pipeline step. `content` and the meta fields are filled by an
/// upstream authoring step; `github_pr_url` is set once the entry has been
/// published as a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub input_term: String,
    pub input_term_hash: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Generated glossary markdown, if an authoring step has produced it.
    pub content: Option<String>,
    pub github_pr_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The canonical search query generated for a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub input_term: String,
    pub input_term_hash: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SearchQuery {
    /// Builds a query record for a term, hashing the normalized form.
    #[must_use]
    pub fn new(term: &str, query: String) -> Self {
        let input_term = normalize_term(term);
        let input_term_hash = sha256_hex(&input_term);
        let now = Utc::now();
        Self { input_term, input_term_hash, query, created_at: now, updated_at: now }
    }
}

/// URL-safe slug for a term: whitespace runs become single hyphens.
#[must_use]
pub fn term_slug(term: &str) -> String {
    normalize_term(term).split_whitespace().collect::<Vec<_>>().join("-")
}
