//! Derived keywords and their provenance tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::{normalize_term, sha256_hex};

/// Where a keyword was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Titles,
    Headers,
    RelatedSearches,
}

impl KeywordSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Titles => "titles",
            Self::Headers => "headers",
            Self::RelatedSearches => "related_searches",
        }
    }
}

impl std::str::FromStr for KeywordSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "titles" => Ok(Self::Titles),
            "headers" => Ok(Self::Headers),
            "related_searches" => Ok(Self::RelatedSearches),
            other => Err(format!("unknown keyword source: {other}")),
        }
    }
}

/// A persisted keyword row.
///
/// Unique per (input_term_hash, keyword_hash); re-inserting the same pair
/// advances `updated_at` instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub input_term: String,
    pub input_term_hash: String,
    pub keyword: String,
    pub keyword_hash: String,
    pub source: KeywordSource,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New keyword data before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordInput {
    pub input_term: String,
    pub input_term_hash: String,
    pub keyword: String,
    pub keyword_hash: String,
    pub source: KeywordSource,
    pub source_url: Option<String>,
}

impl KeywordInput {
    /// Normalizes term and keyword, then hashes both for the dedup index.
    #[must_use]
    pub fn new(term: &str, keyword: &str, source: KeywordSource, source_url: Option<String>) -> Self {
        let input_term = normalize_term(term);
        let keyword = keyword.trim().to_lowercase();
        Self {
            input_term_hash: sha256_hex(&input_term),
            keyword_hash: sha256_hex(&keyword),
            input_term,
            keyword,
            source,
            source_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_round_trips_through_str() {
        for source in [KeywordSource::Titles, KeywordSource::Headers, KeywordSource::RelatedSearches] {
            assert_eq!(source.as_str().parse::<KeywordSource>().unwrap(), source);
        }
    }

    #[test]
    fn input_lowercases_keyword() {
        let k = KeywordInput::new("MIME Types", " Content-Type Header ", KeywordSource::Titles, None);
        assert_eq!(k.keyword, "content-type header");
        assert_eq!(k.keyword_hash, sha256_hex("content-type header"));
        assert_eq!(k.input_term, "mime types");
    }

    #[test]
    fn same_pair_hashes_identically() {
        let a = KeywordInput::new("api", "rate limit", KeywordSource::Titles, None);
        let b = KeywordInput::new("API", "Rate Limit", KeywordSource::Headers, None);
        assert_eq!(a.input_term_hash, b.input_term_hash);
        assert_eq!(a.keyword_hash, b.keyword_hash);
    }
}
