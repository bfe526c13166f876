use async_trait::async_trait;
use termforge_core::{SearchData, SearchQuery, SearchRecord};

use crate::error::StorageError;

/// Canonical search query per term.
#[async_trait]
pub trait SearchQueryStore: Send + Sync {
    /// Fetch the stored query for a term, if any.
    async fn search_query_for_term(&self, term: &str)
    -> Result<Option<SearchQuery>, StorageError>;

    /// Insert or refresh the query for a term (upserts by `input_term_hash`).
    async fn upsert_search_query(&self, query: &SearchQuery)
    -> Result<SearchQuery, StorageError>;
}

/// Persisted search-engine responses and their child rows.
///
/// Responses are keyed by (input_term_hash, query_hash) so the neutral-domain
/// re-search caches independently of the original query for the same term.
#[async_trait]
pub trait SearchResponseStore: Send + Sync {
    /// Fetch a response with all child rows assembled.
    async fn search_record(
        &self,
        input_term_hash: &str,
        query_hash: &str,
    ) -> Result<Option<SearchRecord>, StorageError>;

    /// Upsert a response and replace its child rows.
    async fn save_search_record(
        &self,
        term: &str,
        query: &str,
        data: &SearchData,
    ) -> Result<SearchRecord, StorageError>;
}
