use async_trait::async_trait;
use termforge_core::{Keyword, KeywordInput, KeywordSource};

use crate::error::StorageError;

/// Derived keyword rows, unique per (input_term_hash, keyword_hash).
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// All keywords stored for a term.
    async fn keywords_for_term(&self, term: &str) -> Result<Vec<Keyword>, StorageError>;

    /// Bulk upsert. On a (term, keyword) conflict, `updated_at` is advanced
    /// and the existing row kept; never errors on duplicates. MySQL multi-row
    /// upserts return no generated ids, so callers re-read afterwards.
    async fn upsert_keywords(&self, inputs: &[KeywordInput]) -> Result<(), StorageError>;

    /// Re-read keywords for a term and source, restricted to the given
    /// keyword hashes (the post-upsert id recovery path).
    async fn keywords_by_source(
        &self,
        term: &str,
        source: KeywordSource,
        keyword_hashes: &[String],
    ) -> Result<Vec<Keyword>, StorageError>;
}
