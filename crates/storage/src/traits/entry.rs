use async_trait::async_trait;
use termforge_core::Entry;

use crate::error::StorageError;

/// Glossary entry operations.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Get-or-create the entry for a term (upserts by `input_term_hash`).
    async fn ensure_entry(&self, term: &str) -> Result<Entry, StorageError>;

    /// Fetch the entry for a term, if one exists.
    async fn entry_for_term(&self, term: &str) -> Result<Option<Entry>, StorageError>;

    /// Record the PR URL once the entry has been published.
    async fn set_github_pr_url(&self, entry_id: i64, url: &str) -> Result<(), StorageError>;
}
