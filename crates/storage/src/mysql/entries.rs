//! EntryStore implementation for MySqlStorage.

use async_trait::async_trait;
use termforge_core::Entry;

use super::{row_to_entry, term_key, MySqlStorage};
use crate::error::StorageError;
use crate::traits::EntryStore;

#[async_trait]
impl EntryStore for MySqlStorage {
    async fn ensure_entry(&self, term: &str) -> Result<Entry, StorageError> {
        let (input_term, input_term_hash) = term_key(term);

        sqlx::query(
            "INSERT INTO entries (input_term, input_term_hash)
             VALUES (?, ?)
             ON DUPLICATE KEY UPDATE updated_at = CURRENT_TIMESTAMP(6)",
        )
        .bind(&input_term)
        .bind(&input_term_hash)
        .execute(&self.pool)
        .await?;

        self.entry_for_term(term).await?.ok_or(StorageError::NotFound {
            entity: "entry",
            key: input_term_hash,
        })
    }

    async fn entry_for_term(&self, term: &str) -> Result<Option<Entry>, StorageError> {
        let (_, input_term_hash) = term_key(term);
        let row = sqlx::query(
            "SELECT id, input_term, input_term_hash, meta_title, meta_description,
                    content, github_pr_url, created_at, updated_at
             FROM entries
             WHERE input_term_hash = ?",
        )
        .bind(&input_term_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_entry).transpose()
    }

    async fn set_github_pr_url(&self, entry_id: i64, url: &str) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE entries SET github_pr_url = ?, updated_at = CURRENT_TIMESTAMP(6)
             WHERE id = ?",
        )
        .bind(url)
        .bind(entry_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity: "entry", key: entry_id.to_string() });
        }
        Ok(())
    }
}
