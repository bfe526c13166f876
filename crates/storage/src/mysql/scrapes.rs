//! ScrapeStore implementation for MySqlStorage.

use async_trait::async_trait;
use sqlx::Row;
use termforge_core::{ScrapeInput, ScrapeRecord};

use super::MySqlStorage;
use crate::error::StorageError;
use crate::traits::ScrapeStore;

fn row_to_scrape(row: &sqlx::mysql::MySqlRow) -> Result<ScrapeRecord, StorageError> {
    Ok(ScrapeRecord {
        id: row.try_get("id")?,
        source_url: row.try_get("source_url")?,
        source_url_hash: row.try_get("source_url_hash")?,
        success: row.try_get("success")?,
        markdown: row.try_get("markdown")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        language: row.try_get("language")?,
        status_code: row.try_get("status_code")?,
        error: row.try_get("error")?,
        input_term: row.try_get("input_term")?,
        input_term_hash: row.try_get("input_term_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ScrapeStore for MySqlStorage {
    async fn scrape_for_url(&self, url_hash: &str) -> Result<Option<ScrapeRecord>, StorageError> {
        let row = sqlx::query(
            "SELECT id, source_url, source_url_hash, success, markdown, title, description,
                    language, status_code, error, input_term, input_term_hash,
                    created_at, updated_at
             FROM scrapes
             WHERE source_url_hash = ?",
        )
        .bind(url_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_scrape).transpose()
    }

    async fn upsert_scrape(&self, input: &ScrapeInput) -> Result<ScrapeRecord, StorageError> {
        sqlx::query(
            "INSERT INTO scrapes
                 (source_url, source_url_hash, success, markdown, title, description,
                  language, status_code, error, input_term, input_term_hash)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE
                 success = VALUES(success),
                 markdown = VALUES(markdown),
                 title = VALUES(title),
                 description = VALUES(description),
                 language = VALUES(language),
                 status_code = VALUES(status_code),
                 error = VALUES(error),
                 updated_at = CURRENT_TIMESTAMP(6)",
        )
        .bind(&input.source_url)
        .bind(&input.source_url_hash)
        .bind(input.success)
        .bind(&input.markdown)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.language)
        .bind(input.status_code)
        .bind(&input.error)
        .bind(&input.input_term)
        .bind(&input.input_term_hash)
        .execute(&self.pool)
        .await?;

        self.scrape_for_url(&input.source_url_hash).await?.ok_or(StorageError::NotFound {
            entity: "scrape",
            key: input.source_url_hash.clone(),
        })
    }
}
