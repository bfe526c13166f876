//! KeywordStore implementation for MySqlStorage.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Row};
use termforge_core::{Keyword, KeywordInput, KeywordSource};

use super::{term_key, MySqlStorage};
use crate::error::StorageError;
use crate::traits::KeywordStore;

fn row_to_keyword(row: &sqlx::mysql::MySqlRow) -> Result<Keyword, StorageError> {
    let source_str: String = row.try_get("source")?;
    let source = source_str.parse::<KeywordSource>().map_err(|e| {
        StorageError::DataCorruption { context: format!("keyword source column: {e}"), source: e.into() }
    })?;
    Ok(Keyword {
        id: row.try_get("id")?,
        input_term: row.try_get("input_term")?,
        input_term_hash: row.try_get("input_term_hash")?,
        keyword: row.try_get("keyword")?,
        keyword_hash: row.try_get("keyword_hash")?,
        source,
        source_url: row.try_get("source_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const KEYWORD_COLUMNS: &str = "id, input_term, input_term_hash, keyword, keyword_hash, source,
                               source_url, created_at, updated_at";

#[async_trait]
impl KeywordStore for MySqlStorage {
    async fn keywords_for_term(&self, term: &str) -> Result<Vec<Keyword>, StorageError> {
        let (_, input_term_hash) = term_key(term);
        let rows = sqlx::query(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM keywords WHERE input_term_hash = ? ORDER BY id"
        ))
        .bind(&input_term_hash)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_keyword).collect()
    }

    async fn upsert_keywords(&self, inputs: &[KeywordInput]) -> Result<(), StorageError> {
        if inputs.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO keywords
                 (input_term, input_term_hash, keyword, keyword_hash, source, source_url) ",
        );
        builder.push_values(inputs, |mut row, input| {
            row.push_bind(&input.input_term)
                .push_bind(&input.input_term_hash)
                .push_bind(&input.keyword)
                .push_bind(&input.keyword_hash)
                .push_bind(input.source.as_str())
                .push_bind(&input.source_url);
        });
        builder.push(" ON DUPLICATE KEY UPDATE updated_at = CURRENT_TIMESTAMP(6)");

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn keywords_by_source(
        &self,
        term: &str,
        source: KeywordSource,
        keyword_hashes: &[String],
    ) -> Result<Vec<Keyword>, StorageError> {
        if keyword_hashes.is_empty() {
            return Ok(Vec::new());
        }
        let (_, input_term_hash) = term_key(term);

        let mut builder = QueryBuilder::new(format!(
            "SELECT {KEYWORD_COLUMNS} FROM keywords WHERE input_term_hash = "
        ));
        builder.push_bind(&input_term_hash);
        builder.push(" AND source = ");
        builder.push_bind(source.as_str());
        builder.push(" AND keyword_hash IN (");
        let mut separated = builder.separated(", ");
        for hash in keyword_hashes {
            separated.push_bind(hash);
        }
        builder.push(") ORDER BY id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_keyword).collect()
    }
}
