//! EvalStore implementation for MySqlStorage.

use async_trait::async_trait;
use sqlx::Row;
use termforge_core::EvalRecord;

use super::MySqlStorage;
use crate::error::StorageError;
use crate::traits::EvalStore;

fn row_to_eval(row: &sqlx::mysql::MySqlRow) -> Result<EvalRecord, StorageError> {
    Ok(EvalRecord {
        id: row.try_get("id")?,
        entry_id: row.try_get("entry_id")?,
        eval_type: row.try_get("eval_type")?,
        ratings: row.try_get("ratings")?,
        recommendation: row.try_get("recommendation")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl EvalStore for MySqlStorage {
    async fn eval_for_entry(
        &self,
        entry_id: i64,
        eval_type: &str,
    ) -> Result<Option<EvalRecord>, StorageError> {
        let row = sqlx::query(
            "SELECT id, entry_id, eval_type, ratings, recommendation, created_at
             FROM evals
             WHERE entry_id = ? AND eval_type = ?
             ORDER BY id DESC
             LIMIT 1",
        )
        .bind(entry_id)
        .bind(eval_type)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_eval).transpose()
    }

    async fn insert_eval(
        &self,
        entry_id: i64,
        eval_type: &str,
        ratings: &serde_json::Value,
        recommendation: &serde_json::Value,
    ) -> Result<EvalRecord, StorageError> {
        let inserted = sqlx::query(
            "INSERT INTO evals (entry_id, eval_type, ratings, recommendation)
             VALUES (?, ?, ?, ?)",
        )
        .bind(entry_id)
        .bind(eval_type)
        .bind(ratings)
        .bind(recommendation)
        .execute(&self.pool)
        .await?;

        let id = inserted.last_insert_id();
        let row = sqlx::query(
            "SELECT id, entry_id, eval_type, ratings, recommendation, created_at
             FROM evals WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        row_to_eval(&row)
    }
}
