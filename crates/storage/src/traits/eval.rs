use async_trait::async_trait;
use termforge_core::EvalRecord;

use crate::error::StorageError;

/// LLM evaluation rows linked to entries.
#[async_trait]
pub trait EvalStore: Send + Sync {
    /// Latest eval of the given type for an entry, if any.
    async fn eval_for_entry(
        &self,
        entry_id: i64,
        eval_type: &str,
    ) -> Result<Option<EvalRecord>, StorageError>;

    /// Insert a new eval row with JSON ratings and recommendation.
    async fn insert_eval(
        &self,
        entry_id: i64,
        eval_type: &str,
        ratings: &serde_json::Value,
        recommendation: &serde_json::Value,
    ) -> Result<EvalRecord, StorageError>;
}
