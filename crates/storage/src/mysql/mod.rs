//! MySQL storage backend using sqlx.
//!
//! Split into modular files by domain concern. Every get-or-create write is
//! an `INSERT ... ON DUPLICATE KEY UPDATE` upsert on the natural hash key,
//! so concurrent pipeline runs for the same term converge on one row instead
//! of racing a check-then-insert.

mod entries;
mod evals;
mod keywords;
mod scrapes;
mod search;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use termforge_core::{
    env_parse_with_default, normalize_term, sha256_hex, Entry, DB_POOL_ACQUIRE_TIMEOUT_SECS,
    DB_POOL_IDLE_TIMEOUT_SECS, DB_POOL_MAX_CONNECTIONS,
};

use crate::error::StorageError;

/// Tables owned by this workspace, child-first so drops respect FKs.
const TABLES_CHILD_FIRST: [&str; 9] = [
    "evals",
    "keywords",
    "search_sitelinks",
    "search_related_searches",
    "search_people_also_ask",
    "search_top_stories",
    "search_organic_results",
    "search_responses",
    "scrapes",
];

#[derive(Clone, Debug)]
pub struct MySqlStorage {
    pool: MySqlPool,
}

impl MySqlStorage {
    /// Connect a pool. Does not run migrations; apply schema files
    /// explicitly with [`crate::push::apply_migration_file`].
    ///
    /// # Errors
    /// Returns the sqlx error if the pool cannot connect.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let max_connections =
            env_parse_with_default("TERMFORGE_DB_MAX_CONNECTIONS", DB_POOL_MAX_CONNECTIONS);
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(DB_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(DB_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        tracing::info!("MySqlStorage initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by the CLI, which also needs the raw pool
    /// for `db push`).
    #[must_use]
    pub const fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Drops every termforge table. Destructive; the CLI gates this behind an
/// explicit `--yes`.
///
/// # Errors
/// Returns the first drop failure.
pub async fn reset_schema(pool: &MySqlPool) -> Result<(), StorageError> {
    // The serverless MySQL fork we target rejects multi-statement batches,
    // so each DROP runs on its own.
    for table in TABLES_CHILD_FIRST {
        sqlx::raw_sql(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await
            .map_err(StorageError::from)?;
        tracing::info!(table, "dropped");
    }
    for table in ["entries", "search_queries"] {
        sqlx::raw_sql(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await
            .map_err(StorageError::from)?;
        tracing::info!(table, "dropped");
    }
    Ok(())
}

/// Normalized term plus its hash, the lookup key used everywhere.
pub(crate) fn term_key(term: &str) -> (String, String) {
    let normalized = normalize_term(term);
    let hash = sha256_hex(&normalized);
    (normalized, hash)
}

pub(crate) fn row_to_entry(row: &sqlx::mysql::MySqlRow) -> Result<Entry, StorageError> {
    Ok(Entry {
        id: row.try_get("id")?,
        input_term: row.try_get("input_term")?,
        input_term_hash: row.try_get("input_term_hash")?,
        meta_title: row.try_get("meta_title")?,
        meta_description: row.try_get("meta_description")?,
        content: row.try_get("content")?,
        github_pr_url: row.try_get("github_pr_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
