//! Migration applier for breakpoint-delimited SQL files.
//!
//! Schema changes arrive as a single `.sql` file whose statements are
//! separated by a literal `--> statement-breakpoint` marker. The applier
//! splits the file, drops comment-only segments, and executes the remainder
//! in order inside one transaction, rolling back on the first failure.
//!
//! The rollback guarantee only covers DML. MySQL DDL statements (CREATE,
//! ALTER, DROP) commit implicitly as they execute, so in a mostly-DDL file
//! the statements before the failing one have already persisted and the
//! rollback cannot undo them. Failure reports name the failing statement
//! and say which earlier statements may have committed, so the operator can
//! repair the file before re-running.

use std::path::Path;

use sqlx::MySqlPool;

use crate::error::{StorageError, DROP_PRIMARY_MISSING};

/// Marker separating statements in a migration file.
pub const STATEMENT_BREAKPOINT: &str = "--> statement-breakpoint";

/// Result of applying a migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Every statement executed and the transaction committed.
    Applied { statements: usize },
    /// A statement hit MySQL's "can't drop absent primary key" error and
    /// the transaction was rolled back (earlier DDL statements may have
    /// already implicitly committed). The schema tool that generates these
    /// files re-emits `DROP PRIMARY KEY` even when the key is gone, so this
    /// outcome means the file (or this part of it) was already applied.
    /// Remove the stale statement and re-run.
    SkippedDropPrimary { failed_statement: String },
}

/// Splits a migration file into executable statements.
///
/// Segments are delimited by [`STATEMENT_BREAKPOINT`]. Within each segment,
/// `--` comment lines and blank lines are dropped; segments that are empty
/// after that are skipped entirely.
#[must_use]
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(STATEMENT_BREAKPOINT)
        .filter_map(|segment| {
            let statement = segment
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n");
            (!statement.is_empty()).then_some(statement)
        })
        .collect()
}

/// Reads a migration file and applies it. See [`apply_statements`].
///
/// # Errors
/// Returns [`StorageError::Migration`] if the file cannot be read, or any
/// error from statement execution.
pub async fn apply_migration_file(
    pool: &MySqlPool,
    path: &Path,
) -> Result<PushOutcome, StorageError> {
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::Migration(format!("cannot read {}: {e}", path.display())))?;
    let statements = split_statements(&sql);
    tracing::info!(file = %path.display(), count = statements.len(), "applying migration file");
    apply_statements(pool, &statements).await
}

/// Executes statements sequentially inside one transaction.
///
/// Progress is logged as `i/N`. On failure the transaction is rolled back;
/// the rollback undoes DML only, since any earlier DDL statement has
/// implicitly committed, and the failure log says how many statements may
/// have done so. Re-running an already-applied file is expected to fail on
/// its first conflicting statement.
///
/// # Errors
/// Returns the database error of the failing statement, except for the
/// absent-primary-key case, which maps to [`PushOutcome::SkippedDropPrimary`].
pub async fn apply_statements(
    pool: &MySqlPool,
    statements: &[String],
) -> Result<PushOutcome, StorageError> {
    let total = statements.len();
    let mut tx = pool.begin().await.map_err(StorageError::from)?;

    for (index, statement) in statements.iter().enumerate() {
        match sqlx::raw_sql(statement.as_str()).execute(&mut *tx).await {
            Ok(_) => {
                tracing::info!(progress = %format!("{}/{total}", index + 1), "executed statement");
            },
            Err(err) => {
                let message =
                    err.as_database_error().map(|d| d.message().to_owned()).unwrap_or_default();
                rollback(tx).await;

                if message.contains(DROP_PRIMARY_MISSING) {
                    tracing::warn!(
                        statement = statement.as_str(),
                        "primary key already dropped; remove the stale DROP statement from the \
                         migration file and re-run"
                    );
                    return Ok(PushOutcome::SkippedDropPrimary {
                        failed_statement: statement.clone(),
                    });
                }

                tracing::error!(
                    statement = statement.as_str(),
                    executed_before_failure = index,
                    error = %err,
                    "statement failed, transaction rolled back; earlier DDL statements have \
                     implicitly committed and must be repaired manually"
                );
                return Err(StorageError::from(err));
            },
        }
    }

    tx.commit().await.map_err(StorageError::from)?;
    tracing::info!(statements = total, "migration committed");
    Ok(PushOutcome::Applied { statements: total })
}

async fn rollback(tx: sqlx::Transaction<'_, sqlx::MySql>) {
    if let Err(err) = tx.rollback().await {
        tracing::error!(error = %err, "rollback failed");
    }
}
