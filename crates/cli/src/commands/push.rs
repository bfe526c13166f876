//! `termforge db push` — apply a breakpoint-delimited migration file.

use std::path::Path;

use termforge_storage::{apply_migration_file, PushOutcome};

use crate::connect_storage;

pub(crate) async fn run(file: &Path) -> anyhow::Result<()> {
    let storage = connect_storage().await?;
    match apply_migration_file(storage.pool(), file).await {
        Ok(PushOutcome::Applied { statements }) => {
            println!("applied {statements} statements from {}", file.display());
            Ok(())
        },
        Ok(PushOutcome::SkippedDropPrimary { failed_statement }) => {
            // Known schema-tool artifact on already-migrated databases.
            println!(
                "skipped {}: statement {failed_statement} drops a missing primary key; \
                 remove the stale statement and re-run",
                file.display()
            );
            Ok(())
        },
        Err(err) => {
            eprintln!(
                "push failed, transaction rolled back; DDL statements before the failure \
                 have already committed, repair the file before re-running"
            );
            Err(err.into())
        },
    }
}
