//! MySQL persistence for termforge.
//!
//! - [`MySqlStorage`] implements the per-domain store traits over a sqlx pool.
//! - [`push`] applies breakpoint-delimited migration files transactionally.
//! - [`traits`] is what the pipeline depends on, so tests can swap the
//!   backend for an in-memory store.

mod error;
mod mysql;
pub mod push;
pub mod traits;

pub use error::{StorageError, DROP_PRIMARY_MISSING};
pub use mysql::{reset_schema, MySqlStorage};
pub use push::{apply_migration_file, apply_statements, split_statements, PushOutcome};
pub use traits::{
    EntryStore, EvalStore, KeywordStore, MarketingStore, ScrapeStore, SearchQueryStore,
    SearchResponseStore,
};
