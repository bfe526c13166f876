//! Store traits, split by domain concern.
//!
//! The pipeline depends on these traits rather than on [`crate::MySqlStorage`]
//! directly, so tests can run against an in-memory implementation.

mod entry;
mod eval;
mod keyword;
mod scrape;
mod search;

pub use entry::EntryStore;
pub use eval::EvalStore;
pub use keyword::KeywordStore;
pub use scrape::ScrapeStore;
pub use search::{SearchQueryStore, SearchResponseStore};

/// Everything the research and publish flows need from the store.
pub trait MarketingStore:
    EntryStore + SearchQueryStore + SearchResponseStore + ScrapeStore + KeywordStore + EvalStore
{
}

impl<T> MarketingStore for T where
    T: EntryStore + SearchQueryStore + SearchResponseStore + ScrapeStore + KeywordStore + EvalStore
{
}
