//! Core types for termforge
//!
//! This crate contains domain types shared across all other crates:
//! glossary entries, persisted search/scrape records, keywords, bias
//! evaluations, and the hashing helpers that back the dedup columns.

pub mod constants;
mod entry;
mod env_config;
mod eval;
mod hashing;
mod keyword;
mod scrape;
mod search;

pub use constants::*;
pub use entry::*;
pub use env_config::env_parse_with_default;
pub use eval::*;
pub use hashing::{normalize_term, sha256_hex};
pub use keyword::*;
pub use scrape::*;
pub use search::*;

use serde::{Deserialize, Serialize};

/// What to do when a pipeline step finds previously computed data.
///
/// `Stale` treats existing rows as a cache hit and skips recomputation.
/// `Revalidate` recomputes every step regardless of what is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    #[default]
    Stale,
    Revalidate,
}

impl CacheStrategy {
    /// Whether existing rows should be reused instead of recomputed.
    #[must_use]
    pub const fn reuse_existing(self) -> bool {
        matches!(self, Self::Stale)
    }
}
