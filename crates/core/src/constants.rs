//! Shared constants for termforge.
//!
//! Centralizes magic numbers so the pipeline, storage, and CLI agree.

/// How many organic results get scraped per term.
pub const TOP_RESULT_COUNT: usize = 3;

/// Domains considered editorially neutral for the bias fallback search.
pub const NEUTRAL_SITES: [&str; 3] = ["wikipedia.org", "arxiv.org", "developer.mozilla.org"];

/// Maximum attempts for a single pipeline step before giving up.
pub const MAX_STEP_ATTEMPTS: u32 = 3;

/// MySQL connection pool: maximum connections.
pub const DB_POOL_MAX_CONNECTIONS: u32 = 10;

/// MySQL connection pool: acquire timeout in seconds.
pub const DB_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// MySQL connection pool: idle timeout in seconds.
pub const DB_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Number of organic results requested from the search provider.
pub const SEARCH_RESULT_COUNT: u32 = 10;

/// HTTP timeout for the search and scrape providers, in seconds.
/// Scrapes of heavy pages routinely take tens of seconds upstream.
pub const PROVIDER_TIMEOUT_SECS: u64 = 90;
