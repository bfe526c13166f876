//! Hashing and normalization helpers backing the dedup columns.
//!
//! Terms, keywords, and URLs are stored alongside a SHA-256 hex digest so
//! that `TEXT` columns can participate in unique indexes (MySQL limits
//! index key length; a 64-char hash column does not).

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the input, 64 characters.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Canonical form of an input term: trimmed, lowercased.
///
/// All cache keys (entry lookups, keyword dedup) hash the normalized term,
/// so "API Key" and " api key " land on the same entry.
#[must_use]
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
