//! Typed error enum for the scrape client.

use thiserror::Error;

/// Errors from scrape API operations.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("decode error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    /// The provider answered but could not scrape the page.
    #[error("scrape of {url} failed: {reason}")]
    Provider { url: String, reason: String },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl ScrapeError {
    /// Whether this error is transient and worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503),
            _ => false,
        }
    }
}
