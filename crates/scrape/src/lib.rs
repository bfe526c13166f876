//! Page scrape client.
//!
//! Talks to a Firecrawl-style API: POST a URL, get back markdown plus page
//! metadata. Provider-side failures come back as `success: false` bodies and
//! are surfaced as typed errors rather than half-empty records.

mod error;

pub use error::ScrapeError;

use serde::Deserialize;
use termforge_core::{normalize_term, sha256_hex, ScrapeInput, PROVIDER_TIMEOUT_SECS};

/// Client for the scrape API.
pub struct ScrapeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ScrapeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct WireScrape {
    success: bool,
    #[serde(default)]
    data: Option<WireScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct WireScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: WireMetadata,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    status_code: Option<i32>,
}

impl ScrapeClient {
    /// Creates a client for the given API key and base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: String) -> Result<Self, ScrapeError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScrapeError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url })
    }

    /// Scrapes one URL to markdown, tagged with the requesting term.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, an
    /// undecodable body, or a provider-reported scrape failure.
    pub async fn scrape(&self, url: &str, term: &str) -> Result<ScrapeInput, ScrapeError> {
        let response = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({ "url": url, "formats": ["markdown"] }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus { code: status.as_u16(), body });
        }

        let wire: WireScrape = serde_json::from_str(&body)
            .map_err(|source| ScrapeError::Decode { context: "scrape response".to_owned(), source })?;

        if !wire.success {
            let reason = wire.error.unwrap_or_else(|| "provider reported failure".to_owned());
            return Err(ScrapeError::Provider { url: url.to_owned(), reason });
        }
        let data = wire.data.ok_or_else(|| ScrapeError::Provider {
            url: url.to_owned(),
            reason: "success without data".to_owned(),
        })?;

        let input_term = normalize_term(term);
        tracing::debug!(
            url,
            content_len = data.markdown.as_deref().map_or(0, str::len),
            "scrape completed"
        );
        Ok(ScrapeInput {
            source_url: url.to_owned(),
            source_url_hash: sha256_hex(url),
            success: true,
            markdown: data.markdown,
            title: data.metadata.title,
            description: data.metadata.description,
            language: data.metadata.language,
            status_code: data.metadata.status_code,
            error: None,
            input_term_hash: Some(sha256_hex(&input_term)),
            input_term: Some(input_term),
        })
    }
}
