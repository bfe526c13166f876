//! Search-engine results client.
//!
//! Talks to a Serper-style JSON API: one POST per query, organic results
//! with optional sitelinks, plus related searches, "people also ask", and
//! top stories. Converts the wire shapes into the persisted core types.

mod error;
mod wire;

pub use error::SerpError;

use termforge_core::{
    OrganicResult, Question, RelatedSearch, SearchData, Sitelink, TopStory, NEUTRAL_SITES,
    PROVIDER_TIMEOUT_SECS, SEARCH_RESULT_COUNT,
};

use crate::wire::WireResponse;

/// Client for the search results API.
pub struct SerpClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for SerpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SerpClient {
    /// Creates a client for the given API key and base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, SerpError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|e| SerpError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url })
    }

    /// Runs one search and returns the converted result set.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or a body
    /// that does not decode.
    pub async fn search(&self, query: &str) -> Result<SearchData, SerpError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": SEARCH_RESULT_COUNT }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SerpError::HttpStatus { code: status.as_u16(), body });
        }

        let wire: WireResponse = serde_json::from_str(&body)
            .map_err(|source| SerpError::Decode { context: "search response".to_owned(), source })?;

        let data = convert(wire);
        tracing::debug!(
            query,
            organic = data.organic_results.len(),
            related = data.related_searches.len(),
            "search completed"
        );
        Ok(data)
    }
}

/// Restricts a query to the neutral domain set.
///
/// Produces `<query> site:a OR site:b OR site:c`, matching the operator
/// syntax the provider passes through to the engine.
#[must_use]
pub fn neutral_query(query: &str) -> String {
    let sites =
        NEUTRAL_SITES.iter().map(|s| format!("site:{s}")).collect::<Vec<_>>().join(" OR ");
    format!("{query} {sites}")
}

fn convert(wire: WireResponse) -> SearchData {
    SearchData {
        organic_results: wire
            .organic
            .into_iter()
            .map(|r| {
                let mut result = OrganicResult::new(r.title, r.link, r.snippet, r.position);
                result.sitelinks = r
                    .sitelinks
                    .into_iter()
                    .map(|s| Sitelink { title: s.title, link: s.link })
                    .collect();
                result
            })
            .collect(),
        related_searches: wire
            .related_searches
            .into_iter()
            .map(|r| RelatedSearch { query: r.query })
            .collect(),
        people_also_ask: wire
            .people_also_ask
            .into_iter()
            .map(|q| Question { question: q.question, snippet: q.snippet, link: q.link })
            .collect(),
        top_stories: wire
            .top_stories
            .into_iter()
            .map(|s| TopStory { title: s.title, link: s.link, source: s.source, date: s.date })
            .collect(),
    }
}
