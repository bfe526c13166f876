//! Keyword extraction from scraped page titles and headers.

use serde::Deserialize;

use crate::client::LlmClient;
use crate::error::LlmError;

#[derive(Deserialize)]
struct KeywordsReply {
    #[serde(default)]
    keywords: Vec<String>,
}

const SYSTEM: &str =
    "You are an SEO keyword researcher for an API development glossary. From the provided \
     page fragments, extract search keywords a developer might use for the term. Only return \
     keywords actually grounded in the fragments; no invented phrases. \
     Return JSON: {\"keywords\": [\"...\"]}";

impl LlmClient {
    /// Extracts keywords from the titles of the scraped top pages.
    ///
    /// # Errors
    /// Returns an error if the API call fails or the reply is malformed.
    pub async fn keywords_from_titles(
        &self,
        term: &str,
        titles: &[String],
    ) -> Result<Vec<String>, LlmError> {
        self.extract(term, "page titles", titles).await
    }

    /// Extracts keywords from the markdown headers of the scraped top pages.
    ///
    /// # Errors
    /// Returns an error if the API call fails or the reply is malformed.
    pub async fn keywords_from_headers(
        &self,
        term: &str,
        headers: &[String],
    ) -> Result<Vec<String>, LlmError> {
        self.extract(term, "page headers", headers).await
    }

    async fn extract(
        &self,
        term: &str,
        kind: &str,
        fragments: &[String],
    ) -> Result<Vec<String>, LlmError> {
        if fragments.is_empty() {
            return Ok(Vec::new());
        }
        let user = format!("Term: {term}\n\n{kind}:\n{}", fragments.join("\n"));
        let reply: KeywordsReply = self.json_completion(kind, SYSTEM, &user).await?;
        let keywords = reply
            .keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>();
        tracing::debug!(term, kind, count = keywords.len(), "extracted keywords");
        Ok(keywords)
    }
}
