//! Canonical search-query generation for a glossary term.

use serde::Deserialize;

use crate::client::LlmClient;
use crate::error::LlmError;

#[derive(Deserialize)]
struct QueryReply {
    query: String,
}

impl LlmClient {
    /// Generates the one search query used for all research on a term.
    ///
    /// # Errors
    /// Returns an error if the API call fails or the reply is not the
    /// expected JSON object.
    pub async fn generate_search_query(&self, term: &str) -> Result<String, LlmError> {
        let system = "You are an expert at API development and technical SEO. \
                      Given a glossary term from the API development domain, produce the single \
                      best web search query for researching an authoritative definition of it. \
                      Return JSON: {\"query\": \"...\"}";
        let user = format!("Term: {term}");
        let reply: QueryReply = self.json_completion("search query", system, &user).await?;
        let query = reply.query.trim().to_owned();
        tracing::debug!(term, query, "generated search query");
        Ok(query)
    }
}
