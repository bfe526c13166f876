//! Chat-completions HTTP client with a bounded retry ladder.

use crate::ai_types::{ChatRequest, ChatResponse};
use crate::error::LlmError;

/// Default model for all domain calls.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const MAX_RETRIES: usize = 3;
const RETRY_DELAYS_SECS: [u64; 4] = [0, 1, 2, 4];

/// Client for the chat-completions API.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a new client with the given API key and base URL. The model
    /// can be overridden via `TERMFORGE_LLM_MODEL`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let model = std::env::var("TERMFORGE_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a chat request and returns the first choice's content.
    ///
    /// Transient failures (transport errors, 429/5xx) are retried with
    /// delays of 0/1/2/4 seconds; anything else returns immediately.
    ///
    /// # Errors
    /// Returns an error if the request fails after retries, the body cannot
    /// be parsed, or the choices array is empty.
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_secs = RETRY_DELAYS_SECS.get(attempt).copied().unwrap_or(4);
                tokio::time::sleep(std::time::Duration::from_secs(delay_secs)).await;
                tracing::warn!("LLM retry attempt {attempt}/{MAX_RETRIES} after {delay_secs}s");
            }

            let response = match self
                .client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(request)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::HttpRequest(e));
                    continue;
                },
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    last_error = Some(LlmError::HttpRequest(e));
                    continue;
                },
            };

            if status.is_success() {
                let chat_response: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                        context: format!("chat completion response (body: {})", truncate(&body, 200)),
                        source: e,
                    })?;
                let first = chat_response.choices.first().ok_or(LlmError::EmptyResponse)?;
                return Ok(first.message.content.clone());
            }

            let err = LlmError::HttpStatus { code: status.as_u16(), body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(LlmError::RetriesExhausted(Box::new(last_error.unwrap_or(LlmError::EmptyResponse))))
    }

    /// Runs a JSON-mode request and deserializes the reply, tolerating
    /// markdown code fences around the JSON.
    pub(crate) async fn json_completion<T: serde::de::DeserializeOwned>(
        &self,
        context: &str,
        system: &str,
        user: &str,
    ) -> Result<T, LlmError> {
        let request = ChatRequest::json(&self.model, system, user);
        let content = self.chat_completion(&request).await?;
        let stripped = strip_json_fences(&content);
        serde_json::from_str(stripped).map_err(|e| LlmError::JsonParse {
            context: format!("{context} (content: {})", truncate(stripped, 300)),
            source: e,
        })
    }
}

/// Strips a surrounding ```json / ``` fence, if present.
#[must_use]
pub fn strip_json_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Truncates a string to the given maximum length at a char boundary.
fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    s.get(..end).unwrap_or("")
}
