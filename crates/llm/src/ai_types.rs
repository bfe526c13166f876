//! Chat-completions wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// A system+user request with `json_object` response format, which every
    /// domain call here uses.
    #[must_use]
    pub fn json(model: &str, system: &str, user: &str) -> Self {
        Self {
            model: model.to_owned(),
            messages: vec![
                Message { role: "system".to_owned(), content: system.to_owned() },
                Message { role: "user".to_owned(), content: user.to_owned() },
            ],
            response_format: ResponseFormat { format_type: "json_object".to_owned() },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}
