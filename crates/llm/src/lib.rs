//! LLM client for search-query generation, bias judgments, and keyword
//! extraction.
//!
//! One chat-completions client with a bounded retry ladder; each domain
//! operation is a prompt plus a strict JSON parse in its own module.

mod ai_types;
mod bias;
mod client;
mod error;
mod keywords;
mod query;

pub use ai_types::{ChatRequest, ChatResponse, Message, ResponseFormat};
pub use client::{strip_json_fences, LlmClient, DEFAULT_MODEL};
pub use error::LlmError;
