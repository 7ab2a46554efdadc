//! Text-generation collaborator seam.
//!
//! The pipeline treats the LLM as a pure `prompt -> text` function with a
//! documented failure mode: one attempt per call, no retries, callers degrade
//! on error. Prompt templating and reply parsing (including markdown fence
//! stripping) are entirely the caller's responsibility.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::LlmError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTextGenerator;

use std::sync::LazyLock;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use regex::Regex;
use tracing::debug;

/// Minimal async interface for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one prompt and returns the reply text. Single attempt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Production [`TextGenerator`] backed by the `genai` multi-provider client.
pub struct GenaiTextGenerator {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiTextGenerator")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiTextGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GenaiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })?;

        let text = response
            .first_text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyReply)?;

        debug!(model = %self.model, reply_len = text.len(), "Text generation completed");
        Ok(text)
    }
}

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)```").expect("valid fence regex"));
static BARE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)```").expect("valid fence regex"));

/// Extracts the payload from a markdown-fenced LLM reply.
///
/// Prefers a fence labeled `json`, then any bare fence, then the raw trimmed
/// text. Models wrap structured replies inconsistently, so all three shapes
/// must parse identically downstream.
pub fn extract_json_block(text: &str) -> &str {
    if let Some(captures) = JSON_FENCE.captures(text) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str().trim();
        }
    }
    if let Some(captures) = BARE_FENCE.captures(text) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str().trim();
        }
    }
    text.trim()
}
