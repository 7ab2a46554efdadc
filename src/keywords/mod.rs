//! Query keyword extraction.
//!
//! Turns a free-text user query into a small set of salient keywords via one
//! text-generation call. The reply is expected to be a JSON array of strings,
//! possibly wrapped in a markdown code fence.

pub mod error;


pub use error::KeywordError;

use std::sync::Arc;

use tracing::debug;

use crate::llm::{TextGenerator, extract_json_block};

const KEYWORD_PROMPT_TEMPLATE: &str = "\
Extract the core health-efficacy keywords from the user question below.
Keep only terms that describe a physiological effect, body function, or
health condition the user is asking about. Answer with a JSON array of
short keyword strings and nothing else.

User question: {query}

Keywords:";

/// Extracts salient keywords from a user query.
pub struct KeywordExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for KeywordExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordExtractor").finish()
    }
}

impl KeywordExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// One generation call, fence stripping, JSON array parse. No retry.
    ///
    /// Blank entries are dropped from the parsed array; a fully blank array is
    /// a valid (empty) result, not an error.
    pub async fn extract(&self, query: &str) -> Result<Vec<String>, KeywordError> {
        let prompt = KEYWORD_PROMPT_TEMPLATE.replace("{query}", query);
        let reply = self.generator.generate(&prompt).await?;

        let payload = extract_json_block(&reply);
        let parsed: Vec<String> =
            serde_json::from_str(payload).map_err(|e| KeywordError::MalformedReply {
                reason: e.to_string(),
                raw: reply.clone(),
            })?;

        let keywords: Vec<String> = parsed
            .into_iter()
            .map(|kw| kw.trim().to_string())
            .filter(|kw| !kw.is_empty())
            .collect();

        debug!(query_len = query.len(), count = keywords.len(), "Extracted query keywords");
        Ok(keywords)
    }
}
