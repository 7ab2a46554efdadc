use thiserror::Error;

use crate::llm::LlmError;

/// Errors from keyword extraction.
///
/// Non-fatal at the pipeline level: callers degrade to an empty keyword list,
/// which downstream treats as "no matches possible".
#[derive(Debug, Error)]
pub enum KeywordError {
    /// The generation call failed.
    #[error("keyword extraction call failed: {0}")]
    Llm(#[from] LlmError),

    /// The reply did not parse as a JSON array of strings.
    #[error("keyword reply was not a JSON string array: {reason}; raw reply: {raw}")]
    MalformedReply { reason: String, raw: String },
}
