use thiserror::Error;

/// Errors from the text-generation seam.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider call itself failed (transport, auth, model errors).
    #[error("text generation request failed: {reason}")]
    RequestFailed { reason: String },

    /// The provider answered but the reply carried no text content.
    #[error("text generation reply was empty")]
    EmptyReply,
}
