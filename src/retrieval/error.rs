use thiserror::Error;

/// Errors from the semantic-retrieval collaborators.
///
/// The escalator isolates these per ingredient: a failed search or rerank
/// marks that ingredient `no_info` and the loop continues.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Query embedding failed.
    #[error("embedding failed: {reason}")]
    EmbeddingFailed { reason: String },

    /// The semantic index could not be searched.
    #[error("semantic search failed: {reason}")]
    SearchFailed { reason: String },

    /// Candidate reranking failed.
    #[error("reranking failed: {reason}")]
    RerankFailed { reason: String },
}
