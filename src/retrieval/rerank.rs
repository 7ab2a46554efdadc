use async_trait::async_trait;

use super::error::RetrievalError;
use super::types::RetrievedDoc;

/// Cross-encoder-style candidate reranking seam.
///
/// Actual cross-encoder models are external collaborators; the escalator only
/// needs "reorder by relevance and keep the top n".
#[async_trait]
pub trait DocumentReranker: Send + Sync {
    async fn rerank(
        &self,
        query: &str,
        docs: Vec<RetrievedDoc>,
        top_n: usize,
    ) -> Result<Vec<RetrievedDoc>, RetrievalError>;
}
