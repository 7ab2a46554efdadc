use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::{Embedder, SearchMode, SemanticIndex};
use super::error::RetrievalError;
use super::rerank::DocumentReranker;
use super::types::RetrievedDoc;

/// In-memory [`SemanticIndex`] keyed by exact query text.
///
/// Unknown queries return no documents; queries registered with
/// [`MockSemanticIndex::fail_query`] error out, exercising the per-ingredient
/// isolation path.
#[derive(Default)]
pub struct MockSemanticIndex {
    docs: Mutex<HashMap<String, Vec<RetrievedDoc>>>,
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl MockSemanticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_docs(&self, query: impl Into<String>, docs: Vec<RetrievedDoc>) {
        self.docs.lock().expect("mock lock").insert(query.into(), docs);
    }

    pub fn fail_query(&self, query: impl Into<String>, reason: impl Into<String>) {
        self.failures
            .lock()
            .expect("mock lock")
            .insert(query.into(), reason.into());
    }

    /// Queries observed so far, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl SemanticIndex for MockSemanticIndex {
    async fn search(
        &self,
        query: &str,
        _mode: SearchMode,
        top_k: usize,
    ) -> Result<Vec<RetrievedDoc>, RetrievalError> {
        self.calls.lock().expect("mock lock").push(query.to_string());

        if let Some(reason) = self.failures.lock().expect("mock lock").get(query) {
            return Err(RetrievalError::SearchFailed {
                reason: reason.clone(),
            });
        }

        let mut docs = self
            .docs
            .lock()
            .expect("mock lock")
            .get(query)
            .cloned()
            .unwrap_or_default();
        docs.truncate(top_k);
        Ok(docs)
    }
}

/// Deterministic [`Embedder`]: hashes characters into a fixed-size vector.
#[derive(Debug, Default, Clone)]
pub struct MockEmbedder {
    pub dim: usize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let dim = self.dim.max(1);
        let mut vector = vec![0.0f32; dim];
        for (i, c) in text.chars().enumerate() {
            vector[i % dim] += (c as u32 % 97) as f32 / 97.0;
        }
        Ok(vector)
    }
}

/// [`DocumentReranker`] that reverses the candidate order, making it obvious
/// in assertions whether the rerank hook ran.
#[derive(Debug, Default)]
pub struct ReversingReranker;

#[async_trait]
impl DocumentReranker for ReversingReranker {
    async fn rerank(
        &self,
        _query: &str,
        mut docs: Vec<RetrievedDoc>,
        top_n: usize,
    ) -> Result<Vec<RetrievedDoc>, RetrievalError> {
        docs.reverse();
        docs.truncate(top_n);
        Ok(docs)
    }
}
