use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::vectors_output::VectorsOptions;
use qdrant_client::qdrant::{ScoredPoint, SearchPointsBuilder};
use tracing::debug;

use super::error::RetrievalError;
use super::types::RetrievedDoc;

/// Search strategy offered by the semantic index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchMode {
    /// Plain similarity ranking.
    Similarity,
    /// Maximal-marginal-relevance selection: oversample `fetch_k` candidates,
    /// then pick a diverse top-k. `diversity_weight` is the relevance lambda
    /// (1.0 = pure relevance, 0.0 = pure diversity).
    Diverse { fetch_k: usize, diversity_weight: f32 },
}

/// Text-to-vector seam. The embedding model itself is an external
/// collaborator; implementations may call out to a service.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// Minimal async interface over the semantic document index.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    /// Returns up to `top_k` documents for `query`, best first.
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        top_k: usize,
    ) -> Result<Vec<RetrievedDoc>, RetrievalError>;
}

/// Qdrant-backed semantic index over ingredient-origin documents.
///
/// Documents carry their text in the `content` payload field and origin
/// metadata in `source`. Diverse mode re-selects locally from an oversampled
/// candidate set, since Qdrant itself only ranks by similarity.
pub struct QdrantSemanticIndex<E: Embedder> {
    client: Qdrant,
    collection: String,
    embedder: E,
}

impl<E: Embedder> std::fmt::Debug for QdrantSemanticIndex<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantSemanticIndex")
            .field("collection", &self.collection)
            .finish()
    }
}

impl<E: Embedder> QdrantSemanticIndex<E> {
    pub fn new(url: &str, collection: impl Into<String>, embedder: E) -> Result<Self, RetrievalError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| RetrievalError::SearchFailed {
                reason: format!("failed to connect to {url}: {e}"),
            })?;

        Ok(Self {
            client,
            collection: collection.into(),
            embedder,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl<E: Embedder> SemanticIndex for QdrantSemanticIndex<E> {
    async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        top_k: usize,
    ) -> Result<Vec<RetrievedDoc>, RetrievalError> {
        let query_vector = self.embedder.embed(query).await?;

        let limit = match mode {
            SearchMode::Similarity => top_k,
            SearchMode::Diverse { fetch_k, .. } => fetch_k.max(top_k),
        };

        let mut builder =
            SearchPointsBuilder::new(&self.collection, query_vector.clone(), limit as u64)
                .with_payload(true);
        if matches!(mode, SearchMode::Diverse { .. }) {
            builder = builder.with_vectors(true);
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RetrievalError::SearchFailed {
                reason: e.to_string(),
            })?;

        let candidates: Vec<(RetrievedDoc, Option<Vec<f32>>)> = response
            .result
            .into_iter()
            .filter_map(|point| {
                let vector = vector_from_scored_point(&point);
                doc_from_scored_point(point).map(|doc| (doc, vector))
            })
            .collect();

        debug!(
            collection = %self.collection,
            candidates = candidates.len(),
            ?mode,
            "Semantic search returned candidates"
        );

        let docs = match mode {
            SearchMode::Similarity => candidates.into_iter().map(|(doc, _)| doc).take(top_k).collect(),
            SearchMode::Diverse { diversity_weight, .. } => {
                mmr_select(&query_vector, candidates, top_k, diversity_weight)
            }
        };

        Ok(docs)
    }
}

fn doc_from_scored_point(point: ScoredPoint) -> Option<RetrievedDoc> {
    let content = point.payload.get("content")?.as_str()?.to_string();
    let source = point
        .payload
        .get("source")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Some(RetrievedDoc {
        content,
        source,
        score: point.score,
    })
}

fn vector_from_scored_point(point: &ScoredPoint) -> Option<Vec<f32>> {
    match point.vectors.as_ref()?.vectors_options.as_ref()? {
        VectorsOptions::Vector(vector) => Some(vector.data.clone()),
        _ => None,
    }
}

/// Greedy maximal-marginal-relevance selection.
///
/// Candidates without a stored vector fall back to their index score for both
/// terms, which degrades to similarity ordering.
pub(crate) fn mmr_select(
    query_vector: &[f32],
    candidates: Vec<(RetrievedDoc, Option<Vec<f32>>)>,
    top_k: usize,
    diversity_weight: f32,
) -> Vec<RetrievedDoc> {
    let mut remaining = candidates;
    let mut selected: Vec<(RetrievedDoc, Option<Vec<f32>>)> = Vec::new();

    while selected.len() < top_k && !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (idx, (doc, vector)) in remaining.iter().enumerate() {
            let relevance = match vector {
                Some(v) => cosine_similarity(query_vector, v),
                None => doc.score,
            };

            let redundancy = selected
                .iter()
                .map(|(picked, picked_vec)| match (vector, picked_vec) {
                    (Some(v), Some(p)) => cosine_similarity(v, p),
                    _ => 0.0,
                })
                .fold(0.0f32, f32::max);

            let mmr = diversity_weight * relevance - (1.0 - diversity_weight) * redundancy;
            if mmr > best_score {
                best_score = mmr;
                best_idx = idx;
            }
        }

        selected.push(remaining.swap_remove(best_idx));
    }

    selected.into_iter().map(|(doc, _)| doc).collect()
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
