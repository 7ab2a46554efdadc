//! Retrieval-augmented escalation.
//!
//! Runs only when the tiered evaluation came back unsupported: per distinct
//! ingredient, search the semantic index, optionally rerank, summarize the
//! retrieved documents into a short efficacy statement, and re-apply the
//! keyword matcher. Every per-ingredient failure is isolated.

pub mod client;
pub mod error;
pub mod rerank;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{Embedder, QdrantSemanticIndex, SearchMode, SemanticIndex};
pub use error::RetrievalError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbedder, MockSemanticIndex, ReversingReranker};
pub use rerank::DocumentReranker;
pub use types::{NO_INFORMATION, RetrievalMatch, RetrievalVerdict, RetrievedDoc};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::evaluate::MatchLevel;
use crate::llm::TextGenerator;
use crate::matching::{MatchOutcome, match_keywords};

/// Tuning knobs for the escalation stage.
#[derive(Debug, Clone)]
pub struct EscalationConfig {
    /// Documents handed to the summarization prompt.
    pub top_k: usize,
    /// Oversampled candidate pool for diverse selection.
    pub fetch_k: usize,
    /// Relevance lambda for diverse selection.
    pub diversity_weight: f32,
    /// Fuzzy-match threshold applied to the summarized efficacy text.
    pub match_threshold: u8,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            fetch_k: 20,
            diversity_weight: 0.7,
            match_threshold: crate::matching::DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Semantic-retrieval fallback for ingredients the tables could not support.
pub struct RetrievalEscalator {
    index: Arc<dyn SemanticIndex>,
    generator: Arc<dyn TextGenerator>,
    reranker: Option<Arc<dyn DocumentReranker>>,
    config: EscalationConfig,
}

impl std::fmt::Debug for RetrievalEscalator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEscalator")
            .field("reranker", &self.reranker.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl RetrievalEscalator {
    pub fn new(
        index: Arc<dyn SemanticIndex>,
        generator: Arc<dyn TextGenerator>,
        config: EscalationConfig,
    ) -> Self {
        Self {
            index,
            generator,
            reranker: None,
            config,
        }
    }

    /// Installs a cross-encoder-style reranker between search and summarization.
    pub fn with_reranker(mut self, reranker: Arc<dyn DocumentReranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Escalates the given ingredient list against the query keywords.
    ///
    /// Duplicate ingredient names are suppressed (first occurrence wins).
    /// Infallible by design: every per-ingredient error degrades to a
    /// `no_info` record instead of aborting the stage.
    #[instrument(skip(self, ingredients, keywords), fields(ingredients = ingredients.len()))]
    pub async fn escalate(&self, ingredients: &[String], keywords: &[String]) -> RetrievalVerdict {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for ingredient in ingredients {
            let name = ingredient.trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                continue;
            }

            let record = self.evaluate_ingredient(ingredient, name, keywords).await;
            matches.push(record);
        }

        let verdict = RetrievalVerdict::from_matches(matches);
        info!(verdict = ?verdict.overall_verdict, "Retrieval escalation complete");
        verdict
    }

    async fn evaluate_ingredient(
        &self,
        display_name: &str,
        query_name: &str,
        keywords: &[String],
    ) -> RetrievalMatch {
        let mode = SearchMode::Diverse {
            fetch_k: self.config.fetch_k,
            diversity_weight: self.config.diversity_weight,
        };

        let docs = match self.index.search(query_name, mode, self.config.top_k).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(ingredient = %query_name, error = %e, "Semantic search failed; recording no_info");
                return no_info_record(display_name);
            }
        };

        if docs.is_empty() {
            debug!(ingredient = %query_name, "No documents retrieved");
            return no_info_record(display_name);
        }

        let docs = match &self.reranker {
            Some(reranker) => {
                match reranker
                    .rerank(query_name, docs.clone(), self.config.top_k)
                    .await
                {
                    Ok(reranked) => reranked,
                    Err(e) => {
                        warn!(ingredient = %query_name, error = %e, "Rerank failed; keeping search order");
                        docs
                    }
                }
            }
            None => docs,
        };

        let source = docs.first().and_then(|doc| doc.source.clone());
        let prompt = summarization_prompt(query_name, &docs);

        let summary = match self.generator.generate(&prompt).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                warn!(ingredient = %query_name, error = %e, "Summarization failed; recording no_info");
                return no_info_record(display_name);
            }
        };

        if summary.is_empty() || summary.eq_ignore_ascii_case(NO_INFORMATION) {
            debug!(ingredient = %query_name, "Summarizer found no usable efficacy content");
            return no_info_record(display_name);
        }

        let level = match match_keywords(keywords, &summary, self.config.match_threshold) {
            MatchOutcome::Matched => MatchLevel::Matched,
            MatchOutcome::Unmatched => MatchLevel::Unmatched,
        };

        debug!(ingredient = %query_name, level = ?level, "Escalation evaluated ingredient");

        RetrievalMatch {
            ingredient_name: display_name.to_string(),
            efficacy_text: Some(summary),
            match_level: level,
            source,
        }
    }
}

fn no_info_record(ingredient: &str) -> RetrievalMatch {
    RetrievalMatch {
        ingredient_name: ingredient.to_string(),
        efficacy_text: None,
        match_level: MatchLevel::NoInfo,
        source: None,
    }
}

fn summarization_prompt(ingredient: &str, docs: &[RetrievedDoc]) -> String {
    let context: String = docs
        .iter()
        .map(|doc| {
            format!(
                "source: {}\ncontent: {}",
                doc.source.as_deref().unwrap_or("unknown"),
                doc.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    format!(
        "The documents below concern the ingredient '{ingredient}'.\n\
         Based only on these documents, summarize the main efficacy or\n\
         functional effect of '{ingredient}' in one or two short sentences.\n\
         If the documents do not clearly cover it, answer exactly\n\
         '{NO_INFORMATION}'.\n\n\
         [documents]\n{context}\n[end of documents]\n\n\
         Summary of '{ingredient}':"
    )
}
