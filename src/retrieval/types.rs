use serde::Serialize;

use crate::evaluate::{MatchLevel, Verdict};

/// Literal sentinel the summarization prompt uses for "nothing usable found".
pub const NO_INFORMATION: &str = "no information";

/// One document returned by the semantic index.
#[derive(Debug, Clone)]
pub struct RetrievedDoc {
    pub content: String,
    /// Origin metadata (dataset name, URL), when the index carries it.
    pub source: Option<String>,
    /// Index-reported relevance score.
    pub score: f32,
}

impl RetrievedDoc {
    pub fn new(content: impl Into<String>, source: Option<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            source,
            score,
        }
    }
}

/// Per-ingredient outcome of the escalation stage.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalMatch {
    pub ingredient_name: String,
    /// LLM-summarized efficacy statement; `None` when retrieval or
    /// summarization produced nothing usable.
    pub efficacy_text: Option<String>,
    pub match_level: MatchLevel,
    /// Source of the top retrieved document, when known.
    pub source: Option<String>,
}

/// Escalation-stage verdict, structurally parallel to the tiered one.
///
/// Nests inside [`crate::evaluate::EvaluationVerdict`] when escalation ran;
/// its counter rule mirrors the tiered stage over this stage's matches only.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalVerdict {
    pub matches: Vec<RetrievalMatch>,
    pub overall_verdict: Verdict,
}

impl RetrievalVerdict {
    /// Derives the stage verdict from its own match records.
    pub fn from_matches(matches: Vec<RetrievalMatch>) -> Self {
        let overall_verdict = if matches.iter().any(|m| m.match_level.is_matched()) {
            Verdict::Supported
        } else {
            Verdict::Unsupported
        };
        Self {
            matches,
            overall_verdict,
        }
    }
}
