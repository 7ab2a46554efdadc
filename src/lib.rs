//! Claimlens library crate (used by the binary and integration tests).
//!
//! Multi-stage verification of health-product advertising claims: a user
//! query is reduced to keywords, evaluated against public efficacy tables
//! through a tiered exact-key lookup, escalated to semantic retrieval when
//! the tables cannot support the claim, and rendered into a verdict report.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Pipeline configuration
//! - [`Product`], [`EvaluationVerdict`], [`Verdict`] - Run inputs and outputs
//! - [`Pipeline`], [`PipelineError`] - Orchestration
//!
//! ## Evidence Matching
//! - [`EfficacyIndex`], [`SourceTag`] - Exact-key lookup tables
//! - [`match_keywords`], [`MatchOutcome`] - Fuzzy keyword scoring
//! - [`TieredEvaluator`] - Tiered lookup walk and fallback
//!
//! ## Retrieval Escalation
//! - [`SemanticIndex`], [`QdrantSemanticIndex`], [`Embedder`] - Vector search
//! - [`DocumentReranker`] - Cross-encoder reranking seam
//! - [`RetrievalEscalator`], [`RetrievalVerdict`] - Escalation stage
//!
//! ## Collaborator Seams
//! - [`TextGenerator`], [`GenaiTextGenerator`] - LLM calls
//! - [`VisionExtractor`], [`ExtractedLabel`] - Image extraction (black box)
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod compose;
pub mod config;
pub mod evaluate;
pub mod index;
pub mod keywords;
pub mod llm;
pub mod matching;
pub mod pipeline;
pub mod retrieval;

pub use compose::compose;
pub use config::{Config, ConfigError, DEFAULT_COLLECTION_NAME, DEFAULT_QDRANT_URL};
pub use evaluate::{
    EvaluationVerdict, FallbackResult, MatchLevel, MatchResult, Product, TieredEvaluator, Verdict,
};
pub use index::{EfficacyIndex, IndexError, SourceTag, TableSources};
pub use keywords::{KeywordError, KeywordExtractor};
pub use llm::{GenaiTextGenerator, LlmError, TextGenerator, extract_json_block};
#[cfg(any(test, feature = "mock"))]
pub use llm::MockTextGenerator;
pub use matching::{DEFAULT_MATCH_THRESHOLD, MatchOutcome, match_keywords, normalize};
pub use pipeline::{ExtractedLabel, Pipeline, PipelineError, VisionExtractor};
#[cfg(any(test, feature = "mock"))]
pub use pipeline::MockVisionExtractor;
pub use retrieval::{
    DocumentReranker, Embedder, EscalationConfig, NO_INFORMATION, QdrantSemanticIndex,
    RetrievalError, RetrievalEscalator, RetrievalMatch, RetrievalVerdict, RetrievedDoc, SearchMode,
    SemanticIndex,
};
#[cfg(any(test, feature = "mock"))]
pub use retrieval::{MockEmbedder, MockSemanticIndex, ReversingReranker};
