use serde::Serialize;

use crate::index::SourceTag;
use crate::retrieval::RetrievalVerdict;

/// Product under evaluation, as assembled from the upstream image extraction.
///
/// Immutable for the duration of one evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Display name exactly as extracted; lookups use the trimmed form.
    pub name: String,
    /// Confirmed ingredient list, in label order.
    pub confirmed_ingredients: Vec<String>,
    /// Efficacy claims read off the packaging.
    pub image_claims: Vec<String>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        confirmed_ingredients: Vec<String>,
        image_claims: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            confirmed_ingredients,
            image_claims,
        }
    }

    /// Name form used for table keys.
    pub fn lookup_name(&self) -> &str {
        self.name.trim()
    }
}

/// Categorical outcome of one evidence comparison.
///
/// `NoInfo` (nothing to compare against) is deliberately distinct from
/// `Unmatched` (evidence found but it did not support the query).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    Matched,
    Unmatched,
    NoInfo,
}

impl MatchLevel {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchLevel::Matched)
    }
}

/// Per-ingredient evaluation record. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// Ingredient name as given in `confirmed_ingredients` (untrimmed).
    pub ingredient_name: String,
    /// Efficacy text the tables provided, if any.
    pub efficacy_text: Option<String>,
    pub match_level: MatchLevel,
    /// Which table supplied the efficacy text; `None` when nothing was found.
    pub source_tag: Option<SourceTag>,
}

/// Whole-product fallback record (tier 3), keyed by product name.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackResult {
    pub product_name: String,
    pub efficacy_text: String,
    pub match_level: MatchLevel,
    pub source_tag: SourceTag,
}

/// Overall run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Supported,
    Unsupported,
}

/// Complete result of one evaluation run. Built once; read-only downstream.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationVerdict {
    pub product: Product,
    pub query: String,
    pub keywords: Vec<String>,
    /// One record per confirmed ingredient, preserving input order.
    pub match_results: Vec<MatchResult>,
    pub fallback: Option<FallbackResult>,
    pub overall_verdict: Verdict,
    /// Present only when the escalation stage ran.
    pub retrieval_supplement: Option<RetrievalVerdict>,
}

impl EvaluationVerdict {
    /// Attaches the escalation result, recomputing the combined verdict:
    /// supported if either stage found a match.
    pub fn attach_retrieval(mut self, supplement: RetrievalVerdict) -> Self {
        if supplement.overall_verdict == Verdict::Supported {
            self.overall_verdict = Verdict::Supported;
        }
        self.retrieval_supplement = Some(supplement);
        self
    }

    pub fn is_supported(&self) -> bool {
        self.overall_verdict == Verdict::Supported
    }
}
