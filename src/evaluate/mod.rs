//! Tiered evidence evaluation.
//!
//! Per ingredient, the lookup order is fixed: ingredient table (tier 1), then
//! composite `(product, ingredient)` table (tier 2). The coarser product-name
//! fallback (tier 3) runs only when no ingredient-level evidence matched, so a
//! generic product blurb can never paper over ingredient-level disagreement.

pub mod types;

#[cfg(test)]
mod tests;

pub use types::{EvaluationVerdict, FallbackResult, MatchLevel, MatchResult, Product, Verdict};

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::index::{EfficacyIndex, SourceTag};
use crate::matching::{MatchOutcome, match_keywords};

/// Walks the tiered lookup order for a product and query-keyword set.
pub struct TieredEvaluator {
    index: Arc<EfficacyIndex>,
    threshold: u8,
}

impl std::fmt::Debug for TieredEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredEvaluator")
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl TieredEvaluator {
    pub fn new(index: Arc<EfficacyIndex>, threshold: u8) -> Self {
        Self { index, threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Evaluates `product` against pre-extracted query keywords.
    ///
    /// Synchronous and side-effect free over the read-only index; the caller
    /// owns the keyword-extraction call. An empty keyword list runs to
    /// completion and simply cannot match.
    #[instrument(skip(self, product, keywords), fields(product = %product.lookup_name(), ingredients = product.confirmed_ingredients.len()))]
    pub fn evaluate(&self, product: &Product, query: &str, keywords: Vec<String>) -> EvaluationVerdict {
        let product_key = product.lookup_name();
        let mut match_results = Vec::with_capacity(product.confirmed_ingredients.len());
        let mut match_count = 0usize;

        for ingredient in &product.confirmed_ingredients {
            let ingredient_key = ingredient.trim();

            let found = self
                .index
                .lookup_ingredient(ingredient_key)
                .map(|text| (text, SourceTag::IngredientDb))
                .or_else(|| {
                    self.index
                        .lookup_composite(product_key, ingredient_key)
                        .map(|text| (text, SourceTag::CompositeDb))
                });

            let result = match found {
                Some((efficacy, source_tag)) => {
                    let level = match match_keywords(&keywords, efficacy, self.threshold) {
                        MatchOutcome::Matched => {
                            match_count += 1;
                            MatchLevel::Matched
                        }
                        MatchOutcome::Unmatched => MatchLevel::Unmatched,
                    };
                    debug!(ingredient = %ingredient_key, source = source_tag.label(), level = ?level, "Tiered lookup hit");
                    MatchResult {
                        ingredient_name: ingredient.clone(),
                        efficacy_text: Some(efficacy.to_string()),
                        match_level: level,
                        source_tag: Some(source_tag),
                    }
                }
                None => {
                    debug!(ingredient = %ingredient_key, "No table entry at any ingredient tier");
                    MatchResult {
                        ingredient_name: ingredient.clone(),
                        efficacy_text: None,
                        match_level: MatchLevel::NoInfo,
                        source_tag: None,
                    }
                }
            };
            match_results.push(result);
        }

        // Tier 3 is reached only when nothing finer-grained matched.
        let fallback = if match_count == 0 {
            self.product_fallback(product, &keywords, &mut match_count)
        } else {
            None
        };

        let overall_verdict = if match_count >= 1 {
            Verdict::Supported
        } else {
            Verdict::Unsupported
        };

        info!(
            matches = match_count,
            fallback = fallback.is_some(),
            verdict = ?overall_verdict,
            "Tiered evaluation complete"
        );

        EvaluationVerdict {
            product: product.clone(),
            query: query.to_string(),
            keywords,
            match_results,
            fallback,
            overall_verdict,
            retrieval_supplement: None,
        }
    }

    fn product_fallback(
        &self,
        product: &Product,
        keywords: &[String],
        match_count: &mut usize,
    ) -> Option<FallbackResult> {
        let Some(efficacy) = self.index.lookup_product(product.lookup_name()) else {
            info!(product = %product.lookup_name(), "No product-level fallback entry");
            return None;
        };

        let level = match match_keywords(keywords, efficacy, self.threshold) {
            MatchOutcome::Matched => {
                *match_count += 1;
                MatchLevel::Matched
            }
            MatchOutcome::Unmatched => MatchLevel::Unmatched,
        };

        debug!(product = %product.lookup_name(), level = ?level, "Product-name fallback evaluated");

        Some(FallbackResult {
            product_name: product.name.clone(),
            efficacy_text: efficacy.to_string(),
            match_level: level,
            source_tag: SourceTag::ProductDb,
        })
    }
}
