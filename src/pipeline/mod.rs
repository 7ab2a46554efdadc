//! Pipeline orchestration.
//!
//! Strict linear chain: keyword extraction, tiered evaluation, retrieval
//! escalation only on an unsupported verdict, then composition. All external
//! calls are single-attempt; every recoverable failure degrades in place.

pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVisionExtractor;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::compose::compose;
use crate::evaluate::{EvaluationVerdict, Product, TieredEvaluator, Verdict};
use crate::keywords::KeywordExtractor;
use crate::retrieval::RetrievalEscalator;

const STAGE_EXTRACT_IMAGE: &str = "extract_image_info";

/// Output shape of the vision collaborator.
///
/// May come back empty or partial; a missing product name is the pipeline's
/// one hard stop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedLabel {
    pub product_name: Option<String>,
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Image-to-label extraction seam. OCR/vision internals are out of scope;
/// the pipeline only depends on this call shape.
#[async_trait]
pub trait VisionExtractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> Result<ExtractedLabel, PipelineError>;
}

impl Product {
    /// Validates the extracted label and builds the run's product value.
    ///
    /// The upstream extractor sometimes appends variant names after a slash;
    /// only the first segment identifies the product.
    pub fn from_label(label: ExtractedLabel) -> Result<Self, PipelineError> {
        let raw_name = label
            .product_name
            .ok_or(PipelineError::MissingProductIdentity {
                stage: STAGE_EXTRACT_IMAGE,
            })?;

        let name = raw_name
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(PipelineError::MissingProductIdentity {
                stage: STAGE_EXTRACT_IMAGE,
            });
        }

        Ok(Product::new(name, label.ingredients, label.claims))
    }
}

/// The full evaluation pipeline.
pub struct Pipeline {
    keywords: KeywordExtractor,
    evaluator: TieredEvaluator,
    escalator: RetrievalEscalator,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("evaluator", &self.evaluator)
            .field("escalator", &self.escalator)
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        keywords: KeywordExtractor,
        evaluator: TieredEvaluator,
        escalator: RetrievalEscalator,
    ) -> Self {
        Self {
            keywords,
            evaluator,
            escalator,
        }
    }

    /// Runs one evaluation and returns the composed report.
    pub async fn run(&self, label: ExtractedLabel, query: &str) -> Result<String, PipelineError> {
        let verdict = self.evaluate(label, query).await?;
        Ok(compose(&verdict))
    }

    /// Extracts the label from a product image, then runs one evaluation.
    ///
    /// Extraction failures are fatal for the run: without a label there is no
    /// product identity to evaluate.
    pub async fn run_from_image(
        &self,
        extractor: &dyn VisionExtractor,
        image: &[u8],
        query: &str,
    ) -> Result<String, PipelineError> {
        let label = extractor.extract(image).await?;
        self.run(label, query).await
    }

    /// Runs one evaluation and returns the structured verdict.
    #[instrument(skip(self, label, query), fields(run_id = %Uuid::new_v4()))]
    pub async fn evaluate(
        &self,
        label: ExtractedLabel,
        query: &str,
    ) -> Result<EvaluationVerdict, PipelineError> {
        let product = Product::from_label(label)?;
        info!(product = %product.name, "Pipeline run started");

        // Keyword extraction failure is non-fatal: an empty keyword set means
        // no match is possible, not that the run is broken.
        let keywords = match self.keywords.extract(query).await {
            Ok(keywords) => keywords,
            Err(e) => {
                warn!(error = %e, "Keyword extraction failed; continuing with no keywords");
                Vec::new()
            }
        };

        let verdict = self.evaluator.evaluate(&product, query, keywords);

        if verdict.overall_verdict == Verdict::Supported {
            return Ok(verdict);
        }

        info!("Tiered evaluation unsupported; escalating to semantic retrieval");
        let supplement = self
            .escalator
            .escalate(&product.confirmed_ingredients, &verdict.keywords)
            .await;

        Ok(verdict.attach_retrieval(supplement))
    }
}
