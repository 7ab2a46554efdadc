//! Claimlens pipeline entrypoint.
//!
//! Usage: `claimlens <label.json> "<user query>"` where `label.json` holds the
//! vision extractor's output (`product_name`, `claims`, `ingredients`).

use std::sync::Arc;

use anyhow::{Context, bail};

use claimlens::config::Config;
use claimlens::evaluate::TieredEvaluator;
use claimlens::index::{EfficacyIndex, TableSources};
use claimlens::keywords::KeywordExtractor;
use claimlens::llm::{GenaiTextGenerator, TextGenerator};
use claimlens::pipeline::{ExtractedLabel, Pipeline};
use claimlens::retrieval::{
    Embedder, EscalationConfig, QdrantSemanticIndex, RetrievalError, RetrievalEscalator,
};

/// Placeholder until a deployment-specific embedding service is wired in.
/// Every search fails per-ingredient and the escalation stage records
/// `no_info` for each ingredient.
struct UnconfiguredEmbedder;

#[async_trait::async_trait]
impl Embedder for UnconfiguredEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
        Err(RetrievalError::EmbeddingFailed {
            reason: "no embedder configured".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        bail!("usage: {} <label.json> \"<user query>\"", args[0]);
    }
    let label_path = &args[1];
    let query = &args[2];

    let config = Config::from_env()?;
    config.validate()?;

    let index = EfficacyIndex::load(&TableSources {
        ingredient_table: config.ingredient_table.clone(),
        product_table: config.product_table.clone(),
        composite_table: config.composite_table.clone(),
    })?;

    let generator: Arc<dyn TextGenerator> =
        Arc::new(GenaiTextGenerator::new(config.text_model.clone()));

    let semantic_index = QdrantSemanticIndex::new(
        &config.qdrant_url,
        config.qdrant_collection.clone(),
        UnconfiguredEmbedder,
    )?;

    let escalation = EscalationConfig {
        top_k: config.retrieval_top_k,
        fetch_k: config.retrieval_fetch_k,
        diversity_weight: config.diversity_weight,
        match_threshold: config.match_threshold,
    };

    let pipeline = Pipeline::new(
        KeywordExtractor::new(generator.clone()),
        TieredEvaluator::new(Arc::new(index), config.match_threshold),
        RetrievalEscalator::new(Arc::new(semantic_index), generator, escalation),
    );

    let label_json = std::fs::read_to_string(label_path)
        .with_context(|| format!("failed to read label file {label_path}"))?;
    let label: ExtractedLabel =
        serde_json::from_str(&label_json).context("label file is not valid label JSON")?;

    let report = pipeline.run(label, query).await?;
    println!("{report}");

    Ok(())
}
