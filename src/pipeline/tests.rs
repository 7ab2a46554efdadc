use std::sync::Arc;

use super::*;
use crate::evaluate::{MatchLevel, TieredEvaluator};
use crate::index::EfficacyIndex;
use crate::keywords::KeywordExtractor;
use crate::llm::MockTextGenerator;
use crate::matching::DEFAULT_MATCH_THRESHOLD;
use crate::retrieval::{EscalationConfig, MockSemanticIndex, RetrievalEscalator, RetrievedDoc};

struct Fixture {
    pipeline: Pipeline,
    semantic: Arc<MockSemanticIndex>,
    generator: Arc<MockTextGenerator>,
}

fn fixture(index: EfficacyIndex) -> Fixture {
    let generator = Arc::new(MockTextGenerator::new());
    let semantic = Arc::new(MockSemanticIndex::new());

    let pipeline = Pipeline::new(
        KeywordExtractor::new(generator.clone()),
        TieredEvaluator::new(Arc::new(index), DEFAULT_MATCH_THRESHOLD),
        RetrievalEscalator::new(
            semantic.clone(),
            generator.clone(),
            EscalationConfig::default(),
        ),
    );

    Fixture {
        pipeline,
        semantic,
        generator,
    }
}

fn label(name: Option<&str>, ingredients: &[&str]) -> ExtractedLabel {
    ExtractedLabel {
        product_name: name.map(str::to_string),
        claims: vec![],
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
    }
}

#[test]
fn test_missing_product_name_is_fatal() {
    let err = Product::from_label(label(None, &["X"])).unwrap_err();
    assert!(matches!(err, PipelineError::MissingProductIdentity { stage } if stage == "extract_image_info"));
}

#[test]
fn test_blank_product_name_is_fatal() {
    let err = Product::from_label(label(Some("   "), &[])).unwrap_err();
    assert!(matches!(err, PipelineError::MissingProductIdentity { .. }));
}

#[test]
fn test_product_name_keeps_first_slash_segment() {
    let product = Product::from_label(label(Some("알파정 / 베타정"), &["루테인"])).unwrap();
    assert_eq!(product.name, "알파정");
    assert_eq!(product.confirmed_ingredients, vec!["루테인".to_string()]);
}

#[tokio::test]
async fn test_supported_verdict_skips_escalation() {
    let fx = fixture(EfficacyIndex::from_rows(
        [("루테인".to_string(), "눈 건강 유지".to_string())],
        [],
        [],
    ));
    fx.generator.push_reply(r#"["눈"]"#);

    let verdict = fx
        .pipeline
        .evaluate(label(Some("알파정"), &["루테인"]), "눈에 좋나요?")
        .await
        .unwrap();

    assert!(verdict.is_supported());
    assert!(verdict.retrieval_supplement.is_none());
    assert!(fx.semantic.queries().is_empty(), "escalation must not run on a supported verdict");
}

#[tokio::test]
async fn test_unsupported_verdict_triggers_escalation() {
    let fx = fixture(EfficacyIndex::default());
    fx.generator.push_reply(r#"["혈압"]"#); // keyword extraction
    fx.semantic.insert_docs("Z", vec![RetrievedDoc::new("Z 문서", Some("db".into()), 0.8)]);
    fx.generator.push_reply("혈압 조절에 도움"); // summarization

    let verdict = fx
        .pipeline
        .evaluate(label(Some("P"), &["Z"]), "혈압에 좋나요?")
        .await
        .unwrap();

    let supplement = verdict.retrieval_supplement.as_ref().expect("escalation ran");
    assert_eq!(supplement.matches[0].match_level, MatchLevel::Matched);
    assert!(verdict.is_supported(), "combined verdict flips on retrieval match");
}

#[tokio::test]
async fn test_escalation_with_no_documents_stays_unsupported() {
    let fx = fixture(EfficacyIndex::default());
    fx.generator.push_reply(r#"["혈압"]"#);

    let verdict = fx
        .pipeline
        .evaluate(label(Some("P"), &["Z"]), "혈압에 좋나요?")
        .await
        .unwrap();

    let supplement = verdict.retrieval_supplement.as_ref().unwrap();
    assert_eq!(supplement.matches[0].match_level, MatchLevel::NoInfo);
    assert!(!verdict.is_supported());
}

#[tokio::test]
async fn test_malformed_keyword_reply_degrades_to_empty_keywords() {
    let fx = fixture(EfficacyIndex::from_rows(
        [("루테인".to_string(), "눈 건강 유지".to_string())],
        [],
        [],
    ));
    fx.generator.push_reply("not json at all");

    let verdict = fx
        .pipeline
        .evaluate(label(Some("알파정"), &["루테인"]), "눈에 좋나요?")
        .await
        .unwrap();

    assert!(verdict.keywords.is_empty());
    assert_eq!(verdict.match_results[0].match_level, MatchLevel::Unmatched);
    assert!(!verdict.is_supported());
}

#[tokio::test]
async fn test_run_from_image_extracts_then_evaluates() {
    let fx = fixture(EfficacyIndex::from_rows(
        [("루테인".to_string(), "눈 건강 유지".to_string())],
        [],
        [],
    ));
    fx.generator.push_reply(r#"["눈"]"#);

    let vision = MockVisionExtractor::new();
    vision.push_label(label(Some("알파정"), &["루테인"]));

    let report = fx
        .pipeline
        .run_from_image(&vision, b"fake image bytes", "눈에 좋나요?")
        .await
        .unwrap();

    assert_eq!(vision.image_sizes(), vec![b"fake image bytes".len()]);
    assert!(report.contains("Evaluation results for \"알파정\""));
    assert!(report.contains("(matched)"));
}

#[tokio::test]
async fn test_vision_extraction_failure_is_fatal() {
    let fx = fixture(EfficacyIndex::default());
    let vision = MockVisionExtractor::new();
    vision.push_failure("vision provider unavailable");

    let err = fx
        .pipeline
        .run_from_image(&vision, b"bytes", "눈에 좋나요?")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::ExtractionFailed { stage, .. } if stage == "extract_image_info"
    ));
    assert_eq!(fx.generator.call_count(), 0, "no downstream call after a failed extraction");
}

#[tokio::test]
async fn test_run_returns_composed_report() {
    let fx = fixture(EfficacyIndex::from_rows(
        [("루테인".to_string(), "눈 건강 유지".to_string())],
        [],
        [],
    ));
    fx.generator.push_reply(r#"["눈"]"#);

    let report = fx
        .pipeline
        .run(label(Some("알파정"), &["루테인"]), "눈에 좋나요?")
        .await
        .unwrap();

    assert!(report.contains("Evaluation results for \"알파정\""));
    assert!(report.contains("(matched)"));
}
