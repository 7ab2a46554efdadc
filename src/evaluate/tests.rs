use std::sync::Arc;

use super::*;
use crate::index::{EfficacyIndex, SourceTag};
use crate::matching::DEFAULT_MATCH_THRESHOLD;

fn evaluator(index: EfficacyIndex) -> TieredEvaluator {
    TieredEvaluator::new(Arc::new(index), DEFAULT_MATCH_THRESHOLD)
}

fn kws(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn product(name: &str, ingredients: &[&str]) -> Product {
    Product::new(name, kws(ingredients), vec![])
}

#[test]
fn test_ingredient_table_precedes_composite_table() {
    // Both tiers hold the key; tier 1 must win even though tier 2 disagrees.
    let index = EfficacyIndex::from_rows(
        [("루테인".to_string(), "눈 건강 유지".to_string())],
        [],
        [("알파제품".to_string(), "루테인".to_string(), "피부 보습".to_string())],
    );

    let verdict = evaluator(index).evaluate(&product("알파제품", &["루테인"]), "눈에 좋나요?", kws(&["눈"]));

    let result = &verdict.match_results[0];
    assert_eq!(result.source_tag, Some(SourceTag::IngredientDb));
    assert_eq!(result.efficacy_text.as_deref(), Some("눈 건강 유지"));
    assert_eq!(result.match_level, MatchLevel::Matched);
}

#[test]
fn test_composite_tier_used_when_ingredient_tier_misses() {
    let index = EfficacyIndex::from_rows(
        [],
        [],
        [("알파제품".to_string(), "루테인".to_string(), "눈 건강 유지".to_string())],
    );

    let verdict = evaluator(index).evaluate(&product("알파제품", &["루테인"]), "눈에 좋나요?", kws(&["눈"]));

    assert_eq!(verdict.match_results[0].source_tag, Some(SourceTag::CompositeDb));
    assert_eq!(verdict.overall_verdict, Verdict::Supported);
}

#[test]
fn test_missing_ingredient_records_no_info_and_continues() {
    let index = EfficacyIndex::from_rows(
        [("Y".to_string(), "장 건강 개선".to_string())],
        [],
        [],
    );

    let verdict = evaluator(index).evaluate(&product("P", &["X", "Y"]), "장에 좋나요?", kws(&["장"]));

    assert_eq!(verdict.match_results.len(), 2);
    assert_eq!(verdict.match_results[0].match_level, MatchLevel::NoInfo);
    assert!(verdict.match_results[0].efficacy_text.is_none());
    assert_eq!(verdict.match_results[1].match_level, MatchLevel::Matched);
    assert_eq!(verdict.overall_verdict, Verdict::Supported);
    assert!(verdict.fallback.is_none(), "fallback must not run after an ingredient match");
}

#[test]
fn test_fallback_runs_only_when_no_ingredient_matched() {
    let index = EfficacyIndex::from_rows(
        [],
        [("P".to_string(), "혈압 관리에 도움".to_string())],
        [],
    );

    let verdict = evaluator(index).evaluate(&product("P", &["Z"]), "혈압에 좋나요?", kws(&["혈압"]));

    let fallback = verdict.fallback.expect("fallback should be attempted");
    assert_eq!(fallback.match_level, MatchLevel::Matched);
    assert_eq!(fallback.source_tag, SourceTag::ProductDb);
    assert_eq!(verdict.overall_verdict, Verdict::Supported);
}

#[test]
fn test_fallback_skipped_even_when_product_entry_exists() {
    // An ingredient match makes the coarser product entry irrelevant.
    let index = EfficacyIndex::from_rows(
        [("홍삼".to_string(), "면역력 증진".to_string())],
        [("P".to_string(), "면역력 증진에 도움".to_string())],
        [],
    );

    let verdict = evaluator(index).evaluate(&product("P", &["홍삼"]), "면역에 좋나요?", kws(&["면역"]));

    assert_eq!(verdict.overall_verdict, Verdict::Supported);
    assert!(verdict.fallback.is_none());
}

#[test]
fn test_unmatched_evidence_still_counts_as_found() {
    // Evidence found but off-topic: level is unmatched, not no_info, and the
    // fallback is still attempted because the match counter stayed at zero.
    let index = EfficacyIndex::from_rows(
        [("칼슘".to_string(), "뼈 건강에 필요".to_string())],
        [],
        [],
    );

    let verdict = evaluator(index).evaluate(&product("P", &["칼슘"]), "수면에 좋나요?", kws(&["수면"]));

    assert_eq!(verdict.match_results[0].match_level, MatchLevel::Unmatched);
    assert_eq!(verdict.overall_verdict, Verdict::Unsupported);
}

#[test]
fn test_no_evidence_anywhere_is_unsupported() {
    let verdict = evaluator(EfficacyIndex::default()).evaluate(
        &product("P", &["Z"]),
        "혈압에 좋나요?",
        kws(&["혈압"]),
    );

    assert_eq!(verdict.match_results[0].match_level, MatchLevel::NoInfo);
    assert!(verdict.fallback.is_none());
    assert_eq!(verdict.overall_verdict, Verdict::Unsupported);
}

#[test]
fn test_empty_keywords_run_to_completion_unsupported() {
    let index = EfficacyIndex::from_rows(
        [("홍삼".to_string(), "면역력 증진".to_string())],
        [("P".to_string(), "면역력 증진".to_string())],
        [],
    );

    let verdict = evaluator(index).evaluate(&product("P", &["홍삼"]), "이거 좋나요?", vec![]);

    assert_eq!(verdict.match_results[0].match_level, MatchLevel::Unmatched);
    assert_eq!(verdict.overall_verdict, Verdict::Unsupported);
}

#[test]
fn test_product_and_ingredient_names_are_trimmed_for_lookup() {
    let index = EfficacyIndex::from_rows(
        [],
        [],
        [("알파제품".to_string(), "루테인".to_string(), "눈 건강".to_string())],
    );

    let verdict = evaluator(index).evaluate(
        &product(" 알파제품 ", &[" 루테인 "]),
        "눈에 좋나요?",
        kws(&["눈"]),
    );

    assert_eq!(verdict.match_results[0].match_level, MatchLevel::Matched);
    // Display name keeps its original spacing.
    assert_eq!(verdict.match_results[0].ingredient_name, " 루테인 ");
}

#[test]
fn test_results_preserve_ingredient_input_order() {
    let index = EfficacyIndex::from_rows(
        [
            ("B".to_string(), "장 건강".to_string()),
            ("A".to_string(), "눈 건강".to_string()),
        ],
        [],
        [],
    );

    let verdict = evaluator(index).evaluate(&product("P", &["B", "A", "C"]), "질문", vec![]);

    let names: Vec<&str> = verdict
        .match_results
        .iter()
        .map(|r| r.ingredient_name.as_str())
        .collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}
