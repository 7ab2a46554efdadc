use super::*;
use crate::evaluate::{FallbackResult, MatchResult, Product, Verdict};
use crate::index::SourceTag;
use crate::retrieval::{RetrievalMatch, RetrievalVerdict};

fn base_verdict() -> EvaluationVerdict {
    EvaluationVerdict {
        product: Product::new("알파정", vec!["루테인".to_string()], vec![]),
        query: "눈에 좋나요?".to_string(),
        keywords: vec!["눈".to_string()],
        match_results: vec![MatchResult {
            ingredient_name: "루테인".to_string(),
            efficacy_text: Some("눈 건강 유지".to_string()),
            match_level: MatchLevel::Matched,
            source_tag: Some(SourceTag::IngredientDb),
        }],
        fallback: None,
        overall_verdict: Verdict::Supported,
        retrieval_supplement: None,
    }
}

#[test]
fn test_compose_is_pure() {
    let verdict = base_verdict();
    assert_eq!(compose(&verdict), compose(&verdict));
}

#[test]
fn test_matched_ingredient_line() {
    let report = compose(&base_verdict());

    assert!(report.contains("Evaluation results for \"알파정\""));
    assert!(report.contains("루테인: \"눈 건강 유지\" (matched) [source: ingredient table]"));
    assert!(report.contains("Keywords extracted from the query: 눈"));
    assert!(report.ends_with("some ingredient or product efficacy matches the user query."));
}

#[test]
fn test_no_info_ingredient_gets_missing_data_notice() {
    let mut verdict = base_verdict();
    verdict.match_results = vec![MatchResult {
        ingredient_name: "X".to_string(),
        efficacy_text: None,
        match_level: MatchLevel::NoInfo,
        source_tag: None,
    }];
    verdict.overall_verdict = Verdict::Unsupported;

    let report = compose(&verdict);
    assert!(report.contains("- X: no public data available"));
    assert!(report.contains("lacks supporting evidence"));
}

#[test]
fn test_fallback_block_rendered_when_present() {
    let mut verdict = base_verdict();
    verdict.fallback = Some(FallbackResult {
        product_name: "알파정".to_string(),
        efficacy_text: "소화 불량 개선".to_string(),
        match_level: MatchLevel::Unmatched,
        source_tag: SourceTag::ProductDb,
    });

    let report = compose(&verdict);
    assert!(report.contains("Product-level supplement"));
    assert!(report.contains("\"소화 불량 개선\" (unmatched)"));
}

#[test]
fn test_empty_keywords_line_omitted() {
    let mut verdict = base_verdict();
    verdict.keywords = vec![];

    let report = compose(&verdict);
    assert!(!report.contains("Keywords extracted"));
}

#[test]
fn test_retrieval_block_takes_display_precedence() {
    let mut verdict = base_verdict();
    verdict.overall_verdict = Verdict::Unsupported;
    verdict = verdict.attach_retrieval(RetrievalVerdict::from_matches(vec![RetrievalMatch {
        ingredient_name: "루테인".to_string(),
        efficacy_text: Some("황반 색소 밀도 유지".to_string()),
        match_level: MatchLevel::Matched,
        source: Some("fnclty_db".to_string()),
    }]));

    let report = compose(&verdict);
    assert!(report.contains("Retrieval-augmented assessment:"));
    assert!(report.contains("\"황반 색소 밀도 유지\" (matched) [source: fnclty_db]"));
    assert!(report.ends_with("retrieved public evidence supports part of the advertised claim."));
}

#[test]
fn test_supplement_presence_alone_selects_the_retrieval_sentence() {
    // A supported combined verdict next to a supplement can only come from
    // retrieval, whatever the supplement's own records look like.
    let mut verdict = base_verdict();
    verdict = verdict.attach_retrieval(RetrievalVerdict::from_matches(vec![RetrievalMatch {
        ingredient_name: "루테인".to_string(),
        efficacy_text: Some("무관한 요약".to_string()),
        match_level: MatchLevel::Unmatched,
        source: None,
    }]));

    let report = compose(&verdict);
    assert!(report.ends_with("retrieved public evidence supports part of the advertised claim."));
}

#[test]
fn test_unsupported_after_retrieval_names_the_retrieval_stage() {
    let mut verdict = base_verdict();
    verdict.match_results[0].match_level = MatchLevel::Unmatched;
    verdict.overall_verdict = Verdict::Unsupported;
    verdict = verdict.attach_retrieval(RetrievalVerdict::from_matches(vec![RetrievalMatch {
        ingredient_name: "루테인".to_string(),
        efficacy_text: None,
        match_level: MatchLevel::NoInfo,
        source: None,
    }]));

    let report = compose(&verdict);
    assert!(report.ends_with("even after retrieval, no public evidence supports the advertised claim."));
}
