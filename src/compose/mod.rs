//! Verdict rendering.
//!
//! A deterministic pure transform of the verdict value: no I/O, no clocks, no
//! external calls, so the same verdict always composes to the same report.

#[cfg(test)]
mod tests;

use std::fmt::Write;

use crate::evaluate::{EvaluationVerdict, MatchLevel, Verdict};
use crate::retrieval::RetrievalVerdict;

const NO_PUBLIC_DATA_NOTICE: &str = "no public data available";

/// Renders a human-readable report for one evaluation run.
pub fn compose(verdict: &EvaluationVerdict) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Evaluation results for \"{}\".", verdict.product.name);
    let _ = writeln!(out, "User query: \"{}\"", verdict.query);
    if !verdict.keywords.is_empty() {
        let _ = writeln!(out, "Keywords extracted from the query: {}", verdict.keywords.join(", "));
    }

    let _ = writeln!(out, "\nPer-ingredient efficacy assessment:");
    if verdict.match_results.is_empty() {
        let _ = writeln!(out, "- no confirmed ingredients were available");
    }
    for result in &verdict.match_results {
        match (&result.efficacy_text, result.match_level) {
            (Some(efficacy), level) if level != MatchLevel::NoInfo => {
                let mut line = format!(
                    "- {}: \"{}\" ({})",
                    result.ingredient_name,
                    efficacy,
                    level_marker(level)
                );
                if let Some(tag) = result.source_tag {
                    let _ = write!(line, " [source: {}]", tag.label());
                }
                let _ = writeln!(out, "{line}");
            }
            _ => {
                let _ = writeln!(out, "- {}: {}", result.ingredient_name, NO_PUBLIC_DATA_NOTICE);
            }
        }
    }

    if let Some(fallback) = &verdict.fallback {
        let _ = writeln!(
            out,
            "\nProduct-level supplement (no ingredient-level evidence matched):"
        );
        let _ = writeln!(
            out,
            "- product description: \"{}\" ({})",
            fallback.efficacy_text,
            level_marker(fallback.match_level)
        );
    }

    if let Some(supplement) = &verdict.retrieval_supplement {
        compose_retrieval_block(&mut out, supplement);
    }

    let _ = write!(out, "\nFinal verdict: {}", verdict_sentence(verdict));
    out
}

fn compose_retrieval_block(out: &mut String, supplement: &RetrievalVerdict) {
    let _ = writeln!(out, "\nRetrieval-augmented assessment:");
    for entry in &supplement.matches {
        match (&entry.efficacy_text, entry.match_level) {
            (Some(efficacy), level) if level != MatchLevel::NoInfo => {
                let mut line = format!(
                    "- {}: \"{}\" ({})",
                    entry.ingredient_name,
                    efficacy,
                    level_marker(level)
                );
                if let Some(source) = &entry.source {
                    let _ = write!(line, " [source: {source}]");
                }
                let _ = writeln!(out, "{line}");
            }
            _ => {
                let _ = writeln!(out, "- {}: {}", entry.ingredient_name, NO_PUBLIC_DATA_NOTICE);
            }
        }
    }
}

fn level_marker(level: MatchLevel) -> &'static str {
    match level {
        MatchLevel::Matched => "matched",
        MatchLevel::Unmatched => "unmatched",
        MatchLevel::NoInfo => "no info",
    }
}

/// Final sentence. The retrieval stage, when present, takes display
/// precedence: escalation only runs on an unsupported tiered verdict, so a
/// combined `supported` alongside a supplement can only have come from
/// retrieval.
fn verdict_sentence(verdict: &EvaluationVerdict) -> &'static str {
    match (&verdict.retrieval_supplement, verdict.overall_verdict) {
        (Some(_), Verdict::Supported) => {
            "retrieved public evidence supports part of the advertised claim."
        }
        (Some(_), Verdict::Unsupported) => {
            "even after retrieval, no public evidence supports the advertised claim."
        }
        (None, Verdict::Supported) => {
            "some ingredient or product efficacy matches the user query."
        }
        (None, Verdict::Unsupported) => {
            "the advertised claim lacks supporting evidence (unmatched or no data)."
        }
    }
}
