//! Fuzzy matching between query keywords and efficacy descriptions.
//!
//! Claim text and efficacy text rarely share identical phrasing, so this is a
//! deliberately permissive partial-ratio match rather than exact containment.


use rapidfuzz::fuzz;

/// Default partial-ratio score (0-100) a keyword must reach to count as a match.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 70;

/// Outcome of comparing a keyword set against one efficacy description.
///
/// Absence of evidence is not represented here; callers that found no text to
/// match against record `no_info` at the result level instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// At least one keyword cleared the threshold.
    Matched,
    /// No keyword cleared the threshold (or there were no usable keywords).
    Unmatched,
}

impl MatchOutcome {
    /// Returns `true` for [`MatchOutcome::Matched`].
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }
}

/// Lowercases and strips whitespace, punctuation, and the middle dot.
///
/// Both keywords and efficacy text pass through this before scoring, so
/// `"혈 압"` and `"혈압"` compare equal.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| {
            !c.is_whitespace()
                && !matches!(
                    c,
                    '·' | '.' | ',' | '!' | '?' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}'
                )
        })
        .collect()
}

/// Scores each keyword against `efficacy_text` with a partial fuzzy ratio.
///
/// Returns [`MatchOutcome::Matched`] as soon as any keyword scores at or above
/// `threshold`. An empty keyword list never matches.
pub fn match_keywords(keywords: &[String], efficacy_text: &str, threshold: u8) -> MatchOutcome {
    let eff_norm = normalize(efficacy_text);
    if eff_norm.is_empty() {
        return MatchOutcome::Unmatched;
    }

    for keyword in keywords {
        let kw_norm = normalize(keyword);
        if kw_norm.is_empty() {
            continue;
        }

        let score = fuzz::partial_ratio(kw_norm.chars(), eff_norm.chars());
        if score >= threshold as f64 {
            return MatchOutcome::Matched;
        }
    }

    MatchOutcome::Unmatched
}
