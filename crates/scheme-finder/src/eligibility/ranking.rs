use std::cmp::Reverse;

use super::scheme::{MatchResult, Scheme};

/// Orders matched schemes by descending condition count.
///
/// Condition count is a proxy for how narrowly a scheme is targeted, not a
/// relevance guarantee. The sort is stable: equal counts keep input order.
pub fn rank(matches: Vec<(Scheme, Vec<String>)>) -> Vec<MatchResult> {
    let mut ranked: Vec<MatchResult> = matches
        .into_iter()
        .map(|(scheme, reasons)| MatchResult {
            score: scheme.specificity(),
            scheme,
            reasons,
        })
        .collect();

    ranked.sort_by_key(|result| Reverse(result.score));
    ranked
}
