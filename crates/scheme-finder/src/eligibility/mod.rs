//! Eligibility rule engine: condition evaluation, scheme matching and ranking.
//!
//! Everything here is pure and re-entrant. [`EligibilityEngine`] only holds a shared,
//! immutable [`KnowledgeBase`], so it can be cloned behind an `Arc` and queried from
//! any number of threads at once.

mod condition;
pub mod domain;
mod matcher;
mod ranking;
pub mod router;
pub mod scheme;
pub mod view;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::debug;

use crate::knowledge_base::KnowledgeBase;

pub use condition::evaluate;
pub use domain::{FieldValue, KnownField, Profile, ProfileError, OCCUPATIONS};
pub use matcher::{match_scheme, reason, SchemeMatch};
pub use ranking::rank;
pub use router::eligibility_router;
pub use scheme::{normalize_region, Condition, MatchResult, Operator, Scheme, ALL_REGIONS};
pub use view::{EligibilityResponse, EligibilityResultView};

/// Matches `profile` against every scheme applicable to `region` and ranks the hits.
///
/// A scheme passes the region filter when it lists `"ALL"` or `region` itself;
/// `region` is compared in its [`normalize_region`] form.
/// An empty result is a valid answer, not an error.
pub fn find_matches(profile: &Profile, schemes: &[Scheme], region: &str) -> Vec<MatchResult> {
    let region = normalize_region(region);
    let matched = schemes
        .iter()
        .filter(|scheme| scheme.applies_to(&region))
        .filter_map(|scheme| {
            let outcome = match_scheme(profile, scheme);
            outcome
                .matched
                .then(|| (scheme.clone(), outcome.reasons))
        })
        .collect();

    rank(matched)
}

/// Stateless evaluator bound to a loaded knowledge base.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    knowledge_base: Arc<KnowledgeBase>,
}

impl EligibilityEngine {
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn find_matches(&self, profile: &Profile, region: &str) -> Vec<MatchResult> {
        let region = normalize_region(region);
        let matches = find_matches(profile, self.knowledge_base.schemes(), &region);
        debug!(
            %region,
            profile_fields = profile.len(),
            schemes = self.knowledge_base.len(),
            matches = matches.len(),
            "eligibility evaluated"
        );
        matches
    }

    /// Uses the profile's own `state` as the region, falling back to `"ALL"`.
    pub fn find_matches_for(&self, profile: &Profile) -> Vec<MatchResult> {
        self.find_matches(profile, profile.region().unwrap_or(ALL_REGIONS))
    }
}
