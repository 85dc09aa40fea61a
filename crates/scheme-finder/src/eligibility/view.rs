use serde::{Deserialize, Serialize};

use super::scheme::MatchResult;

/// Flattened, client-facing view of a [`MatchResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResultView {
    pub scheme_id: String,
    pub scheme_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    pub documents_required: Vec<String>,
    pub application_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    pub score: usize,
    pub reasons: Vec<String>,
}

impl From<&MatchResult> for EligibilityResultView {
    fn from(result: &MatchResult) -> Self {
        let scheme = &result.scheme;
        Self {
            scheme_id: scheme.scheme_id.clone(),
            scheme_name: scheme.scheme_name.clone(),
            benefits: scheme.benefits.clone(),
            documents_required: scheme.documents_required.clone(),
            application_steps: scheme.application_steps.clone(),
            official_url: scheme.official_url.clone(),
            score: result.score,
            reasons: result.reasons.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub eligible_schemes: Vec<EligibilityResultView>,
}

impl EligibilityResponse {
    pub fn from_matches(matches: &[MatchResult]) -> Self {
        Self {
            eligible_schemes: matches.iter().map(EligibilityResultView::from).collect(),
        }
    }
}
