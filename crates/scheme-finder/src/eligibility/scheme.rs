use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::FieldValue;

/// Region token meaning "applies everywhere".
pub const ALL_REGIONS: &str = "ALL";

/// Canonical form of a region code: trimmed and uppercased, blank meaning [`ALL_REGIONS`].
pub fn normalize_region(raw: &str) -> String {
    let region = raw.trim();
    if region.is_empty() {
        ALL_REGIONS.to_string()
    } else {
        region.to_ascii_uppercase()
    }
}

/// Comparison applied by a [`Condition`].
///
/// Tokens outside the recognised set are kept verbatim so they can be reported,
/// and always evaluate to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    In,
    Exists,
    Unrecognized(String),
}

impl Operator {
    pub fn token(&self) -> &str {
        match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "neq",
            Operator::LessThan => "lt",
            Operator::LessOrEqual => "lte",
            Operator::GreaterThan => "gt",
            Operator::GreaterOrEqual => "gte",
            Operator::In => "in",
            Operator::Exists => "exists",
            Operator::Unrecognized(token) => token,
        }
    }
}

impl From<String> for Operator {
    fn from(token: String) -> Self {
        match token.as_str() {
            "eq" => Operator::Equals,
            "neq" => Operator::NotEquals,
            "lt" => Operator::LessThan,
            "lte" => Operator::LessOrEqual,
            "gt" => Operator::GreaterThan,
            "gte" => Operator::GreaterOrEqual,
            "in" => Operator::In,
            "exists" => Operator::Exists,
            _ => Operator::Unrecognized(token),
        }
    }
}

impl From<&str> for Operator {
    fn from(token: &str) -> Self {
        Operator::from(token.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unrecognized(token) => token,
            other => other.token().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One atomic eligibility test against a single profile field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    #[serde(default)]
    pub value: FieldValue,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        op: impl Into<Operator>,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }
}

/// A government programme definition from the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub scheme_id: String,
    pub scheme_name: String,
    #[serde(default)]
    pub eligibility_conditions: Vec<Condition>,
    #[serde(default = "nationwide")]
    pub states_applicable: Vec<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub documents_required: Vec<String>,
    #[serde(default)]
    pub application_steps: Vec<String>,
    #[serde(default)]
    pub official_url: Option<String>,
}

pub(crate) fn nationwide() -> Vec<String> {
    vec![ALL_REGIONS.to_string()]
}

impl Scheme {
    /// Minimal nationwide scheme; the remaining fields default to empty.
    pub fn new(scheme_id: impl Into<String>, scheme_name: impl Into<String>) -> Self {
        Self {
            scheme_id: scheme_id.into(),
            scheme_name: scheme_name.into(),
            eligibility_conditions: Vec::new(),
            states_applicable: nationwide(),
            benefits: None,
            documents_required: Vec::new(),
            application_steps: Vec::new(),
            official_url: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.eligibility_conditions.push(condition);
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states_applicable = states.into_iter().map(Into::into).collect();
        self
    }

    /// True when the scheme is nationwide or lists `region`.
    pub fn applies_to(&self, region: &str) -> bool {
        self.states_applicable
            .iter()
            .any(|state| state == ALL_REGIONS || state.eq_ignore_ascii_case(region))
    }

    /// Number of conditions, used as the specificity score.
    pub fn specificity(&self) -> usize {
        self.eligibility_conditions.len()
    }
}

/// A matched scheme with the condition outcomes that admitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub scheme: Scheme,
    pub reasons: Vec<String>,
    pub score: usize,
}
