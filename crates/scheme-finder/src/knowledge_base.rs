//! Loader for the static scheme catalogue the engine matches against.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::eligibility::scheme::nationwide;
use crate::eligibility::{Condition, Scheme};

const BUNDLED_SCHEMES: &str = include_str!("../data/schemes.json");

/// Immutable, validated set of schemes, in catalogue order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    schemes: Vec<Scheme>,
}

/// Catalogue entry as written on disk. Only `eligibility_conditions` is
/// tracked as optional so a missing list can be reported.
#[derive(Debug, Deserialize)]
struct SchemeRecord {
    scheme_id: String,
    scheme_name: String,
    #[serde(default)]
    eligibility_conditions: Option<Vec<Condition>>,
    #[serde(default = "nationwide")]
    states_applicable: Vec<String>,
    #[serde(default)]
    benefits: Option<String>,
    #[serde(default)]
    documents_required: Vec<String>,
    #[serde(default)]
    application_steps: Vec<String>,
    #[serde(default)]
    official_url: Option<String>,
}

impl SchemeRecord {
    fn into_scheme(self) -> Scheme {
        let eligibility_conditions = match self.eligibility_conditions {
            Some(conditions) => conditions,
            None => {
                warn!(
                    scheme_id = %self.scheme_id,
                    "scheme has no eligibility_conditions; it will match every profile"
                );
                Vec::new()
            }
        };

        Scheme {
            scheme_id: self.scheme_id,
            scheme_name: self.scheme_name,
            eligibility_conditions,
            states_applicable: self.states_applicable,
            benefits: self.benefits,
            documents_required: self.documents_required,
            application_steps: self.application_steps,
            official_url: self.official_url,
        }
    }
}

impl KnowledgeBase {
    /// Validates an in-memory catalogue.
    pub fn new(schemes: Vec<Scheme>) -> Result<Self, KnowledgeBaseError> {
        let mut seen = HashSet::new();
        for scheme in &schemes {
            if !seen.insert(scheme.scheme_id.as_str()) {
                return Err(KnowledgeBaseError::DuplicateScheme(
                    scheme.scheme_id.clone(),
                ));
            }
        }
        Ok(Self { schemes })
    }

    /// The catalogue compiled into the crate.
    pub fn bundled() -> Result<Self, KnowledgeBaseError> {
        Self::from_json_str(BUNDLED_SCHEMES)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeBaseError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let knowledge_base = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            schemes = knowledge_base.len(),
            "knowledge base loaded"
        );
        Ok(knowledge_base)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, KnowledgeBaseError> {
        let records: Vec<SchemeRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, KnowledgeBaseError> {
        let records: Vec<SchemeRecord> = serde_json::from_str(raw)?;
        Self::from_records(records)
    }

    fn from_records(records: Vec<SchemeRecord>) -> Result<Self, KnowledgeBaseError> {
        Self::new(records.into_iter().map(SchemeRecord::into_scheme).collect())
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn get(&self, scheme_id: &str) -> Option<&Scheme> {
        self.schemes
            .iter()
            .find(|scheme| scheme.scheme_id == scheme_id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read scheme catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scheme catalogue: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate scheme_id '{0}' in catalogue")]
    DuplicateScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::Operator;

    #[test]
    fn bundled_catalogue_loads() {
        let knowledge_base = KnowledgeBase::bundled().expect("bundled catalogue parses");

        assert!(!knowledge_base.is_empty());
        let pm_kisan = knowledge_base.get("pm-kisan").expect("pm-kisan present");
        assert_eq!(pm_kisan.eligibility_conditions[0].op, Operator::Equals);
        assert!(knowledge_base
            .schemes()
            .iter()
            .all(|scheme| !scheme.states_applicable.is_empty()));
    }

    #[test]
    fn missing_conditions_default_to_empty() {
        let knowledge_base = KnowledgeBase::from_json_str(
            r#"[{"scheme_id": "open-door", "scheme_name": "Open Door", "states_applicable": ["WB"]}]"#,
        )
        .expect("catalogue parses");

        let scheme = knowledge_base.get("open-door").expect("scheme present");
        assert!(scheme.eligibility_conditions.is_empty());
        assert_eq!(scheme.states_applicable, vec!["WB".to_string()]);
    }

    #[test]
    fn rejects_duplicate_scheme_ids() {
        let raw = r#"[
            {"scheme_id": "dup", "scheme_name": "First"},
            {"scheme_id": "dup", "scheme_name": "Second"}
        ]"#;

        match KnowledgeBase::from_json_str(raw) {
            Err(KnowledgeBaseError::DuplicateScheme(id)) => assert_eq!(id, "dup"),
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn surfaces_json_errors() {
        assert!(matches!(
            KnowledgeBase::from_json_str("{\"not\": \"a list\"}"),
            Err(KnowledgeBaseError::Json(_))
        ));
    }

    #[test]
    fn from_path_reports_missing_files() {
        assert!(matches!(
            KnowledgeBase::from_path("/nonexistent/schemes.json"),
            Err(KnowledgeBaseError::Io(_))
        ));
    }
}
