//! Printable application guide built from ranked matches.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};

use crate::eligibility::{KnownField, MatchResult, Profile};

/// Produces an opaque artifact from a profile and its ranked matches.
pub trait GuideRenderer: Send + Sync {
    fn render(
        &self,
        profile: &Profile,
        matches: &[MatchResult],
        language: &str,
    ) -> Result<GuideArtifact, GuideError>;
}

/// Rendered guide; callers only forward it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideArtifact {
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    #[error("failed to format guide: {0}")]
    Format(#[from] std::fmt::Error),
}

const SUMMARY_FIELDS: [KnownField; 4] = [
    KnownField::State,
    KnownField::District,
    KnownField::Occupation,
    KnownField::AnnualIncome,
];

/// Plain-text guide listing the top schemes with documents and steps.
#[derive(Debug, Clone)]
pub struct PlainTextGuide {
    max_schemes: usize,
    max_steps: usize,
    generated_on: Option<NaiveDate>,
}

impl Default for PlainTextGuide {
    fn default() -> Self {
        Self {
            max_schemes: 3,
            max_steps: 4,
            generated_on: None,
        }
    }
}

impl PlainTextGuide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_schemes(mut self, max_schemes: usize) -> Self {
        self.max_schemes = max_schemes;
        self
    }

    /// Pins the footer date instead of using today's.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    fn compose(
        &self,
        profile: &Profile,
        matches: &[MatchResult],
    ) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "Eligibility & Application Guide")?;
        writeln!(out, "===============================")?;

        for field in SUMMARY_FIELDS {
            let value = profile.get(field.key());
            if value.is_known() {
                writeln!(out, "{}: {}", capitalize(field.key()), value)?;
            }
        }
        writeln!(out)?;

        if matches.is_empty() {
            writeln!(out, "No schemes matched the details provided.")?;
        }

        for result in matches.iter().take(self.max_schemes) {
            let scheme = &result.scheme;
            writeln!(out, "* {}", scheme.scheme_name)?;
            if let Some(benefits) = &scheme.benefits {
                writeln!(out, "  Benefits: {benefits}")?;
            }
            if !scheme.documents_required.is_empty() {
                writeln!(out, "  Docs: {}", scheme.documents_required.join(", "))?;
            }
            if !scheme.application_steps.is_empty() {
                writeln!(out, "  Steps:")?;
                for step in scheme.application_steps.iter().take(self.max_steps) {
                    writeln!(out, "    - {step}")?;
                }
            }
            if let Some(url) = &scheme.official_url {
                writeln!(out, "  Official: {url}")?;
            }
            writeln!(out)?;
        }

        let date = self
            .generated_on
            .unwrap_or_else(|| Local::now().date_naive());
        write!(out, "Generated on {date}")?;
        Ok(out)
    }
}

impl GuideRenderer for PlainTextGuide {
    fn render(
        &self,
        profile: &Profile,
        matches: &[MatchResult],
        language: &str,
    ) -> Result<GuideArtifact, GuideError> {
        let text = self.compose(profile, matches)?;
        Ok(GuideArtifact {
            content_type: "text/plain; charset=utf-8",
            file_name: format!("eligibility-guide-{language}.txt"),
            bytes: text.into_bytes(),
        })
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::Scheme;

    fn result(id: &str, steps: usize) -> MatchResult {
        let mut scheme = Scheme::new(id, format!("Scheme {id}"));
        scheme.benefits = Some("Cash support".to_string());
        scheme.documents_required = vec!["Aadhaar card".to_string(), "Bank passbook".to_string()];
        scheme.application_steps = (1..=steps).map(|n| format!("Step {n}")).collect();
        scheme.official_url = Some(format!("https://example.gov.in/{id}"));
        MatchResult {
            scheme,
            reasons: Vec::new(),
            score: 0,
        }
    }

    fn render(matches: &[MatchResult]) -> String {
        let profile = Profile::new()
            .with("state", "WB")
            .with("occupation", "farmer")
            .with("annual_income", 40_000_i64);
        let artifact = PlainTextGuide::new()
            .with_date(NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date"))
            .render(&profile, matches, "en")
            .expect("guide renders");
        assert_eq!(artifact.file_name, "eligibility-guide-en.txt");
        String::from_utf8(artifact.bytes).expect("utf8 guide")
    }

    #[test]
    fn guide_lists_top_three_schemes_and_four_steps() {
        let matches: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|id| result(id, 6))
            .collect();

        let text = render(&matches);

        assert!(text.starts_with("Eligibility & Application Guide"));
        assert!(text.contains("State: WB"));
        assert!(text.contains("Annual_income: 40000"));
        assert!(!text.contains("District:"));
        assert!(text.contains("* Scheme c"));
        assert!(!text.contains("* Scheme d"));
        assert!(text.contains("- Step 4"));
        assert!(!text.contains("- Step 5"));
        assert!(text.contains("Docs: Aadhaar card, Bank passbook"));
        assert!(text.ends_with("Generated on 2025-01-15"));
    }

    #[test]
    fn guide_notes_when_nothing_matched() {
        let text = render(&[]);
        assert!(text.contains("No schemes matched"));
    }
}
