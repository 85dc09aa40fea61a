use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompts::{Language, PromptCatalog, PromptKey};
use super::stage::{transition, InputClass, IntakeStage};
use crate::config::IntakeConfig;
use crate::eligibility::{
    normalize_region, EligibilityEngine, FieldValue, KnownField, MatchResult, Profile,
    ALL_REGIONS,
};

/// Collaborators a session needs to answer one turn.
pub struct TurnContext<'a> {
    pub engine: &'a EligibilityEngine,
    pub prompts: &'a PromptCatalog,
    pub default_region: Option<&'a str>,
    pub results_limit: usize,
}

/// Most recent evaluation, kept past the end of its episode so a guide can be
/// produced on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeOutcome {
    pub profile: Profile,
    pub region: String,
    pub language: Language,
    pub matches: Vec<MatchResult>,
    pub guide_requested: bool,
    pub evaluated_at: DateTime<Utc>,
}

/// Per-identity conversation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub identity: String,
    pub language: Language,
    pub stage: IntakeStage,
    pub partial_profile: Profile,
    /// Whether the language menu has been shown in the current episode.
    pub language_prompted: bool,
    pub episode: u32,
    pub last_outcome: Option<IntakeOutcome>,
    pub updated_at: DateTime<Utc>,
}

struct Step {
    class: InputClass,
    preface: Vec<String>,
    announce_next: bool,
}

impl Step {
    fn answer() -> Self {
        Self {
            class: InputClass::Answer,
            preface: Vec::new(),
            announce_next: true,
        }
    }

    fn classed(class: InputClass) -> Self {
        Self {
            class,
            ..Self::answer()
        }
    }
}

impl ConversationSession {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            language: Language::default(),
            stage: IntakeStage::default(),
            partial_profile: Profile::new(),
            language_prompted: false,
            episode: 1,
            last_outcome: None,
            updated_at: Utc::now(),
        }
    }

    /// Consumes one inbound message and returns the reply text.
    ///
    /// Never fails: unparseable answers degrade to `false` or an unknown value
    /// and the conversation keeps moving.
    pub fn handle_turn(&mut self, raw: &str, ctx: &TurnContext<'_>) -> String {
        let step = match self.stage {
            IntakeStage::LanguageSelect => self.on_language(raw),
            IntakeStage::Occupation => self.on_occupation(raw),
            IntakeStage::LandOwnership => self.on_land_ownership(raw),
            IntakeStage::Income => self.on_income(raw),
            IntakeStage::RationCard => self.on_ration_card(raw, ctx),
            IntakeStage::Results => self.on_results(raw, ctx),
        };

        let previous = self.stage;
        let next = transition(previous, step.class);
        debug!(
            identity = %self.identity,
            from = previous.label(),
            to = next.label(),
            input = ?step.class,
            "intake turn"
        );

        if previous == IntakeStage::Results && next == IntakeStage::LanguageSelect {
            self.start_next_episode();
        }
        self.stage = next;
        self.updated_at = Utc::now();

        let mut parts = step.preface;
        if step.announce_next {
            parts.push(ctx.prompts.text(self.language, entry_prompt(next)).to_string());
        }
        parts.join("\n\n")
    }

    fn start_next_episode(&mut self) {
        self.partial_profile = Profile::new();
        self.language_prompted = false;
        self.episode += 1;
    }

    fn on_language(&mut self, raw: &str) -> Step {
        match Language::from_choice(raw) {
            Some(language) => {
                self.language = language;
                Step::answer()
            }
            None if !self.language_prompted => {
                self.language_prompted = true;
                Step::classed(InputClass::FirstContact)
            }
            None => {
                self.language = Language::default();
                Step::answer()
            }
        }
    }

    fn on_occupation(&mut self, raw: &str) -> Step {
        let occupation = raw.trim().to_lowercase();
        if occupation.is_empty() {
            return Step::classed(InputClass::Blank);
        }

        let class = if occupation == "farmer" {
            InputClass::Farmer
        } else {
            InputClass::NonFarmer
        };
        self.partial_profile
            .record(KnownField::Occupation.key(), occupation);
        Step::classed(class)
    }

    fn on_land_ownership(&mut self, raw: &str) -> Step {
        self.partial_profile
            .record(KnownField::LandOwned.key(), is_affirmative(raw));
        Step::answer()
    }

    fn on_income(&mut self, raw: &str) -> Step {
        let income = parse_income(raw);
        if income.is_none() {
            // The flow moves on; income stays unknown rather than being asked again.
            info!(identity = %self.identity, "income not understood, continuing without it");
        }
        self.partial_profile.record(
            KnownField::AnnualIncome.key(),
            income.map(FieldValue::Integer).unwrap_or(FieldValue::Unknown),
        );
        Step::answer()
    }

    fn on_ration_card(&mut self, raw: &str, ctx: &TurnContext<'_>) -> Step {
        self.partial_profile
            .record(KnownField::HasRationCard.key(), is_affirmative(raw));

        let profile = self.partial_profile.clone();
        let region = normalize_region(
            profile
                .region()
                .or(ctx.default_region)
                .unwrap_or(ALL_REGIONS),
        );
        let matches = ctx.engine.find_matches(&profile, &region);

        info!(
            identity = %self.identity,
            episode = self.episode,
            %region,
            matches = matches.len(),
            "intake profile evaluated"
        );

        if matches.is_empty() {
            return Step {
                class: InputClass::NoMatches,
                preface: vec![ctx
                    .prompts
                    .text(self.language, PromptKey::NoMatches)
                    .to_string()],
                announce_next: true,
            };
        }

        let mut listing = ctx
            .prompts
            .text(self.language, PromptKey::ResultsHeader)
            .to_string();
        let listed = ctx.results_limit.min(IntakeConfig::MAX_RESULTS_LIMIT);
        for (index, result) in matches.iter().take(listed).enumerate() {
            listing.push_str(&format!("\n{}. {}", index + 1, result.scheme.scheme_name));
        }

        self.last_outcome = Some(IntakeOutcome {
            profile,
            region,
            language: self.language,
            matches,
            guide_requested: false,
            evaluated_at: Utc::now(),
        });

        Step {
            class: InputClass::MatchesFound,
            preface: vec![listing],
            announce_next: true,
        }
    }

    fn on_results(&mut self, raw: &str, ctx: &TurnContext<'_>) -> Step {
        let key = if raw.trim() == "1" {
            if let Some(outcome) = self.last_outcome.as_mut() {
                outcome.guide_requested = true;
            }
            PromptKey::GuideReady
        } else {
            PromptKey::Goodbye
        };

        Step {
            class: InputClass::Answer,
            preface: vec![ctx.prompts.text(self.language, key).to_string()],
            announce_next: false,
        }
    }
}

fn entry_prompt(stage: IntakeStage) -> PromptKey {
    match stage {
        IntakeStage::LanguageSelect => PromptKey::LanguageMenu,
        IntakeStage::Occupation => PromptKey::AskOccupation,
        IntakeStage::LandOwnership => PromptKey::AskLandOwnership,
        IntakeStage::Income => PromptKey::AskIncome,
        IntakeStage::RationCard => PromptKey::AskRationCard,
        IntakeStage::Results => PromptKey::ResultsFooter,
    }
}

const AFFIRMATIVE_PREFIXES: [&str; 6] = ["y", "ha", "ho", "हाँ", "हां", "হ্যাঁ"];

/// `true` for replies that start with an affirmative token; anything else is `false`.
pub fn is_affirmative(raw: &str) -> bool {
    let answer = raw.trim().to_lowercase();
    answer == "1"
        || AFFIRMATIVE_PREFIXES
            .iter()
            .any(|prefix| answer.starts_with(prefix))
}

/// Parses an amount such as `40,000`, `₹ 1,20,000` or `Rs. 5000`.
pub fn parse_income(raw: &str) -> Option<i64> {
    let lowered = raw.trim().to_lowercase();
    let amount = lowered
        .strip_prefix('₹')
        .or_else(|| lowered.strip_prefix("rs."))
        .or_else(|| lowered.strip_prefix("rs"))
        .unwrap_or(&lowered);

    let digits: String = amount
        .chars()
        .filter(|ch| !matches!(ch, ',' | '_') && !ch.is_whitespace())
        .collect();

    digits.parse::<i64>().ok().filter(|value| *value >= 0)
}
