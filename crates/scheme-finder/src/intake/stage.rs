use serde::{Deserialize, Serialize};

/// Finite set of stages a conversation moves through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    #[default]
    LanguageSelect,
    Occupation,
    LandOwnership,
    Income,
    RationCard,
    Results,
}

impl IntakeStage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::LanguageSelect,
            Self::Occupation,
            Self::LandOwnership,
            Self::Income,
            Self::RationCard,
            Self::Results,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LanguageSelect => "language_select",
            Self::Occupation => "occupation",
            Self::LandOwnership => "land_ownership",
            Self::Income => "income",
            Self::RationCard => "ration_card",
            Self::Results => "results",
        }
    }
}

/// Classification of an inbound turn, as far as the stage graph cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputClass {
    /// First message of an episode, before the language menu has been shown.
    FirstContact,
    /// An answer the current stage consumed.
    Answer,
    /// Whitespace-only input where free text was required.
    Blank,
    Farmer,
    NonFarmer,
    MatchesFound,
    NoMatches,
}

impl InputClass {
    pub const fn all() -> [Self; 7] {
        [
            Self::FirstContact,
            Self::Answer,
            Self::Blank,
            Self::Farmer,
            Self::NonFarmer,
            Self::MatchesFound,
            Self::NoMatches,
        ]
    }
}

/// The stage graph. Pairs not listed leave the stage where it is.
pub fn transition(stage: IntakeStage, input: InputClass) -> IntakeStage {
    use InputClass::*;
    use IntakeStage::*;

    match (stage, input) {
        (LanguageSelect, FirstContact) => LanguageSelect,
        (LanguageSelect, Answer) => Occupation,
        (Occupation, Farmer) => LandOwnership,
        (Occupation, NonFarmer) => Income,
        (Occupation, Blank) => Occupation,
        (LandOwnership, Answer) => Income,
        (Income, Answer) => RationCard,
        (RationCard, MatchesFound) => Results,
        (RationCard, NoMatches) => Occupation,
        (Results, Answer) => LanguageSelect,
        (unchanged, _) => unchanged,
    }
}
