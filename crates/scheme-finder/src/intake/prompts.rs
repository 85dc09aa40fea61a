use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Languages the intake flow can be conducted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "bn")]
    Bengali,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Bengali => "bn",
        }
    }

    /// Maps a menu reply to a language; `None` when the reply is not a choice.
    pub fn from_choice(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "en" | "eng" | "english" => Some(Self::English),
            "2" | "hindi" | "हिंदी" | "हिन्दी" => Some(Self::Hindi),
            "3" | "bn" | "bengali" | "bangla" | "বাংলা" => Some(Self::Bengali),
            _ => None,
        }
    }
}

/// Every piece of text the intake flow sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKey {
    LanguageMenu,
    AskOccupation,
    AskLandOwnership,
    AskIncome,
    AskRationCard,
    NoMatches,
    ResultsHeader,
    ResultsFooter,
    GuideReady,
    Goodbye,
}

/// Prompt text keyed by language, falling back to English.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    entries: HashMap<(Language, PromptKey), String>,
}

impl Default for PromptCatalog {
    fn default() -> Self {
        let mut catalog = Self {
            entries: HashMap::new(),
        };
        for (key, text) in ENGLISH {
            catalog.insert(Language::English, *key, *text);
        }
        for (key, text) in HINDI {
            catalog.insert(Language::Hindi, *key, *text);
        }
        catalog
    }
}

impl PromptCatalog {
    pub fn insert(&mut self, language: Language, key: PromptKey, text: impl Into<String>) {
        self.entries.insert((language, key), text.into());
    }

    pub fn text(&self, language: Language, key: PromptKey) -> &str {
        self.entries
            .get(&(language, key))
            .or_else(|| self.entries.get(&(Language::English, key)))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

const ENGLISH: &[(PromptKey, &str)] = &[
    (
        PromptKey::LanguageMenu,
        "Welcome! I can help you find government schemes you may be eligible for.\nChoose a language:\n1. English\n2. हिंदी\n3. বাংলা",
    ),
    (
        PromptKey::AskOccupation,
        "What is your occupation? (farmer, student, worker, unemployed, self-employed, other)",
    ),
    (PromptKey::AskLandOwnership, "Do you own agricultural land? (yes/no)"),
    (
        PromptKey::AskIncome,
        "What is your annual household income in rupees? (e.g. 40000)",
    ),
    (PromptKey::AskRationCard, "Do you have a ration card? (yes/no)"),
    (
        PromptKey::NoMatches,
        "I could not find a matching scheme yet. Let's try again with a few more details.",
    ),
    (PromptKey::ResultsHeader, "You may be eligible for:"),
    (
        PromptKey::ResultsFooter,
        "Reply 1 to get a detailed guide with documents and steps, or anything else to finish.",
    ),
    (
        PromptKey::GuideReady,
        "Your detailed guide is ready. Ask your helpdesk to download it for this number.",
    ),
    (
        PromptKey::Goodbye,
        "Thank you! Send any message to start again.",
    ),
];

const HINDI: &[(PromptKey, &str)] = &[
    (
        PromptKey::AskOccupation,
        "आपका व्यवसाय क्या है? (farmer, student, worker, unemployed, self-employed, other)",
    ),
    (PromptKey::AskLandOwnership, "क्या आपके पास खेती की ज़मीन है? (हाँ/नहीं)"),
    (PromptKey::AskIncome, "आपकी सालाना पारिवारिक आय कितनी है? (जैसे 40000)"),
    (PromptKey::AskRationCard, "क्या आपके पास राशन कार्ड है? (हाँ/नहीं)"),
    (
        PromptKey::NoMatches,
        "अभी कोई योजना नहीं मिली। कुछ और जानकारी के साथ फिर से कोशिश करते हैं।",
    ),
    (PromptKey::ResultsHeader, "आप इन योजनाओं के पात्र हो सकते हैं:"),
    (
        PromptKey::ResultsFooter,
        "दस्तावेज़ और चरणों की पूरी गाइड के लिए 1 भेजें, या समाप्त करने के लिए कुछ और।",
    ),
    (
        PromptKey::GuideReady,
        "आपकी विस्तृत गाइड तैयार है। इस नंबर के लिए हेल्पडेस्क से डाउनलोड करवाएँ।",
    ),
    (
        PromptKey::Goodbye,
        "धन्यवाद! फिर से शुरू करने के लिए कोई भी संदेश भेजें।",
    ),
];
