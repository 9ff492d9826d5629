use serde::{Deserialize, Serialize};

/// Coarse genre of the source text, used to pick the prompt wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Research,
    News,
    Tutorial,
    General,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Research => "research",
            ContentCategory::News => "news",
            ContentCategory::Tutorial => "tutorial",
            ContentCategory::General => "general",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const RESEARCH_KEYWORDS: &[&str] = &[
    "abstract",
    "methodology",
    "results",
    "conclusion",
    "references",
    "doi:",
    "arxiv",
];
const NEWS_KEYWORDS: &[&str] = &["news", "breaking", "reported", "according to"];
const TUTORIAL_KEYWORDS: &[&str] = &["tutorial", "how to", "step by step", "guide"];

/// Checked in order, first match wins
const VOCABULARIES: &[(ContentCategory, &[&str])] = &[
    (ContentCategory::Research, RESEARCH_KEYWORDS),
    (ContentCategory::News, NEWS_KEYWORDS),
    (ContentCategory::Tutorial, TUTORIAL_KEYWORDS),
];

/// Classify text by case-insensitive keyword matching.
/// Returns `General` when no vocabulary matches.
pub fn classify(text: &str) -> ContentCategory {
    let lowered = text.to_lowercase();

    VOCABULARIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(ContentCategory::General)
}
