//! Keyword tagging of free-text career interest statements.

use std::collections::BTreeSet;

use super::domain::CareerCategory;

/// Keywords shorter than this must match a whole word; longer ones match word prefixes.
const PREFIX_MIN_LEN: usize = 4;

struct KeywordRule {
    category: CareerCategory,
    keywords: &'static [&'static str],
}

// Longer entries are stems so that inflections ("nursing", "scientist", "writer") still match.
const KEYWORD_TABLE: &[KeywordRule] = &[
    KeywordRule {
        category: CareerCategory::Engineering,
        keywords: &[
            "engineer", "build", "construct", "mechanic", "electric", "civil", "machine",
            "robot", "bridge",
        ],
    },
    KeywordRule {
        category: CareerCategory::Healthcare,
        keywords: &[
            "doctor", "nurs", "medic", "health", "hospital", "pharmac", "patient", "heal",
            "dentist", "dental", "physio", "therap", "surgeo", "clinic",
        ],
    },
    KeywordRule {
        category: CareerCategory::Technology,
        keywords: &[
            "comput", "software", "coding", "code", "program", "tech", "data", "ict", "app",
            "apps", "cyber", "web",
        ],
    },
    KeywordRule {
        category: CareerCategory::Business,
        keywords: &[
            "business", "account", "financ", "money", "entrepreneur", "market", "manag",
            "econom", "bank", "invest",
        ],
    },
    KeywordRule {
        category: CareerCategory::Law,
        keywords: &[
            "law", "laws", "lawyer", "attorney", "justice", "legal", "court", "advocat",
        ],
    },
    KeywordRule {
        category: CareerCategory::Education,
        keywords: &["teach", "school", "educat", "tutor", "lectur"],
    },
    KeywordRule {
        category: CareerCategory::Creative,
        keywords: &[
            "art", "arts", "artist", "design", "music", "film", "writ", "author", "media",
            "fashion", "draw", "paint", "photograph", "journalis",
        ],
    },
    KeywordRule {
        category: CareerCategory::Science,
        keywords: &[
            "scien", "research", "lab", "labs", "biolog", "chemi", "physic", "environment",
            "animal", "nature", "geolog", "zoolog", "astronom",
        ],
    },
];

/// Stateless tagger over the static keyword table.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestClassifier;

impl InterestClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Tags that match the statement. Empty when nothing matches.
    pub fn classify(&self, text: &str) -> BTreeSet<CareerCategory> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();

        KEYWORD_TABLE
            .iter()
            .filter(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| words.iter().any(|word| keyword_matches(keyword, word)))
            })
            .map(|rule| rule.category)
            .collect()
    }

    /// Tags for an optional statement; no statement means no tags.
    pub fn classify_optional(&self, text: Option<&str>) -> BTreeSet<CareerCategory> {
        text.map(|text| self.classify(text)).unwrap_or_default()
    }
}

fn keyword_matches(keyword: &str, word: &str) -> bool {
    if keyword.len() < PREFIX_MIN_LEN {
        word == keyword
    } else {
        word.starts_with(keyword)
    }
}
