use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Annual household income (rand) at or below which NSFAS funding applies.
pub const NSFAS_INCOME_CEILING: f64 = 350_000.0;

/// Location preference that disables the geographic gate.
pub const ANYWHERE: &str = "anywhere";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathType {
    PureMath,
    MathLiteracy,
}

impl MathType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PureMath => "Mathematics",
            Self::MathLiteracy => "Mathematical Literacy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLimit {
    Low,
    Medium,
    High,
}

/// Learner snapshot assembled upstream from questionnaire input.
///
/// Marks are normalized on the way in: non-numeric entries and values outside
/// `0..=100` are dropped rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub grade: u8,
    pub math_type: MathType,
    #[serde(default, deserialize_with = "deserialize_optional_mark")]
    pub math_mark: Option<f64>,
    #[serde(default)]
    pub subjects: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_marks")]
    pub marks: BTreeMap<String, f64>,
    #[serde(default)]
    pub budget_limit: Option<BudgetLimit>,
    #[serde(default = "default_location")]
    pub location_preference: String,
    #[serde(default)]
    pub dislikes: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_optional_income")]
    pub household_income: Option<f64>,
    #[serde(default)]
    pub knows_about_nsfas: bool,
    #[serde(default)]
    pub has_written_nbt: bool,
    #[serde(default)]
    pub career_interest_text: Option<String>,
    #[serde(default)]
    pub first_generation: bool,
}

impl StudentProfile {
    /// Marks that fall inside the percentage range, in subject order.
    pub fn valid_marks(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.marks
            .iter()
            .filter(|(_, mark)| is_valid_mark(**mark))
            .map(|(subject, mark)| (subject.as_str(), *mark))
    }

    pub fn has_subject(&self, name: &str) -> bool {
        let needle = name.trim();
        self.subjects
            .iter()
            .any(|subject| subject.trim().eq_ignore_ascii_case(needle))
    }

    /// Highest valid mark recorded for an English subject (home or additional language).
    pub fn english_mark(&self) -> Option<f64> {
        self.valid_marks()
            .filter(|(subject, _)| subject.trim().to_ascii_lowercase().starts_with("english"))
            .map(|(_, mark)| mark)
            .fold(None, |best, mark| match best {
                Some(current) if current >= mark => Some(current),
                _ => Some(mark),
            })
    }

    /// Valid mark for a subject, matched case-insensitively. Mathematics falls
    /// back to `math_mark` when the learner takes core Mathematics.
    pub fn mark_for(&self, subject: &str) -> Option<f64> {
        let needle = subject.trim();
        let recorded = self
            .valid_marks()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(needle))
            .map(|(_, mark)| mark);

        match recorded {
            Some(mark) => Some(mark),
            None if needle.eq_ignore_ascii_case(MathType::PureMath.label())
                && self.math_type == MathType::PureMath =>
            {
                self.math_mark()
            }
            None => None,
        }
    }

    pub fn math_mark(&self) -> Option<f64> {
        self.math_mark.filter(|mark| is_valid_mark(*mark))
    }

    pub fn dislikes_match(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_lowercase();
        self.dislikes
            .iter()
            .any(|dislike| dislike.to_ascii_lowercase().contains(&needle))
    }

    pub fn prefers_anywhere(&self) -> bool {
        let preference = self.location_preference.trim();
        preference.is_empty() || preference.eq_ignore_ascii_case(ANYWHERE)
    }

    /// True when declared household income sits at or below `ceiling`.
    pub fn income_within(&self, ceiling: f64) -> bool {
        self.household_income
            .filter(|income| income.is_finite() && *income >= 0.0)
            .map(|income| income <= ceiling)
            .unwrap_or(false)
    }
}

/// Formats a rand amount with space thousand separators, e.g. `R60 000`.
pub fn format_rand(amount: f64) -> String {
    let whole = amount.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    format!("R{grouped}")
}

pub(crate) fn is_valid_mark(mark: f64) -> bool {
    mark.is_finite() && (0.0..=100.0).contains(&mark)
}

fn default_location() -> String {
    ANYWHERE.to_string()
}

fn mark_from_value(value: &Value) -> Option<f64> {
    let mark = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }?;
    is_valid_mark(mark).then_some(mark)
}

fn deserialize_marks<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(subject, value)| mark_from_value(&value).map(|mark| (subject, mark)))
        .collect())
}

fn deserialize_optional_mark<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(mark_from_value))
}

fn deserialize_optional_income<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| match value {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw
                .trim()
                .replace(|c: char| c == ' ' || c == ',', "")
                .parse::<f64>()
                .ok(),
            _ => None,
        })
        .filter(|income| income.is_finite() && *income >= 0.0))
}

/// Broad career families used for interest matching and bursary alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerCategory {
    Engineering,
    Healthcare,
    Technology,
    Business,
    Law,
    Education,
    Creative,
    Science,
}

impl CareerCategory {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Engineering,
            Self::Healthcare,
            Self::Technology,
            Self::Business,
            Self::Law,
            Self::Education,
            Self::Creative,
            Self::Science,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Healthcare => "Healthcare",
            Self::Technology => "Technology",
            Self::Business => "Business",
            Self::Law => "Law",
            Self::Education => "Education",
            Self::Creative => "Creative",
            Self::Science => "Science",
        }
    }
}

/// Single university offering of a career's qualifying degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityOffering {
    pub university: String,
    pub min_aps: u32,
    pub annual_cost: f64,
    pub province: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerOption {
    pub id: String,
    pub name: String,
    pub category: CareerCategory,
    #[serde(default)]
    pub requires_core_math: bool,
    #[serde(default)]
    pub min_math_mark: Option<f64>,
    #[serde(default)]
    pub requires_physical_science: bool,
    #[serde(default)]
    pub min_english_mark: Option<f64>,
    #[serde(default)]
    pub required_subjects: BTreeSet<String>,
    #[serde(default)]
    pub requires_public_speaking: bool,
    #[serde(default)]
    pub requires_nbt: bool,
    #[serde(default)]
    pub universities: Vec<UniversityOffering>,
    /// Names of catalog bursaries that fund this career.
    #[serde(default)]
    pub bursaries: Vec<String>,
    #[serde(default)]
    pub tvet_alternative: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyTier {
    Info,
    Medium,
    High,
    Critical,
}

impl UrgencyTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Bonus awarded when every listed subject reaches `min_mark`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectBonus {
    pub subjects: Vec<String>,
    pub min_mark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BursaryDefinition {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub min_aps: Option<u32>,
    #[serde(default)]
    pub income_ceiling: Option<f64>,
    #[serde(default)]
    pub subject_bonus: Option<SubjectBonus>,
    #[serde(default)]
    pub fields: BTreeSet<CareerCategory>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub urgency: UrgencyTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Eligibility gates. Each variant is a pure check over (student, career);
/// evaluation lives in the `gates` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    Math,
    Science,
    Aps,
    Budget,
    Deadline,
    Nbt,
    Language,
    FundingAwareness,
    CategoryMismatch,
    Geographic,
}

impl Gate {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Math,
            Self::Science,
            Self::Aps,
            Self::Budget,
            Self::Deadline,
            Self::Nbt,
            Self::Language,
            Self::FundingAwareness,
            Self::CategoryMismatch,
            Self::Geographic,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Math => "Mathematics",
            Self::Science => "Physical Sciences",
            Self::Aps => "Admission Points",
            Self::Budget => "Budget",
            Self::Deadline => "Subject Deadline",
            Self::Nbt => "National Benchmark Test",
            Self::Language => "Language",
            Self::FundingAwareness => "Funding Awareness",
            Self::CategoryMismatch => "Interest Fit",
            Self::Geographic => "Location",
        }
    }
}

/// Outcome of one gate for one (student, career) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub gate: Gate,
    pub blocked: bool,
    pub severity: Severity,
    pub reason: String,
    pub alternatives: Vec<String>,
    /// Only meaningful when `blocked` is set.
    pub fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_hint: Option<String>,
}

impl GateVerdict {
    /// The gate does not apply or the requirement is met.
    pub fn pass(gate: Gate) -> Self {
        Self {
            gate,
            blocked: false,
            severity: Severity::Info,
            reason: String::new(),
            alternatives: Vec::new(),
            fixable: false,
            gap: None,
            deadline_hint: None,
        }
    }

    pub fn block(gate: Gate, reason: impl Into<String>, fixable: bool) -> Self {
        Self {
            blocked: true,
            severity: Severity::Critical,
            reason: reason.into(),
            fixable,
            ..Self::pass(gate)
        }
    }

    pub fn warn(gate: Gate, reason: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            reason: reason.into(),
            ..Self::pass(gate)
        }
    }

    pub fn inform(gate: Gate, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Self::pass(gate)
        }
    }

    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives.extend(alternatives.into_iter().map(Into::into));
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn with_deadline_hint(mut self, hint: impl Into<String>) -> Self {
        self.deadline_hint = Some(hint.into());
        self
    }

    /// Passing verdicts carry no reason; anything else is worth surfacing.
    pub fn is_pass(&self) -> bool {
        !self.blocked && self.severity == Severity::Info && self.reason.is_empty()
    }
}
