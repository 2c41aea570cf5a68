use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::workflows::guidance::aps::ApsProjection;
use crate::workflows::guidance::domain::{
    BursaryDefinition, CareerCategory, CareerOption, MathType, StudentProfile, UniversityOffering,
    UrgencyTier,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn subjects(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Core-maths learner whose six marks score an APS of 34 (37 projected in Grade 11).
pub(super) fn learner(grade: u8) -> StudentProfile {
    let marks: BTreeMap<String, f64> = [
        ("Mathematics", 75.0),
        ("Physical Sciences", 68.0),
        ("English Home Language", 72.0),
        ("Life Sciences", 65.0),
        ("Life Orientation", 80.0),
        ("Afrikaans First Additional Language", 60.0),
    ]
    .into_iter()
    .map(|(subject, mark)| (subject.to_string(), mark))
    .collect();

    StudentProfile {
        grade,
        math_type: MathType::PureMath,
        math_mark: Some(75.0),
        subjects: marks.keys().cloned().collect(),
        marks,
        budget_limit: None,
        location_preference: "anywhere".to_string(),
        dislikes: BTreeSet::new(),
        household_income: None,
        knows_about_nsfas: true,
        has_written_nbt: true,
        career_interest_text: None,
        first_generation: false,
    }
}

pub(super) fn offering(
    university: &str,
    min_aps: u32,
    annual_cost: f64,
    province: &str,
) -> UniversityOffering {
    UniversityOffering {
        university: university.to_string(),
        min_aps,
        annual_cost,
        province: province.to_string(),
    }
}

/// Career with no entry requirements and a single affordable Gauteng offering.
pub(super) fn open_career(id: &str, category: CareerCategory) -> CareerOption {
    CareerOption {
        id: id.to_string(),
        name: format!("Career {id}"),
        category,
        requires_core_math: false,
        min_math_mark: None,
        requires_physical_science: false,
        min_english_mark: None,
        required_subjects: BTreeSet::new(),
        requires_public_speaking: false,
        requires_nbt: false,
        universities: vec![offering("University of Johannesburg", 20, 30_000.0, "Gauteng")],
        bursaries: Vec::new(),
        tvet_alternative: None,
    }
}

pub(super) fn core_math_career(id: &str) -> CareerOption {
    CareerOption {
        requires_core_math: true,
        min_math_mark: Some(70.0),
        tvet_alternative: Some("N6 Engineering Studies".to_string()),
        ..open_career(id, CareerCategory::Engineering)
    }
}

pub(super) fn bursary(name: &str) -> BursaryDefinition {
    BursaryDefinition {
        name: name.to_string(),
        amount: "R50 000 per year".to_string(),
        min_aps: None,
        income_ceiling: None,
        subject_bonus: None,
        fields: BTreeSet::new(),
        deadline: None,
        urgency: UrgencyTier::Medium,
    }
}

pub(super) fn projection(min: u32, max: u32) -> ApsProjection {
    ApsProjection { min, max }
}
