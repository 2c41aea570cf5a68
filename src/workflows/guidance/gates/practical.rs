use std::collections::BTreeSet;

use super::super::domain::{
    format_rand, BudgetLimit, CareerCategory, CareerOption, Gate, GateVerdict, StudentProfile,
    NSFAS_INCOME_CEILING,
};

/// Mean annual cost above which a low budget is considered stretched.
pub const BUDGET_MEAN_COST_LIMIT: f64 = 40_000.0;

/// Suggested regardless of which mismatch fired.
const MISMATCH_ALTERNATIVES: [&str; 3] = [
    "Biomedical Engineering",
    "Health Informatics",
    "Pharmacology Research",
];

pub(super) fn budget(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if student.budget_limit != Some(BudgetLimit::Low) || career.universities.is_empty() {
        return GateVerdict::pass(Gate::Budget);
    }

    let total: f64 = career
        .universities
        .iter()
        .map(|offering| offering.annual_cost)
        .sum();
    let mean = total / career.universities.len() as f64;
    if mean <= BUDGET_MEAN_COST_LIMIT || !career.bursaries.is_empty() {
        return GateVerdict::pass(Gate::Budget);
    }

    // Soft warning only: cost never removes a career from the eligible set.
    GateVerdict::warn(
        Gate::Budget,
        format!(
            "{} averages {} a year with no listed bursaries. You may qualify for NSFAS if household income is at or below {}.",
            career.name,
            format_rand(mean),
            format_rand(NSFAS_INCOME_CEILING)
        ),
    )
    .with_alternatives(["TVET college pathway", "Distance learning (UNISA)"])
    .with_alternatives(career.tvet_alternative.iter().cloned())
}

pub(super) fn funding_awareness(student: &StudentProfile, _career: &CareerOption) -> GateVerdict {
    if student.knows_about_nsfas || !student.income_within(NSFAS_INCOME_CEILING) {
        return GateVerdict::pass(Gate::FundingAwareness);
    }

    let reason = "Household income qualifies for NSFAS, which covers tuition, accommodation and a living allowance";
    let verdict = if student.grade >= 12 {
        GateVerdict::warn(Gate::FundingAwareness, reason)
    } else {
        GateVerdict::inform(Gate::FundingAwareness, reason)
    };

    verdict
        .with_alternatives(["Apply for NSFAS"])
        .with_deadline_hint("NSFAS applications open in September and close in January")
}

pub(super) fn category_mismatch(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if career.category == CareerCategory::Healthcare && student.dislikes_match("blood") {
        return GateVerdict::block(
            Gate::CategoryMismatch,
            format!("{} involves regular contact with blood", career.name),
            false,
        )
        .with_alternatives(MISMATCH_ALTERNATIVES);
    }

    if career.requires_public_speaking && student.dislikes_match("public speaking") {
        return GateVerdict::warn(
            Gate::CategoryMismatch,
            format!("{} involves frequent public speaking", career.name),
        )
        .with_alternatives(MISMATCH_ALTERNATIVES);
    }

    if student.dislikes_match(career.category.label()) {
        return GateVerdict::warn(
            Gate::CategoryMismatch,
            format!(
                "{} is listed among your dislikes",
                career.category.label()
            ),
        )
        .with_alternatives(MISMATCH_ALTERNATIVES);
    }

    GateVerdict::pass(Gate::CategoryMismatch)
}

pub(super) fn geographic(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if student.prefers_anywhere() || career.universities.is_empty() {
        return GateVerdict::pass(Gate::Geographic);
    }

    let preference = student.location_preference.trim();
    let offered_locally = career
        .universities
        .iter()
        .any(|offering| offering.province.trim().eq_ignore_ascii_case(preference));
    if offered_locally {
        return GateVerdict::pass(Gate::Geographic);
    }

    let provinces: BTreeSet<&str> = career
        .universities
        .iter()
        .map(|offering| offering.province.trim())
        .collect();
    GateVerdict::warn(
        Gate::Geographic,
        format!("{} is not offered at a university in {preference}", career.name),
    )
    .with_alternatives(provinces)
}
