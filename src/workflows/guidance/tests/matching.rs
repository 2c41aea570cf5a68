use std::collections::BTreeSet;

use proptest::prelude::*;

use super::common::*;
use crate::workflows::guidance::admission::Feasibility;
use crate::workflows::guidance::config::RecommendationConfig;
use crate::workflows::guidance::domain::{
    BursaryDefinition, CareerCategory, CareerOption, SubjectBonus, UrgencyTier,
};
use crate::workflows::guidance::matching::{BursaryMatcher, ProgramMatcher};

fn tags(categories: &[CareerCategory]) -> BTreeSet<CareerCategory> {
    categories.iter().copied().collect()
}

fn engineering_with_requirements(requirements: &[u32]) -> CareerOption {
    CareerOption {
        universities: requirements
            .iter()
            .enumerate()
            .map(|(index, min_aps)| {
                offering(&format!("University {index}"), *min_aps, 50_000.0, "Gauteng")
            })
            .collect(),
        ..open_career("eng", CareerCategory::Engineering)
    }
}

#[test]
fn programs_are_ranked_by_admission_probability_and_capped() {
    let career = engineering_with_requirements(&[45, 30, 43, 38, 35, 40]);

    let ranked = ProgramMatcher::default().rank(
        [&career],
        &tags(&[CareerCategory::Engineering]),
        projection(35, 40),
    );

    let probabilities: Vec<u8> = ranked
        .iter()
        .map(|program| program.admission_probability)
        .collect();
    assert_eq!(probabilities, vec![95, 85, 70, 50, 25]);
    assert_eq!(ranked[0].required_aps, 30);
    assert_eq!(ranked[0].feasibility, Feasibility::High);
    assert_eq!(ranked[3].feasibility, Feasibility::Medium);
    assert_eq!(ranked[4].feasibility, Feasibility::Challenging);
}

#[test]
fn programs_outside_interest_categories_are_skipped() {
    let engineering = open_career("eng", CareerCategory::Engineering);
    let business = open_career("biz", CareerCategory::Business);
    let law = open_career("law", CareerCategory::Law);
    let careers = [&engineering, &business, &law];
    let matcher = ProgramMatcher::default();

    let ranked = matcher.rank(careers, &tags(&[CareerCategory::Law]), projection(30, 32));
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].career_id, "law");

    // No recognised interests falls back to engineering, business and technology.
    let ranked = matcher.rank(careers, &BTreeSet::new(), projection(30, 32));
    let ids: BTreeSet<&str> = ranked.iter().map(|program| program.career_id.as_str()).collect();
    assert_eq!(ids, ["biz", "eng"].into_iter().collect());
}

#[test]
fn minimum_probability_is_configurable() {
    let career = engineering_with_requirements(&[30, 40]);
    let config = RecommendationConfig {
        min_admission_probability: 50,
        ..RecommendationConfig::default()
    };

    let ranked = ProgramMatcher::new(&config).rank(
        [&career],
        &tags(&[CareerCategory::Engineering]),
        projection(20, 25),
    );
    assert!(ranked.is_empty());

    let ranked = ProgramMatcher::default().rank(
        [&career],
        &tags(&[CareerCategory::Engineering]),
        projection(20, 25),
    );
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|program| program.admission_probability == 10));
}

fn engineering_bursary() -> BursaryDefinition {
    BursaryDefinition {
        min_aps: Some(30),
        income_ceiling: Some(400_000.0),
        subject_bonus: Some(SubjectBonus {
            subjects: vec!["Mathematics".to_string(), "Physical Sciences".to_string()],
            min_mark: 65.0,
        }),
        fields: tags(&[CareerCategory::Engineering]),
        ..bursary("Engineering Futures Bursary")
    }
}

#[test]
fn bursary_score_accumulates_and_is_capped() {
    let matcher = BursaryMatcher::default();
    let mut student = learner(11);
    student.household_income = Some(100_000.0);

    let (score, reasons) = matcher.score(
        &engineering_bursary(),
        &student,
        projection(34, 37),
        &tags(&[CareerCategory::Engineering]),
    );
    assert_eq!(score, 100);
    assert_eq!(reasons.len(), 4);

    let (score, _) = matcher.score(
        &engineering_bursary(),
        &learner(11),
        projection(34, 37),
        &BTreeSet::new(),
    );
    // APS and subject bonus only.
    assert_eq!(score, 70);
}

#[test]
fn first_generation_counts_as_financial_need() {
    let matcher = BursaryMatcher::default();
    let definition = BursaryDefinition {
        min_aps: Some(45),
        ..bursary("Opportunity Fund")
    };

    let (score, _) = matcher.score(&definition, &learner(12), projection(35, 36), &BTreeSet::new());
    assert_eq!(score, 0);

    let mut student = learner(12);
    student.first_generation = true;
    let (score, reasons) = matcher.score(&definition, &student, projection(35, 36), &BTreeSet::new());
    assert_eq!(score, 40);
    assert_eq!(reasons, vec!["first-generation student".to_string()]);
}

#[test]
fn bursaries_below_threshold_are_excluded_and_top_three_kept() {
    let today = date(2026, 3, 1);
    let out_of_reach = BursaryDefinition {
        min_aps: Some(42),
        income_ceiling: Some(50_000.0),
        ..bursary("Out Of Reach Award")
    };
    let urgent = BursaryDefinition {
        deadline: Some(date(2026, 3, 31)),
        urgency: UrgencyTier::Critical,
        ..engineering_bursary()
    };
    let definitions = vec![
        out_of_reach,
        bursary("Zulu Community Trust"),
        bursary("Alpha Scholarship"),
        bursary("Midlands Fund"),
        urgent,
    ];

    let mut student = learner(11);
    student.household_income = Some(100_000.0);
    let ranked = BursaryMatcher::default().rank(
        &definitions,
        &student,
        projection(34, 37),
        &tags(&[CareerCategory::Engineering]),
        today,
    );

    let names: Vec<&str> = ranked.iter().map(|matched| matched.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Engineering Futures Bursary", "Alpha Scholarship", "Midlands Fund"]
    );
    assert_eq!(ranked[0].days_until_deadline, Some(30));
    assert_eq!(ranked[0].urgency, UrgencyTier::Critical);
    assert!(ranked.iter().all(|matched| matched.score >= 30));
    assert!(!names.contains(&"Out Of Reach Award"));
    assert_eq!(ranked[1].days_until_deadline, None);
}

#[test]
fn closed_bursaries_are_not_ranked() {
    let today = date(2026, 10, 19);
    let closed = BursaryDefinition {
        deadline: Some(date(2026, 9, 30)),
        ..bursary("Closed Fund")
    };
    let closing_today = BursaryDefinition {
        deadline: Some(today),
        ..bursary("Last Day Fund")
    };
    let student = learner(12);

    let ranked = BursaryMatcher::default().rank(
        &[closed, closing_today, bursary("Rolling Fund")],
        &student,
        projection(34, 35),
        &BTreeSet::new(),
        today,
    );

    let names: Vec<&str> = ranked.iter().map(|matched| matched.name.as_str()).collect();
    assert_eq!(names, vec!["Last Day Fund", "Rolling Fund"]);
    assert_eq!(ranked[0].days_until_deadline, Some(0));
    assert!(ranked
        .iter()
        .all(|matched| matched.days_until_deadline.map_or(true, |days| days >= 0)));
}

proptest! {
    #[test]
    fn bursary_score_stays_within_bounds(
        min_aps in proptest::option::of(0u32..50),
        ceiling in proptest::option::of(0.0f64..1_000_000.0),
        income in proptest::option::of(0.0f64..1_000_000.0),
        math in 0.0f64..100.0,
        aps_max in 0u32..43,
        first_generation in any::<bool>(),
        aligned in any::<bool>(),
    ) {
        let definition = BursaryDefinition {
            min_aps,
            income_ceiling: ceiling,
            ..engineering_bursary()
        };
        let mut student = learner(12);
        student.household_income = income;
        student.first_generation = first_generation;
        student.marks.insert("Mathematics".to_string(), math);
        let interests = if aligned {
            tags(&[CareerCategory::Engineering])
        } else {
            BTreeSet::new()
        };

        let matcher = BursaryMatcher::default();
        let (score, _) = matcher.score(&definition, &student, projection(aps_max, aps_max), &interests);
        prop_assert!(score <= 100);

        let ranked = matcher.rank(
            std::slice::from_ref(&definition),
            &student,
            projection(aps_max, aps_max),
            &interests,
            date(2026, 1, 1),
        );
        prop_assert_eq!(ranked.len(), usize::from(score >= 30));
    }
}
