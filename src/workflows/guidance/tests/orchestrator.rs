use std::collections::BTreeSet;

use super::common::*;
use crate::workflows::guidance::catalog::CareerCatalog;
use crate::workflows::guidance::domain::{
    BudgetLimit, CareerCategory, CareerOption, Gate, MathType, StudentProfile,
};
use crate::workflows::guidance::orchestrator::GateOrchestrator;

fn varied_learners() -> Vec<StudentProfile> {
    let mut literacy = learner(11);
    literacy.math_type = MathType::MathLiteracy;

    let mut squeamish = learner(12);
    squeamish.dislikes = subjects(&["blood", "public speaking"]);
    squeamish.budget_limit = Some(BudgetLimit::Low);
    squeamish.location_preference = "Limpopo".to_string();

    let mut struggling = learner(12);
    struggling.math_mark = Some(45.0);
    struggling.has_written_nbt = false;
    struggling.knows_about_nsfas = false;
    struggling.household_income = Some(80_000.0);
    struggling.subjects.remove("Physical Sciences");

    vec![learner(10), literacy, squeamish, struggling]
}

#[test]
fn standard_orchestrator_runs_all_ten_gates_in_order() {
    let orchestrator = GateOrchestrator::standard();
    assert_eq!(orchestrator.gates(), Gate::ordered().as_slice());

    let verdicts = orchestrator.verdicts(&learner(11), &open_career("x", CareerCategory::Law));
    let gates: Vec<Gate> = verdicts.iter().map(|verdict| verdict.gate).collect();
    assert_eq!(gates, Gate::standard_set());
}

#[test]
fn assessment_blocked_is_the_or_of_every_verdict() {
    let orchestrator = GateOrchestrator::standard();
    let catalog = CareerCatalog::standard();

    for student in varied_learners() {
        for career in &catalog.careers {
            let verdicts = orchestrator.verdicts(&student, career);
            let assessment = orchestrator.evaluate_career(&student, career);

            let any_blocked = verdicts.iter().any(|verdict| verdict.blocked);
            assert_eq!(assessment.blocked, any_blocked, "career {}", career.id);
            assert_eq!(
                assessment.critical_blocks.len(),
                verdicts.iter().filter(|verdict| verdict.blocked).count()
            );
            assert!(assessment
                .warnings
                .iter()
                .all(|warning| !warning.blocked));
        }
    }
}

#[test]
fn custom_gate_list_limits_evaluation() {
    let mut student = learner(11);
    student.math_type = MathType::MathLiteracy;
    let career = core_math_career("mech");

    let budget_only = GateOrchestrator::new(vec![Gate::Budget]);
    let assessment = budget_only.evaluate_career(&student, &career);
    assert!(!assessment.blocked);

    let with_math = GateOrchestrator::new(vec![Gate::Budget, Gate::Math]);
    let assessment = with_math.evaluate_career(&student, &career);
    assert!(assessment.blocked);
    assert_eq!(assessment.block_reasons().len(), 1);
}

#[test]
fn large_catalog_is_partitioned_by_membership() {
    let careers: Vec<CareerOption> = (0..48)
        .map(|index| {
            let id = format!("career-{index:02}");
            if index % 3 == 0 {
                core_math_career(&id)
            } else {
                open_career(&id, CareerCategory::Business)
            }
        })
        .collect();

    let mut student = learner(11);
    student.math_type = MathType::MathLiteracy;

    let filtering = GateOrchestrator::standard().filter_catalog(&student, &careers);

    let expected_blocked: BTreeSet<String> = careers
        .iter()
        .filter(|career| career.requires_core_math)
        .map(|career| career.id.clone())
        .collect();
    let blocked: BTreeSet<String> = filtering
        .blocked
        .iter()
        .map(|assessment| assessment.career_id.clone())
        .collect();
    let eligible: BTreeSet<String> = filtering
        .eligible
        .iter()
        .map(|assessment| assessment.career_id.clone())
        .collect();

    assert_eq!(blocked, expected_blocked);
    assert!(eligible.is_disjoint(&blocked));
    assert_eq!(filtering.summary.total, 48);
    assert_eq!(filtering.summary.blocked, 16);
    assert_eq!(filtering.summary.eligible, 32);
}

#[test]
fn empty_catalog_yields_empty_partition() {
    let filtering = GateOrchestrator::standard().filter_catalog(&learner(12), &[]);
    assert!(filtering.eligible.is_empty());
    assert!(filtering.blocked.is_empty());
    assert_eq!(filtering.summary.total, 0);
}

#[test]
fn informational_verdicts_are_kept_as_notes() {
    let mut student = learner(11);
    student.has_written_nbt = false;
    let career = CareerOption {
        requires_nbt: true,
        ..open_career("law", CareerCategory::Law)
    };

    let assessment = GateOrchestrator::standard().evaluate_career(&student, &career);
    assert!(!assessment.blocked);
    assert!(assessment.warnings.is_empty());
    assert_eq!(assessment.notes.len(), 1);
    assert_eq!(assessment.notes[0].gate, Gate::Nbt);
}
