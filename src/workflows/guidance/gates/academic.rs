use super::super::aps::{compute_aps, project_final_aps};
use super::super::domain::{CareerOption, Gate, GateVerdict, MathType, StudentProfile};

/// Mathematics shortfall (percentage points) beyond which a career is blocked.
pub const MATH_GAP_LIMIT: f64 = 15.0;

/// English shortfall (percentage points) beyond which a career is blocked.
pub const ENGLISH_GAP_LIMIT: f64 = 20.0;

const PHYSICAL_SCIENCES: &str = "Physical Sciences";
const LIFE_SCIENCES: &str = "Life Sciences";

/// Careers still reachable from subjects a learner already takes.
const SUBJECT_PATHWAYS: &[(&str, &[&str])] = &[
    (LIFE_SCIENCES, &["Nursing", "Environmental Health", "Agricultural Sciences"]),
    ("Accounting", &["Accounting", "Financial Management"]),
    ("Business Studies", &["Business Management", "Marketing"]),
    ("Economics", &["Economics", "Banking"]),
    ("Information Technology", &["Software Development", "IT Support"]),
    ("Computer Applications Technology", &["Office Administration", "IT Support"]),
    ("Geography", &["Town and Regional Planning", "Tourism Management"]),
    ("History", &["Law", "Journalism"]),
    ("Visual Arts", &["Graphic Design", "Fine Art"]),
    ("Consumer Studies", &["Hospitality Management", "Food Technology"]),
];

const FALLBACK_PATHWAY: &str = "Humanities and Social Sciences degrees";

pub(super) fn math(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if student.math_type == MathType::MathLiteracy && career.requires_core_math {
        let fixable = student.grade == 10;
        let mut verdict = GateVerdict::block(
            Gate::Math,
            format!(
                "{} requires {}; {} is not accepted",
                career.name,
                MathType::PureMath.label(),
                MathType::MathLiteracy.label()
            ),
            fixable,
        );
        if fixable {
            verdict = verdict
                .with_alternatives(["Switch to Mathematics before Grade 11"])
                .with_deadline_hint("Subject changes close at the end of Grade 10");
        }
        return verdict.with_alternatives(career.tvet_alternative.iter().cloned());
    }

    let (Some(required), Some(mark)) = (career.min_math_mark, student.math_mark()) else {
        return GateVerdict::pass(Gate::Math);
    };

    let gap = required - mark;
    if gap <= 0.0 {
        return GateVerdict::pass(Gate::Math);
    }

    if gap > MATH_GAP_LIMIT {
        GateVerdict::block(
            Gate::Math,
            format!(
                "Mathematics mark of {mark:.0}% is {gap:.0} points below the {required:.0}% {} requires",
                career.name
            ),
            true,
        )
        .with_gap(gap)
        .with_alternatives(["Mathematics tuition or winter school", "Supplementary examination"])
        .with_alternatives(career.tvet_alternative.iter().cloned())
    } else {
        GateVerdict::warn(
            Gate::Math,
            format!(
                "Mathematics mark of {mark:.0}% is {gap:.0} points short of {required:.0}%; close the gap before finals"
            ),
        )
        .with_gap(gap)
    }
}

pub(super) fn science(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if !career.requires_physical_science || student.has_subject(PHYSICAL_SCIENCES) {
        return GateVerdict::pass(Gate::Science);
    }

    let fixable = student.grade == 10;
    let mut verdict = GateVerdict::block(
        Gate::Science,
        format!("{} requires {PHYSICAL_SCIENCES}", career.name),
        fixable,
    );

    if fixable {
        verdict = verdict
            .with_alternatives([format!("Add {PHYSICAL_SCIENCES} before Grade 11")])
            .with_deadline_hint("Subject changes close at the end of Grade 10");
    }

    if student.has_subject(LIFE_SCIENCES) {
        verdict.with_alternatives(["Nursing", "Biological Sciences", "Environmental Health"])
    } else {
        verdict
            .with_alternatives(["University extended science programme"])
            .with_alternatives(career.tvet_alternative.iter().cloned())
    }
}

pub(super) fn aps(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if student.grade < 11 {
        return GateVerdict::pass(Gate::Aps);
    }

    let marks: Vec<f64> = student.valid_marks().map(|(_, mark)| mark).collect();
    if marks.is_empty() {
        return GateVerdict::pass(Gate::Aps);
    }

    let projection = project_final_aps(compute_aps(marks), student.grade);
    let (met, unmet): (Vec<_>, Vec<_>) = career
        .universities
        .iter()
        .partition(|offering| projection.max >= offering.min_aps);

    let Some(lowest) = unmet.iter().min_by_key(|offering| offering.min_aps) else {
        return GateVerdict::pass(Gate::Aps);
    };

    if met.is_empty() {
        let gap = lowest.min_aps.saturating_sub(projection.max);
        return GateVerdict::block(
            Gate::Aps,
            format!(
                "Projected APS of {} is {gap} below the lowest requirement for {} ({} at {})",
                projection.max, career.name, lowest.min_aps, lowest.university
            ),
            student.grade < 12,
        )
        .with_gap(gap as f64)
        .with_alternatives(["Extended degree programme", "Higher Certificate bridging route"])
        .with_alternatives(career.tvet_alternative.iter().cloned());
    }

    let qualifying: Vec<String> = met
        .iter()
        .map(|offering| offering.university.clone())
        .collect();
    GateVerdict::inform(
        Gate::Aps,
        format!(
            "Projected APS of {} meets the requirement at {} of {} universities",
            projection.max,
            met.len(),
            career.universities.len()
        ),
    )
    .with_alternatives(qualifying)
}

pub(super) fn deadline(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if student.grade <= 10 {
        return GateVerdict::pass(Gate::Deadline);
    }

    let missing: Vec<&str> = career
        .required_subjects
        .iter()
        .map(String::as_str)
        .filter(|subject| !student.has_subject(subject))
        .collect();
    if missing.is_empty() {
        return GateVerdict::pass(Gate::Deadline);
    }

    GateVerdict::block(
        Gate::Deadline,
        format!(
            "{} requires {}, and subject changes closed after Grade 10",
            career.name,
            missing.join(", ")
        ),
        false,
    )
    .with_alternatives(reachable_careers(student))
    .with_alternatives(career.tvet_alternative.iter().cloned())
}

fn reachable_careers(student: &StudentProfile) -> Vec<String> {
    let mut careers: Vec<String> = Vec::new();
    for (subject, pathways) in SUBJECT_PATHWAYS {
        if !student.has_subject(subject) {
            continue;
        }
        for pathway in pathways.iter() {
            if !careers.iter().any(|existing| existing.as_str() == *pathway) {
                careers.push(pathway.to_string());
            }
        }
    }

    if careers.is_empty() {
        careers.push(FALLBACK_PATHWAY.to_string());
    }
    careers
}

pub(super) fn nbt(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    if !career.requires_nbt || student.has_written_nbt {
        return GateVerdict::pass(Gate::Nbt);
    }

    if student.grade >= 12 {
        GateVerdict::warn(
            Gate::Nbt,
            format!("{} applications require National Benchmark Test results", career.name),
        )
        .with_deadline_hint("Book an NBT sitting now; results are needed before application deadlines")
    } else {
        GateVerdict::inform(
            Gate::Nbt,
            format!("{} applications will require the National Benchmark Test in Grade 12", career.name),
        )
    }
}

pub(super) fn language(student: &StudentProfile, career: &CareerOption) -> GateVerdict {
    let (Some(required), Some(mark)) = (career.min_english_mark, student.english_mark()) else {
        return GateVerdict::pass(Gate::Language);
    };

    let gap = required - mark;
    if gap <= 0.0 {
        return GateVerdict::pass(Gate::Language);
    }

    if gap > ENGLISH_GAP_LIMIT {
        GateVerdict::block(
            Gate::Language,
            format!(
                "English mark of {mark:.0}% is {gap:.0} points below the {required:.0}% {} requires",
                career.name
            ),
            true,
        )
        .with_gap(gap)
        .with_alternatives(["Academic literacy short course"])
    } else {
        GateVerdict::warn(
            Gate::Language,
            format!("English mark of {mark:.0}% is {gap:.0} points short of {required:.0}%"),
        )
        .with_gap(gap)
    }
}
