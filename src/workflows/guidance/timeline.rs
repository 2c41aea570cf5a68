use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{StudentProfile, UrgencyTier, NSFAS_INCOME_CEILING};

/// Month in which Grade 12 final examinations begin.
const FINALS_MONTH: u32 = 11;

/// Most university applications close at the end of September.
const APPLICATIONS_CLOSE: (u32, u32) = (9, 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelinePhase {
    Exploration,
    DecisionYear,
    FinalsPreparation,
    PostFinals,
}

impl TimelinePhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exploration => "Exploration",
            Self::DecisionYear => "Decision Year",
            Self::FinalsPreparation => "Finals Preparation",
            Self::PostFinals => "Post-Finals",
        }
    }

    pub const fn urgency(self) -> UrgencyTier {
        match self {
            Self::Exploration => UrgencyTier::Info,
            Self::DecisionYear => UrgencyTier::Medium,
            Self::FinalsPreparation => UrgencyTier::Critical,
            Self::PostFinals => UrgencyTier::High,
        }
    }

    pub const fn is_matric(self) -> bool {
        matches!(self, Self::FinalsPreparation | Self::PostFinals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineAction {
    pub priority: u8,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_by: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePlan {
    pub phase: TimelinePhase,
    pub phase_label: String,
    pub urgency: UrgencyTier,
    pub actions: Vec<TimelineAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_finals: Option<i64>,
}

/// Derives the learner's planning phase and action list from an injected date.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelinePlanner;

impl TimelinePlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn phase_for(&self, grade: u8, now: NaiveDate) -> TimelinePhase {
        match grade {
            12 => {
                if now.month() >= FINALS_MONTH {
                    TimelinePhase::PostFinals
                } else {
                    TimelinePhase::FinalsPreparation
                }
            }
            11 => TimelinePhase::DecisionYear,
            _ => TimelinePhase::Exploration,
        }
    }

    pub fn plan(&self, student: &StudentProfile, now: NaiveDate) -> TimelinePlan {
        let phase = self.phase_for(student.grade, now);
        let mut steps = phase_actions(phase, now);

        if phase.is_matric() && !student.has_written_nbt {
            steps.push((
                "Register for the National Benchmark Test if your programs require it".to_string(),
                None,
            ));
        }

        if phase.is_matric() && student.income_within(NSFAS_INCOME_CEILING) {
            steps.push((
                "Apply for NSFAS funding before the January closing date".to_string(),
                NaiveDate::from_ymd_opt(now.year() + 1, 1, 31),
            ));
        }

        let actions = steps
            .into_iter()
            .enumerate()
            .map(|(index, (action, due_by))| TimelineAction {
                priority: (index + 1) as u8,
                action,
                due_by,
            })
            .collect();

        let days_until_finals = (phase == TimelinePhase::FinalsPreparation)
            .then(|| NaiveDate::from_ymd_opt(now.year(), FINALS_MONTH, 1))
            .flatten()
            .map(|finals| (finals - now).num_days());

        TimelinePlan {
            phase,
            phase_label: phase.label().to_string(),
            urgency: phase.urgency(),
            actions,
            days_until_finals,
        }
    }
}

fn phase_actions(phase: TimelinePhase, now: NaiveDate) -> Vec<(String, Option<NaiveDate>)> {
    let undated = |action: &str| -> (String, Option<NaiveDate>) { (action.to_string(), None) };

    match phase {
        TimelinePhase::Exploration => vec![
            undated("Confirm your subject choices keep Mathematics and Physical Sciences careers open"),
            undated("Research at least three careers and their university entry requirements"),
            undated("Build steady study habits to lift marks across all subjects"),
        ],
        TimelinePhase::DecisionYear => vec![
            undated("Shortlist universities and record each program's minimum APS"),
            undated("Target any subject below 60% for improvement before Grade 12"),
            undated("Research bursaries that use Grade 11 results for selection"),
            undated("Attend university open days and career expos"),
        ],
        TimelinePhase::FinalsPreparation => {
            let (month, day) = APPLICATIONS_CLOSE;
            let applications_close = NaiveDate::from_ymd_opt(now.year(), month, day)
                .filter(|close| *close >= now);
            vec![
                (
                    "Submit university applications for every shortlisted program".to_string(),
                    applications_close,
                ),
                (
                    "Submit bursary applications with certified Grade 11 results".to_string(),
                    applications_close,
                ),
                (
                    "Follow a structured revision timetable for final examinations".to_string(),
                    NaiveDate::from_ymd_opt(now.year(), FINALS_MONTH, 1),
                ),
            ]
        }
        TimelinePhase::PostFinals => vec![
            undated("Track application outcomes and accept offers promptly"),
            undated("Prepare supplementary or alternative options before results release in January"),
            undated("Confirm funding and accommodation before registration"),
        ],
    }
}
