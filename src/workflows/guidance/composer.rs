use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::aps::{compute_aps, project_final_aps, ApsProjection};
use super::catalog::{CareerCatalog, CatalogError};
use super::config::RecommendationConfig;
use super::domain::{CareerCategory, StudentProfile};
use super::interests::InterestClassifier;
use super::matching::{BursaryMatch, BursaryMatcher, ProgramMatch, ProgramMatcher};
use super::orchestrator::{CareerAssessment, CatalogSummary, GateOrchestrator};
use super::timeline::{TimelinePlan, TimelinePlanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApsSummary {
    pub current: u32,
    pub projection: ApsProjection,
}

/// Everything produced for one learner in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub generated_on: NaiveDate,
    pub aps: ApsSummary,
    pub summary: CatalogSummary,
    pub interest_categories: BTreeSet<CareerCategory>,
    pub eligible_careers: Vec<CareerAssessment>,
    pub blocked_careers: Vec<CareerAssessment>,
    pub ranked_programs: Vec<ProgramMatch>,
    pub ranked_bursaries: Vec<BursaryMatch>,
    pub timeline: TimelinePlan,
}

/// Response body returned in place of a recommendation set when generation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct RecommendationFailure {
    pub success: bool,
    pub error: String,
    pub fallback: bool,
}

impl RecommendationFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            fallback: true,
        }
    }
}

impl From<CatalogError> for RecommendationFailure {
    fn from(error: CatalogError) -> Self {
        Self::new(format!("invalid catalog: {error}"))
    }
}

/// Runs the full guidance pipeline: gates, APS, matching and timeline.
#[derive(Debug, Clone)]
pub struct RecommendationComposer {
    orchestrator: GateOrchestrator,
    classifier: InterestClassifier,
    programs: ProgramMatcher,
    bursaries: BursaryMatcher,
    planner: TimelinePlanner,
}

impl RecommendationComposer {
    pub fn new(config: &RecommendationConfig) -> Self {
        Self::with_orchestrator(GateOrchestrator::standard(), config)
    }

    pub fn with_orchestrator(orchestrator: GateOrchestrator, config: &RecommendationConfig) -> Self {
        Self {
            orchestrator,
            classifier: InterestClassifier::new(),
            programs: ProgramMatcher::new(config),
            bursaries: BursaryMatcher::new(config),
            planner: TimelinePlanner::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(&RecommendationConfig::default())
    }

    pub fn generate(
        &self,
        student: &StudentProfile,
        catalog: &CareerCatalog,
        now: NaiveDate,
    ) -> Result<RecommendationSet, RecommendationFailure> {
        catalog.validate()?;

        let current = compute_aps(student.valid_marks().map(|(_, mark)| mark));
        let projection = project_final_aps(current, student.grade);
        debug!(current, min = projection.min, max = projection.max, "aps projected");

        let timeline = self.planner.plan(student, now);
        debug!(phase = timeline.phase.label(), "timeline planned");

        let filtering = self.orchestrator.filter_catalog(student, &catalog.careers);

        let interest_categories = self
            .classifier
            .classify_optional(student.career_interest_text.as_deref());
        debug!(categories = interest_categories.len(), "interests classified");

        let eligible_ids: HashSet<&str> = filtering
            .eligible
            .iter()
            .map(|assessment| assessment.career_id.as_str())
            .collect();
        let eligible_careers = catalog
            .careers
            .iter()
            .filter(|career| eligible_ids.contains(career.id.as_str()));

        let ranked_programs = self
            .programs
            .rank(eligible_careers, &interest_categories, projection);
        let ranked_bursaries = self.bursaries.rank(
            &catalog.bursaries,
            student,
            projection,
            &interest_categories,
            now,
        );
        debug!(
            programs = ranked_programs.len(),
            bursaries = ranked_bursaries.len(),
            "matches ranked"
        );

        info!(
            grade = student.grade,
            aps = current,
            eligible = filtering.summary.eligible,
            blocked = filtering.summary.blocked,
            programs = ranked_programs.len(),
            bursaries = ranked_bursaries.len(),
            "recommendations generated"
        );

        Ok(RecommendationSet {
            generated_on: now,
            aps: ApsSummary {
                current,
                projection,
            },
            summary: filtering.summary,
            interest_categories,
            eligible_careers: filtering.eligible,
            blocked_careers: filtering.blocked,
            ranked_programs,
            ranked_bursaries,
            timeline,
        })
    }
}

impl Default for RecommendationComposer {
    fn default() -> Self {
        Self::standard()
    }
}
