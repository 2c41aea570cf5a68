//! Career guidance engine for South African high-school learners.
//!
//! A learner profile is screened against a career catalog by a fixed set of
//! eligibility gates. Surviving careers are matched to university programs
//! and the learner is matched to bursaries. Everything is composed into a
//! single `RecommendationSet` alongside a date-driven action timeline.

pub mod admission;
pub mod aps;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod domain;
pub mod gates;
pub mod interests;
pub mod matching;
pub mod orchestrator;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use admission::Feasibility;
pub use aps::{compute_aps, project_final_aps, ApsProjection};
pub use catalog::{CareerCatalog, CatalogError};
pub use composer::{ApsSummary, RecommendationComposer, RecommendationFailure, RecommendationSet};
pub use config::RecommendationConfig;
pub use domain::{
    BudgetLimit, BursaryDefinition, CareerCategory, CareerOption, Gate, GateVerdict, MathType,
    Severity, StudentProfile, SubjectBonus, UniversityOffering, UrgencyTier,
};
pub use interests::InterestClassifier;
pub use matching::{BursaryMatch, BursaryMatcher, ProgramMatch, ProgramMatcher};
pub use orchestrator::{CareerAssessment, CatalogFiltering, CatalogSummary, GateOrchestrator};
pub use timeline::{TimelineAction, TimelinePhase, TimelinePlan, TimelinePlanner};
