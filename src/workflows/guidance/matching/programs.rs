use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::admission::{probability, Feasibility};
use super::super::aps::ApsProjection;
use super::super::config::RecommendationConfig;
use super::super::domain::{CareerCategory, CareerOption};

/// Categories assumed when the learner's interests match nothing.
pub const DEFAULT_CATEGORIES: [CareerCategory; 3] = [
    CareerCategory::Engineering,
    CareerCategory::Business,
    CareerCategory::Technology,
];

/// Interest tags, or the default set when there are none.
pub fn relevant_categories(tags: &BTreeSet<CareerCategory>) -> BTreeSet<CareerCategory> {
    if tags.is_empty() {
        DEFAULT_CATEGORIES.into_iter().collect()
    } else {
        tags.clone()
    }
}

/// A university offering of a career program, ranked by admission likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramMatch {
    pub career_id: String,
    pub program: String,
    pub category: CareerCategory,
    pub university: String,
    pub province: String,
    pub required_aps: u32,
    pub annual_cost: f64,
    pub admission_probability: u8,
    pub feasibility: Feasibility,
}

#[derive(Debug, Clone)]
pub struct ProgramMatcher {
    max_results: usize,
    min_probability: u8,
}

impl ProgramMatcher {
    pub fn new(config: &RecommendationConfig) -> Self {
        Self {
            max_results: config.max_programs,
            min_probability: config.min_admission_probability,
        }
    }

    pub fn rank<'a, I>(
        &self,
        careers: I,
        tags: &BTreeSet<CareerCategory>,
        projection: ApsProjection,
    ) -> Vec<ProgramMatch>
    where
        I: IntoIterator<Item = &'a CareerOption>,
    {
        let categories = relevant_categories(tags);

        let mut matches: Vec<ProgramMatch> = careers
            .into_iter()
            .filter(|career| categories.contains(&career.category))
            .flat_map(|career| {
                career.universities.iter().map(move |offering| {
                    let admission_probability = probability(projection, offering.min_aps);
                    ProgramMatch {
                        career_id: career.id.clone(),
                        program: career.name.clone(),
                        category: career.category,
                        university: offering.university.clone(),
                        province: offering.province.clone(),
                        required_aps: offering.min_aps,
                        annual_cost: offering.annual_cost,
                        admission_probability,
                        feasibility: Feasibility::from_probability(admission_probability),
                    }
                })
            })
            .filter(|candidate| candidate.admission_probability >= self.min_probability)
            .collect();

        matches.sort_by(|a, b| {
            b.admission_probability
                .cmp(&a.admission_probability)
                .then_with(|| a.required_aps.cmp(&b.required_aps))
                .then_with(|| a.university.cmp(&b.university))
                .then_with(|| a.program.cmp(&b.program))
        });
        matches.truncate(self.max_results);
        matches
    }
}

impl Default for ProgramMatcher {
    fn default() -> Self {
        Self::new(&RecommendationConfig::default())
    }
}
