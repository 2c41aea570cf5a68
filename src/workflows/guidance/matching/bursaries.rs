use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::aps::ApsProjection;
use super::super::config::RecommendationConfig;
use super::super::domain::{
    BursaryDefinition, CareerCategory, StudentProfile, UrgencyTier, NSFAS_INCOME_CEILING,
};

const APS_WEIGHT: u8 = 30;
const NEED_WEIGHT: u8 = 40;
const FIELD_WEIGHT: u8 = 30;
const SUBJECT_WEIGHT: u8 = 40;
const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BursaryMatch {
    pub name: String,
    pub amount: String,
    pub score: u8,
    pub reasons: Vec<String>,
    pub urgency: UrgencyTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_deadline: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct BursaryMatcher {
    max_results: usize,
    min_score: u8,
}

impl BursaryMatcher {
    pub fn new(config: &RecommendationConfig) -> Self {
        Self {
            max_results: config.max_bursaries,
            min_score: config.min_bursary_score,
        }
    }

    /// Eligibility score in `0..=100` with the checks that contributed to it.
    pub fn score(
        &self,
        bursary: &BursaryDefinition,
        student: &StudentProfile,
        projection: ApsProjection,
        tags: &BTreeSet<CareerCategory>,
    ) -> (u8, Vec<String>) {
        let mut score: u8 = 0;
        let mut reasons = Vec::new();

        match bursary.min_aps {
            Some(required) if projection.max >= required => {
                score += APS_WEIGHT;
                reasons.push(format!("projected APS {} meets minimum {required}", projection.max));
            }
            Some(_) => {}
            None => {
                score += APS_WEIGHT;
                reasons.push("no minimum APS".to_string());
            }
        }

        let ceiling = bursary.income_ceiling.unwrap_or(NSFAS_INCOME_CEILING);
        if student.income_within(ceiling) {
            score += NEED_WEIGHT;
            reasons.push("household income within funding ceiling".to_string());
        } else if student.first_generation {
            score += NEED_WEIGHT;
            reasons.push("first-generation student".to_string());
        }

        let aligned: Vec<&str> = bursary
            .fields
            .intersection(tags)
            .map(|category| category.label())
            .collect();
        if !aligned.is_empty() {
            score += FIELD_WEIGHT;
            reasons.push(format!("funds {} careers", aligned.join(", ")));
        }

        if let Some(bonus) = &bursary.subject_bonus {
            let qualifies = !bonus.subjects.is_empty()
                && bonus.subjects.iter().all(|subject| {
                    student
                        .mark_for(subject)
                        .map(|mark| mark >= bonus.min_mark)
                        .unwrap_or(false)
                });
            if qualifies {
                score += SUBJECT_WEIGHT;
                reasons.push(format!(
                    "{} at {:.0}% or above",
                    bonus.subjects.join(" and "),
                    bonus.min_mark
                ));
            }
        }

        (score.min(MAX_SCORE), reasons)
    }

    /// Ranks open bursaries. A bursary whose deadline is before `today` is closed and skipped.
    pub fn rank(
        &self,
        bursaries: &[BursaryDefinition],
        student: &StudentProfile,
        projection: ApsProjection,
        tags: &BTreeSet<CareerCategory>,
        today: NaiveDate,
    ) -> Vec<BursaryMatch> {
        let mut matches: Vec<BursaryMatch> = bursaries
            .iter()
            .filter(|bursary| bursary.deadline.map_or(true, |deadline| deadline >= today))
            .filter_map(|bursary| {
                let (score, reasons) = self.score(bursary, student, projection, tags);
                (score >= self.min_score).then(|| BursaryMatch {
                    name: bursary.name.clone(),
                    amount: bursary.amount.clone(),
                    score,
                    reasons,
                    urgency: bursary.urgency,
                    deadline: bursary.deadline,
                    days_until_deadline: bursary
                        .deadline
                        .map(|deadline| (deadline - today).num_days()),
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        matches.truncate(self.max_results);
        matches
    }
}

impl Default for BursaryMatcher {
    fn default() -> Self {
        Self::new(&RecommendationConfig::default())
    }
}
