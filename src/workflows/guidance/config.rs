use serde::{Deserialize, Serialize};

/// Ranking limits and thresholds applied by the matchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub max_programs: usize,
    pub max_bursaries: usize,
    /// Programs scoring below this admission probability are dropped.
    pub min_admission_probability: u8,
    /// Bursaries scoring below this eligibility score are dropped.
    pub min_bursary_score: u8,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_programs: 5,
            max_bursaries: 3,
            min_admission_probability: 10,
            min_bursary_score: 30,
        }
    }
}
