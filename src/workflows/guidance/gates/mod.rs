//! Independent eligibility checks run for every (student, career) pair.

mod academic;
mod practical;

use super::domain::{CareerOption, Gate, GateVerdict, StudentProfile};

pub use academic::{ENGLISH_GAP_LIMIT, MATH_GAP_LIMIT};
pub use practical::BUDGET_MEAN_COST_LIMIT;

impl Gate {
    /// All ten gates in evaluation order.
    pub fn standard_set() -> Vec<Gate> {
        Gate::ordered().to_vec()
    }

    pub fn evaluate(self, student: &StudentProfile, career: &CareerOption) -> GateVerdict {
        match self {
            Gate::Math => academic::math(student, career),
            Gate::Science => academic::science(student, career),
            Gate::Aps => academic::aps(student, career),
            Gate::Deadline => academic::deadline(student, career),
            Gate::Nbt => academic::nbt(student, career),
            Gate::Language => academic::language(student, career),
            Gate::Budget => practical::budget(student, career),
            Gate::FundingAwareness => practical::funding_awareness(student, career),
            Gate::CategoryMismatch => practical::category_mismatch(student, career),
            Gate::Geographic => practical::geographic(student, career),
        }
    }
}
