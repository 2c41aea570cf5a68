mod bursaries;
mod programs;

pub use bursaries::{BursaryMatch, BursaryMatcher};
pub use programs::{relevant_categories, ProgramMatch, ProgramMatcher, DEFAULT_CATEGORIES};
