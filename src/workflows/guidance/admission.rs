use serde::{Deserialize, Serialize};

use super::aps::ApsProjection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    High,
    Medium,
    Challenging,
}

impl Feasibility {
    pub fn from_probability(probability: u8) -> Self {
        if probability >= 70 {
            Self::High
        } else if probability >= 40 {
            Self::Medium
        } else {
            Self::Challenging
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Challenging => "Challenging",
        }
    }
}

/// Admission likelihood bucket (percent) for a projected APS range.
pub fn probability(projected: ApsProjection, required_aps: u32) -> u8 {
    let required = required_aps as i64;
    let min = projected.min as i64;
    let max = projected.max as i64;

    if min >= required + 5 {
        95
    } else if min >= required {
        85
    } else if max >= required + 2 {
        70
    } else if max >= required {
        50
    } else if max >= required - 3 {
        25
    } else {
        10
    }
}
