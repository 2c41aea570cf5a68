//! Admission Point Score calculation on the CAPS 1-7 scale.

use serde::{Deserialize, Serialize};

use super::domain::is_valid_mark;

/// Highest attainable APS across the scored subjects.
pub const MAX_APS: u32 = 42;

/// Inclusive range the final APS is expected to land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApsProjection {
    pub min: u32,
    pub max: u32,
}

/// Converts a percentage into CAPS points. Returns `None` for unusable marks.
pub fn aps_points(mark: f64) -> Option<u32> {
    if !is_valid_mark(mark) {
        return None;
    }

    let points = match mark {
        m if m >= 80.0 => 7,
        m if m >= 70.0 => 6,
        m if m >= 60.0 => 5,
        m if m >= 50.0 => 4,
        m if m >= 40.0 => 3,
        m if m >= 30.0 => 2,
        _ => 1,
    };
    Some(points)
}

/// Sums CAPS points over every usable mark. Callers choose which subjects count.
pub fn compute_aps<I>(marks: I) -> u32
where
    I: IntoIterator<Item = f64>,
{
    marks.into_iter().filter_map(aps_points).sum()
}

pub fn optimism_factor(grade: u8) -> f64 {
    match grade {
        10 => 1.15,
        11 => 1.08,
        12 => 1.02,
        _ => 1.0,
    }
}

pub fn project_final_aps(current_aps: u32, grade: u8) -> ApsProjection {
    let projected = (current_aps as f64 * optimism_factor(grade)).round() as u32;
    let max = projected.min(MAX_APS).max(current_aps);
    ApsProjection {
        min: current_aps,
        max,
    }
}
