use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{CareerCategory, CareerOption, Gate, GateVerdict, Severity, StudentProfile};

/// Catalogs smaller than this are evaluated on the calling thread.
const PARALLEL_THRESHOLD: usize = 32;

/// Aggregated gate verdicts for one career.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerAssessment {
    pub career_id: String,
    pub career_name: String,
    pub category: CareerCategory,
    pub blocked: bool,
    pub critical_blocks: Vec<GateVerdict>,
    pub warnings: Vec<GateVerdict>,
    /// Informational verdicts worth showing, such as partial APS qualification.
    pub notes: Vec<GateVerdict>,
}

impl CareerAssessment {
    pub fn from_verdicts(career: &CareerOption, verdicts: Vec<GateVerdict>) -> Self {
        let blocked = verdicts.iter().any(|verdict| verdict.blocked);
        let mut critical_blocks = Vec::new();
        let mut warnings = Vec::new();
        let mut notes = Vec::new();

        for verdict in verdicts {
            if verdict.blocked {
                critical_blocks.push(verdict);
            } else if verdict.severity == Severity::Warning {
                warnings.push(verdict);
            } else if !verdict.is_pass() {
                notes.push(verdict);
            }
        }

        Self {
            career_id: career.id.clone(),
            career_name: career.name.clone(),
            category: career.category,
            blocked,
            critical_blocks,
            warnings,
            notes,
        }
    }

    /// Reasons the career is blocked, in gate order.
    pub fn block_reasons(&self) -> Vec<&str> {
        self.critical_blocks
            .iter()
            .map(|verdict| verdict.reason.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub eligible: usize,
    pub blocked: usize,
}

/// Partition of a catalog into careers that survive every gate and those that do not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFiltering {
    pub eligible: Vec<CareerAssessment>,
    pub blocked: Vec<CareerAssessment>,
    pub summary: CatalogSummary,
}

/// Runs an explicit list of gates over careers.
#[derive(Debug, Clone)]
pub struct GateOrchestrator {
    gates: Vec<Gate>,
}

impl GateOrchestrator {
    pub fn new(gates: Vec<Gate>) -> Self {
        Self { gates }
    }

    pub fn standard() -> Self {
        Self::new(Gate::standard_set())
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Every configured gate's verdict, in gate order.
    pub fn verdicts(&self, student: &StudentProfile, career: &CareerOption) -> Vec<GateVerdict> {
        self.gates
            .iter()
            .map(|gate| gate.evaluate(student, career))
            .collect()
    }

    pub fn evaluate_career(
        &self,
        student: &StudentProfile,
        career: &CareerOption,
    ) -> CareerAssessment {
        CareerAssessment::from_verdicts(career, self.verdicts(student, career))
    }

    pub fn filter_catalog(
        &self,
        student: &StudentProfile,
        careers: &[CareerOption],
    ) -> CatalogFiltering {
        let mut filtering = CatalogFiltering::default();

        for assessment in self.assess_all(student, careers) {
            if assessment.blocked {
                filtering.blocked.push(assessment);
            } else {
                filtering.eligible.push(assessment);
            }
        }

        filtering.summary = CatalogSummary {
            total: careers.len(),
            eligible: filtering.eligible.len(),
            blocked: filtering.blocked.len(),
        };

        debug!(
            total = filtering.summary.total,
            eligible = filtering.summary.eligible,
            blocked = filtering.summary.blocked,
            "catalog filtered"
        );

        filtering
    }

    fn assess_all(
        &self,
        student: &StudentProfile,
        careers: &[CareerOption],
    ) -> Vec<CareerAssessment> {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(careers.len());

        if careers.len() < PARALLEL_THRESHOLD || workers <= 1 {
            return careers
                .iter()
                .map(|career| self.evaluate_career(student, career))
                .collect();
        }

        let chunk_size = careers.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = careers
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|career| self.evaluate_career(student, career))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            // Joining in spawn order keeps results in catalog order.
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }
}

impl Default for GateOrchestrator {
    fn default() -> Self {
        Self::standard()
    }
}
