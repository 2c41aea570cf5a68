use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    BursaryDefinition, CareerCategory, CareerOption, SubjectBonus, UniversityOffering, UrgencyTier,
};

/// Structural faults that make a catalog unusable for scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("career at position {index} is missing its {field}")]
    MissingCareerField { index: usize, field: &'static str },
    #[error("career id '{0}' appears more than once")]
    DuplicateCareer(String),
    #[error("career '{career}' lists a university offering without a name")]
    MissingUniversityName { career: String },
    #[error("career '{career}' has an invalid annual cost at {university}")]
    InvalidAnnualCost { career: String, university: String },
    #[error("career '{career}' has an out-of-range {field}")]
    InvalidThreshold { career: String, field: &'static str },
    #[error("career '{career}' references unknown bursary '{bursary}'")]
    UnknownBursary { career: String, bursary: String },
    #[error("bursary at position {index} is missing its name")]
    MissingBursaryName { index: usize },
}

/// Read-only snapshot of careers and bursaries supplied per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerCatalog {
    pub careers: Vec<CareerOption>,
    #[serde(default)]
    pub bursaries: Vec<BursaryDefinition>,
}

impl CareerCatalog {
    pub fn new(careers: Vec<CareerOption>, bursaries: Vec<BursaryDefinition>) -> Self {
        Self { careers, bursaries }
    }

    /// Built-in catalog of common South African degree pathways.
    pub fn standard() -> Self {
        Self::new(standard_careers(), standard_bursaries())
    }

    pub fn careers_in(&self, category: CareerCategory) -> Vec<&CareerOption> {
        self.careers
            .iter()
            .filter(|career| career.category == category)
            .collect()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut bursary_names = HashSet::new();
        for (index, bursary) in self.bursaries.iter().enumerate() {
            if bursary.name.trim().is_empty() {
                return Err(CatalogError::MissingBursaryName { index });
            }
            bursary_names.insert(bursary.name.as_str());
        }

        let mut seen = HashSet::new();
        for (index, career) in self.careers.iter().enumerate() {
            if career.id.trim().is_empty() {
                return Err(CatalogError::MissingCareerField { index, field: "id" });
            }
            if career.name.trim().is_empty() {
                return Err(CatalogError::MissingCareerField {
                    index,
                    field: "name",
                });
            }
            if !seen.insert(career.id.as_str()) {
                return Err(CatalogError::DuplicateCareer(career.id.clone()));
            }

            for (field, threshold) in [
                ("min_math_mark", career.min_math_mark),
                ("min_english_mark", career.min_english_mark),
            ] {
                if threshold.is_some_and(|mark| !(0.0..=100.0).contains(&mark)) {
                    return Err(CatalogError::InvalidThreshold {
                        career: career.id.clone(),
                        field,
                    });
                }
            }

            for offering in &career.universities {
                if offering.university.trim().is_empty() {
                    return Err(CatalogError::MissingUniversityName {
                        career: career.id.clone(),
                    });
                }
                if !offering.annual_cost.is_finite() || offering.annual_cost < 0.0 {
                    return Err(CatalogError::InvalidAnnualCost {
                        career: career.id.clone(),
                        university: offering.university.clone(),
                    });
                }
            }

            if let Some(missing) = career
                .bursaries
                .iter()
                .find(|name| !bursary_names.contains(name.as_str()))
            {
                return Err(CatalogError::UnknownBursary {
                    career: career.id.clone(),
                    bursary: missing.clone(),
                });
            }
        }

        Ok(())
    }
}

fn offering(university: &str, min_aps: u32, annual_cost: f64, province: &str) -> UniversityOffering {
    UniversityOffering {
        university: university.to_string(),
        min_aps,
        annual_cost,
        province: province.to_string(),
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn subject_set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn career(id: &str, name: &str, category: CareerCategory) -> CareerOption {
    CareerOption {
        id: id.to_string(),
        name: name.to_string(),
        category,
        requires_core_math: false,
        min_math_mark: None,
        requires_physical_science: false,
        min_english_mark: None,
        required_subjects: BTreeSet::new(),
        requires_public_speaking: false,
        requires_nbt: false,
        universities: Vec::new(),
        bursaries: Vec::new(),
        tvet_alternative: None,
    }
}

fn standard_careers() -> Vec<CareerOption> {
    vec![
        CareerOption {
            requires_core_math: true,
            min_math_mark: Some(70.0),
            requires_physical_science: true,
            min_english_mark: Some(50.0),
            requires_nbt: true,
            universities: vec![
                offering("University of Cape Town", 38, 75_000.0, "Western Cape"),
                offering("University of the Witwatersrand", 36, 68_000.0, "Gauteng"),
                offering("Stellenbosch University", 35, 65_000.0, "Western Cape"),
                offering("University of Pretoria", 35, 62_000.0, "Gauteng"),
            ],
            bursaries: names(&["Engineering Futures Bursary"]),
            tvet_alternative: Some("N6 Mechanical Engineering (TVET)".to_string()),
            ..career("mechanical-engineering", "Mechanical Engineering", CareerCategory::Engineering)
        },
        CareerOption {
            requires_core_math: true,
            min_math_mark: Some(60.0),
            requires_physical_science: true,
            universities: vec![
                offering("University of Johannesburg", 32, 55_000.0, "Gauteng"),
                offering("University of KwaZulu-Natal", 33, 58_000.0, "KwaZulu-Natal"),
                offering("Nelson Mandela University", 30, 52_000.0, "Eastern Cape"),
            ],
            bursaries: names(&["Engineering Futures Bursary"]),
            tvet_alternative: Some("N6 Civil Engineering (TVET)".to_string()),
            ..career("civil-engineering", "Civil Engineering", CareerCategory::Engineering)
        },
        CareerOption {
            requires_core_math: true,
            min_math_mark: Some(70.0),
            requires_physical_science: true,
            min_english_mark: Some(60.0),
            required_subjects: subject_set(&["Life Sciences"]),
            requires_nbt: true,
            universities: vec![
                offering("University of Cape Town", 42, 82_000.0, "Western Cape"),
                offering("University of the Witwatersrand", 40, 78_000.0, "Gauteng"),
                offering("University of KwaZulu-Natal", 38, 70_000.0, "KwaZulu-Natal"),
                offering("Sefako Makgatho Health Sciences University", 36, 55_000.0, "Gauteng"),
            ],
            bursaries: names(&["Health Sciences Bursary"]),
            ..career("medicine", "Medicine (MBChB)", CareerCategory::Healthcare)
        },
        CareerOption {
            min_english_mark: Some(50.0),
            required_subjects: subject_set(&["Life Sciences"]),
            universities: vec![
                offering("University of the Western Cape", 28, 45_000.0, "Western Cape"),
                offering("University of the Free State", 30, 42_000.0, "Free State"),
                offering("North-West University", 26, 40_000.0, "North West"),
            ],
            bursaries: names(&["Health Sciences Bursary"]),
            tvet_alternative: Some("Auxiliary Nursing Higher Certificate".to_string()),
            ..career("nursing", "Nursing", CareerCategory::Healthcare)
        },
        CareerOption {
            requires_core_math: true,
            min_math_mark: Some(60.0),
            universities: vec![
                offering("University of Cape Town", 36, 72_000.0, "Western Cape"),
                offering("University of the Witwatersrand", 34, 66_000.0, "Gauteng"),
                offering("University of Pretoria", 32, 60_000.0, "Gauteng"),
                offering("Rhodes University", 30, 58_000.0, "Eastern Cape"),
            ],
            bursaries: names(&["Digital Skills Bursary"]),
            tvet_alternative: Some("N6 Information Technology (TVET)".to_string()),
            ..career("computer-science", "Computer Science", CareerCategory::Technology)
        },
        CareerOption {
            requires_core_math: true,
            min_math_mark: Some(65.0),
            universities: vec![
                offering("Stellenbosch University", 35, 64_000.0, "Western Cape"),
                offering("University of Pretoria", 34, 61_000.0, "Gauteng"),
            ],
            bursaries: names(&["Digital Skills Bursary"]),
            ..career("data-science", "Data Science", CareerCategory::Technology)
        },
        CareerOption {
            requires_core_math: true,
            min_math_mark: Some(60.0),
            universities: vec![
                offering("University of Johannesburg", 30, 52_000.0, "Gauteng"),
                offering("University of Pretoria", 34, 60_000.0, "Gauteng"),
                offering("Stellenbosch University", 36, 63_000.0, "Western Cape"),
                offering("Nelson Mandela University", 30, 50_000.0, "Eastern Cape"),
            ],
            bursaries: names(&["Chartered Accountancy Bursary"]),
            tvet_alternative: Some("N6 Financial Management (TVET)".to_string()),
            ..career("chartered-accountancy", "Chartered Accountancy", CareerCategory::Business)
        },
        CareerOption {
            universities: vec![
                offering("University of South Africa", 22, 18_000.0, "Gauteng"),
                offering("University of Johannesburg", 26, 42_000.0, "Gauteng"),
                offering("North-West University", 24, 39_000.0, "North West"),
            ],
            tvet_alternative: Some("N6 Business Management (TVET)".to_string()),
            ..career("business-management", "Business Management", CareerCategory::Business)
        },
        CareerOption {
            min_english_mark: Some(60.0),
            requires_public_speaking: true,
            requires_nbt: true,
            universities: vec![
                offering("University of the Witwatersrand", 36, 64_000.0, "Gauteng"),
                offering("University of KwaZulu-Natal", 32, 55_000.0, "KwaZulu-Natal"),
                offering("University of Fort Hare", 28, 38_000.0, "Eastern Cape"),
            ],
            tvet_alternative: Some("Paralegal Higher Certificate".to_string()),
            ..career("law", "Law (LLB)", CareerCategory::Law)
        },
        CareerOption {
            requires_public_speaking: true,
            universities: vec![
                offering("University of South Africa", 20, 16_000.0, "Gauteng"),
                offering("North-West University", 24, 36_000.0, "North West"),
                offering("University of Zululand", 24, 34_000.0, "KwaZulu-Natal"),
            ],
            bursaries: names(&["Funza Lushaka Bursary"]),
            ..career("teaching", "Teaching (BEd)", CareerCategory::Education)
        },
        CareerOption {
            universities: vec![
                offering("University of Johannesburg", 25, 48_000.0, "Gauteng"),
                offering("Durban University of Technology", 24, 41_000.0, "KwaZulu-Natal"),
                offering("Cape Peninsula University of Technology", 24, 43_000.0, "Western Cape"),
            ],
            tvet_alternative: Some("Graphic Design Certificate (TVET)".to_string()),
            ..career("graphic-design", "Graphic Design", CareerCategory::Creative)
        },
        CareerOption {
            required_subjects: subject_set(&["Life Sciences"]),
            universities: vec![
                offering("Rhodes University", 30, 57_000.0, "Eastern Cape"),
                offering("University of the Free State", 28, 44_000.0, "Free State"),
                offering("North-West University", 26, 40_000.0, "North West"),
            ],
            ..career("environmental-science", "Environmental Science", CareerCategory::Science)
        },
    ]
}

fn deadline(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn standard_bursaries() -> Vec<BursaryDefinition> {
    vec![
        BursaryDefinition {
            name: "NSFAS".to_string(),
            amount: "Full cost of study".to_string(),
            min_aps: None,
            income_ceiling: Some(350_000.0),
            subject_bonus: None,
            fields: BTreeSet::new(),
            deadline: deadline(2027, 1, 31),
            urgency: UrgencyTier::High,
        },
        BursaryDefinition {
            name: "Engineering Futures Bursary".to_string(),
            amount: "Up to R120 000 per year".to_string(),
            min_aps: Some(34),
            income_ceiling: Some(600_000.0),
            subject_bonus: Some(SubjectBonus {
                subjects: names(&["Mathematics", "Physical Sciences"]),
                min_mark: 70.0,
            }),
            fields: [CareerCategory::Engineering, CareerCategory::Science]
                .into_iter()
                .collect(),
            deadline: deadline(2026, 8, 31),
            urgency: UrgencyTier::High,
        },
        BursaryDefinition {
            name: "Digital Skills Bursary".to_string(),
            amount: "R80 000 per year".to_string(),
            min_aps: Some(30),
            income_ceiling: None,
            subject_bonus: Some(SubjectBonus {
                subjects: names(&["Mathematics"]),
                min_mark: 65.0,
            }),
            fields: [CareerCategory::Technology].into_iter().collect(),
            deadline: deadline(2026, 9, 30),
            urgency: UrgencyTier::Medium,
        },
        BursaryDefinition {
            name: "Health Sciences Bursary".to_string(),
            amount: "Tuition and residence".to_string(),
            min_aps: Some(32),
            income_ceiling: Some(500_000.0),
            subject_bonus: Some(SubjectBonus {
                subjects: names(&["Life Sciences", "Physical Sciences"]),
                min_mark: 65.0,
            }),
            fields: [CareerCategory::Healthcare].into_iter().collect(),
            deadline: deadline(2026, 9, 30),
            urgency: UrgencyTier::High,
        },
        BursaryDefinition {
            name: "Funza Lushaka Bursary".to_string(),
            amount: "Full cost of study with service obligation".to_string(),
            min_aps: Some(24),
            income_ceiling: None,
            subject_bonus: None,
            fields: [CareerCategory::Education].into_iter().collect(),
            deadline: deadline(2027, 1, 15),
            urgency: UrgencyTier::Medium,
        },
        BursaryDefinition {
            name: "Chartered Accountancy Bursary".to_string(),
            amount: "R70 000 per year".to_string(),
            min_aps: Some(32),
            income_ceiling: Some(600_000.0),
            subject_bonus: Some(SubjectBonus {
                subjects: names(&["Mathematics", "Accounting"]),
                min_mark: 65.0,
            }),
            fields: [CareerCategory::Business].into_iter().collect(),
            deadline: deadline(2026, 10, 31),
            urgency: UrgencyTier::Critical,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        let catalog = CareerCatalog::standard();
        assert!(catalog.validate().is_ok());
        assert!(catalog.careers.iter().any(|career| career.id == "medicine"));
        assert_eq!(catalog.careers_in(CareerCategory::Technology).len(), 2);
    }

    #[test]
    fn unknown_bursary_reference_is_rejected() {
        let mut catalog = CareerCatalog::standard();
        catalog.careers[0].bursaries.push("Imaginary Fund".to_string());

        assert_eq!(
            catalog.validate(),
            Err(CatalogError::UnknownBursary {
                career: "mechanical-engineering".to_string(),
                bursary: "Imaginary Fund".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_and_blank_careers_are_rejected() {
        let mut catalog = CareerCatalog::standard();
        let copy = catalog.careers[1].clone();
        catalog.careers.push(copy);
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::DuplicateCareer("civil-engineering".to_string()))
        );

        let mut catalog = CareerCatalog::standard();
        catalog.careers[2].name = "  ".to_string();
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::MissingCareerField {
                index: 2,
                field: "name"
            })
        );
    }

    #[test]
    fn nonsensical_costs_and_thresholds_are_rejected() {
        let mut catalog = CareerCatalog::standard();
        catalog.careers[3].universities[0].annual_cost = f64::NAN;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidAnnualCost { .. })
        ));

        let mut catalog = CareerCatalog::standard();
        catalog.careers[0].min_math_mark = Some(140.0);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::InvalidThreshold {
                field: "min_math_mark",
                ..
            })
        ));
    }
}
