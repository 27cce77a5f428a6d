// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable reference data: the disease and vaccine catalogs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::pet::{Severity, Species};

/// Which reference catalog an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Disease,
    Vaccine,
}

/// One row of a disease's age-bracket base-risk table.
///
/// Brackets are evaluated in order; the first whose `max_age_months` is
/// `None` or not below the pet's age wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeRisk {
    pub max_age_months: Option<u32>,
    /// Base probability in `[0, 1]`.
    pub risk: f64,
}

/// A disease reference entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRef {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    /// Health lost per decay interval while active.
    pub health_impact: u8,
    /// Happiness lost per decay interval while active.
    pub happiness_impact: u8,
    pub min_duration_days: u32,
    pub max_duration_days: u32,
    pub treatment_cost: f64,
    pub species: Vec<Species>,
    pub symptoms: Vec<String>,
    pub prevention_tips: Vec<String>,
    pub risk_by_age: Vec<AgeRisk>,
}

impl DiseaseRef {
    pub fn affects(&self, species: Species) -> bool {
        self.species.contains(&species)
    }

    /// Base risk for the given age from the bracket table; zero when no bracket matches.
    pub fn base_risk(&self, age_months: u32) -> f64 {
        self.risk_by_age
            .iter()
            .find(|bracket| bracket.max_age_months.is_none_or(|max| age_months <= max))
            .map(|bracket| bracket.risk.clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

/// A vaccine reference entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineRef {
    pub id: String,
    pub name: String,
    /// Identifier of the disease this vaccine protects against.
    pub target_disease: String,
    /// How long a dose protects, in pet-months.
    pub protection_months: u32,
    pub cost: f64,
    pub species: Vec<Species>,
    /// Inclusive minimum age for administration.
    pub min_age_months: u32,
    /// Inclusive maximum age for administration; `None` is unbounded.
    pub max_age_months: Option<u32>,
    /// A first dose not given by this age is overdue.
    pub first_dose_deadline_months: Option<u32>,
    /// Booster cadence in pet-months (12 for annual boosters).
    pub booster_interval_months: Option<u32>,
    /// Risk multiplier applied while the pet is protected.
    pub residual_risk: f64,
    pub side_effects: Vec<String>,
}

impl VaccineRef {
    pub fn applies_to(&self, species: Species) -> bool {
        self.species.contains(&species)
    }

    /// Whether `age_months` falls inside the administration window.
    pub fn age_eligible(&self, age_months: u32) -> bool {
        age_months >= self.min_age_months
            && self.max_age_months.is_none_or(|max| age_months <= max)
    }
}
