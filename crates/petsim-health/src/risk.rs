// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-disease risk assessment.
//!
//! Risk = base risk for the pet's age bracket × protection factor, where the
//! protection factor is the vaccine's residual risk while its protection is
//! current and 1.0 otherwise.

use petsim_core::{DiseaseRef, GrowthStage, PetRecord};

use crate::catalog::Catalog;
use crate::vaccines::last_dose;

/// Assessments above this percentage are flagged as high risk.
pub const HIGH_RISK_PERCENT: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub disease: DiseaseRef,
    /// 0–100.
    pub risk_percentage: f64,
    pub is_high_risk: bool,
    pub risk_factors: Vec<String>,
    pub prevention_tips: Vec<String>,
}

/// Assess every catalog disease that affects the pet's species.
pub fn disease_risk(pet: &PetRecord, catalog: &Catalog) -> Vec<RiskAssessment> {
    catalog
        .diseases_for(pet.species)
        .map(|disease| assess(pet, disease, catalog))
        .collect()
}

fn assess(pet: &PetRecord, disease: &DiseaseRef, catalog: &Catalog) -> RiskAssessment {
    let mut factors = Vec::new();
    match pet.growth_stage() {
        GrowthStage::Baby => factors.push("Young animals have weaker immunity".to_string()),
        GrowthStage::Senior => factors.push("Senior animals have weaker immunity".to_string()),
        _ => {}
    }

    let mut protection = 1.0_f64;
    let mut gaps = Vec::new();
    for vaccine in catalog
        .vaccines_for(pet.species)
        .filter(|v| v.target_disease == disease.id)
    {
        match last_dose(pet, vaccine, catalog) {
            Some(dose)
                if pet.age_months.saturating_sub(dose.age_months_at_dose)
                    <= vaccine.protection_months =>
            {
                protection = protection.min(vaccine.residual_risk);
            }
            Some(_) => gaps.push(format!("{} protection has lapsed", vaccine.name)),
            None => gaps.push(format!("Not vaccinated with {}", vaccine.name)),
        }
    }
    // Gaps only count when no vaccine currently covers the disease.
    if protection >= 1.0 {
        factors.extend(gaps);
    }

    let risk = (disease.base_risk(pet.age_months) * protection).clamp(0.0, 1.0);
    let risk_percentage = round_percent(risk * 100.0);

    RiskAssessment {
        disease: disease.clone(),
        risk_percentage,
        is_high_risk: risk_percentage > HIGH_RISK_PERCENT,
        risk_factors: factors,
        prevention_tips: disease.prevention_tips.clone(),
    }
}

/// Round to two decimals so float noise never crosses a threshold.
fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use petsim_core::{Species, VaccinationRecord};

    fn pet(species: Species, age: u32) -> PetRecord {
        let t = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let mut pet = PetRecord::new("owner", "Subject", species, 1.0, t);
        pet.age_months = age;
        pet
    }

    fn find<'a>(list: &'a [RiskAssessment], id: &str) -> &'a RiskAssessment {
        list.iter().find(|r| r.disease.id == id).expect("assessed")
    }

    #[test]
    fn unvaccinated_puppy_is_high_risk_for_parvo() {
        let catalog = Catalog::builtin();
        let risks = disease_risk(&pet(Species::Dog, 3), &catalog);
        let parvo = find(&risks, "canine-parvovirus");
        assert_eq!(parvo.risk_percentage, 45.0);
        assert!(parvo.is_high_risk);
        assert!(parvo.risk_factors.iter().any(|f| f.contains("DHPP")));
        assert!(!parvo.prevention_tips.is_empty());
    }

    #[test]
    fn current_vaccination_applies_residual_risk() {
        let catalog = Catalog::builtin();
        let mut puppy = pet(Species::Dog, 4);
        puppy.record_vaccination(VaccinationRecord {
            vaccine_id: "dhpp".into(),
            vaccine_name: "DHPP".into(),
            age_months_at_dose: 3,
            administered_at: puppy.created_at,
        });
        let risks = disease_risk(&puppy, &catalog);
        let parvo = find(&risks, "canine-parvovirus");
        assert_eq!(parvo.risk_percentage, 2.25);
        assert!(!parvo.is_high_risk);
        assert!(!parvo.risk_factors.iter().any(|f| f.contains("DHPP")));
    }

    #[test]
    fn protection_expires_after_its_duration() {
        let catalog = Catalog::builtin();
        let mut dog = pet(Species::Dog, 20);
        dog.record_vaccination(VaccinationRecord {
            vaccine_id: "dhpp".into(),
            vaccine_name: "DHPP".into(),
            age_months_at_dose: 3,
            administered_at: dog.created_at,
        });
        let parvo = find(&disease_risk(&dog, &catalog), "canine-parvovirus").clone();
        assert_eq!(parvo.risk_percentage, 20.0);
        assert!(parvo.risk_factors.iter().any(|f| f.contains("lapsed")));
    }

    #[test]
    fn only_species_diseases_are_assessed() {
        let catalog = Catalog::builtin();
        let risks = disease_risk(&pet(Species::Hamster, 10), &catalog);
        assert!(risks.iter().all(|r| r.disease.affects(Species::Hamster)));
        assert_eq!(risks.len(), 2);
    }

    #[test]
    fn empty_catalog_yields_no_assessments() {
        assert!(disease_risk(&pet(Species::Cat, 10), &Catalog::default()).is_empty());
    }
}
