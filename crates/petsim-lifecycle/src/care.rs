// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User care actions.
//!
//! Each action is a bounded stat delta plus, where relevant, a "last event"
//! timestamp or an appended history entry. Callers reconcile the record up to
//! `now` before applying an action so the delta lands on current state.

use chrono::{DateTime, Utc};
use petsim_core::{
    DiseaseRecord, DiseaseRef, DiseaseStatus, PetRecord, PetsimError, Stat, VaccinationRecord,
    VaccineRef,
};
use tracing::debug;

/// Health restored when a disease is treated.
const TREATMENT_HEALTH_BONUS: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum CareAction {
    Feed,
    Play,
    Clean,
    Rest,
    Vaccinate(VaccineRef),
    ContractDisease(DiseaseRef),
    /// Treat the active disease with this catalog id.
    TreatDisease(String),
}

impl CareAction {
    /// Short name used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            CareAction::Feed => "feed",
            CareAction::Play => "play",
            CareAction::Clean => "clean",
            CareAction::Rest => "rest",
            CareAction::Vaccinate(_) => "vaccinate",
            CareAction::ContractDisease(_) => "contract_disease",
            CareAction::TreatDisease(_) => "treat_disease",
        }
    }

    /// Apply the action to `pet` at `now`.
    ///
    /// Fails with [`PetsimError::InvalidInput`] when the action makes no sense
    /// for this pet (wrong species, disease already active, nothing to treat);
    /// the record is left untouched in that case.
    pub fn apply(&self, pet: &mut PetRecord, now: DateTime<Utc>) -> Result<(), PetsimError> {
        match self {
            CareAction::Feed => {
                pet.stats.adjust(Stat::Hunger, -30);
                pet.stats.adjust(Stat::Happiness, 5);
                pet.stats.adjust(Stat::Health, 2);
                pet.last_fed = now;
            }
            CareAction::Play => {
                pet.stats.adjust(Stat::Happiness, 20);
                pet.stats.adjust(Stat::Energy, -10);
                pet.stats.adjust(Stat::Hunger, 5);
                pet.last_played = now;
            }
            CareAction::Clean => {
                pet.stats.adjust(Stat::Cleanliness, 40);
                pet.stats.adjust(Stat::Happiness, 5);
                pet.last_cleaned = now;
            }
            CareAction::Rest => {
                pet.stats.adjust(Stat::Energy, 30);
                pet.stats.adjust(Stat::Happiness, 2);
            }
            CareAction::Vaccinate(vaccine) => {
                if !vaccine.applies_to(pet.species) {
                    return Err(PetsimError::InvalidInput(format!(
                        "vaccine {} is not given to {}",
                        vaccine.id, pet.species
                    )));
                }
                pet.record_vaccination(VaccinationRecord {
                    vaccine_id: vaccine.id.clone(),
                    vaccine_name: vaccine.name.clone(),
                    age_months_at_dose: pet.age_months,
                    administered_at: now,
                });
                pet.stats.adjust(Stat::Health, 5);
                pet.stats.adjust(Stat::Happiness, -5);
            }
            CareAction::ContractDisease(disease) => {
                if pet.active_diseases().iter().any(|d| d.disease_id == disease.id) {
                    return Err(PetsimError::InvalidInput(format!(
                        "{} already has {}",
                        pet.name, disease.name
                    )));
                }
                pet.record_disease(DiseaseRecord {
                    disease_id: disease.id.clone(),
                    disease_name: disease.name.clone(),
                    severity: disease.severity,
                    recorded_at: now,
                    status: DiseaseStatus::Active,
                });
                pet.stats
                    .adjust(Stat::Health, -i32::from(disease.health_impact));
                pet.stats
                    .adjust(Stat::Happiness, -i32::from(disease.happiness_impact));
            }
            CareAction::TreatDisease(disease_id) => {
                let active = pet
                    .active_diseases()
                    .into_iter()
                    .find(|d| &d.disease_id == disease_id)
                    .cloned()
                    .ok_or_else(|| {
                        PetsimError::InvalidInput(format!(
                            "{} has no active disease {disease_id}",
                            pet.name
                        ))
                    })?;
                pet.record_disease(DiseaseRecord {
                    recorded_at: now,
                    status: DiseaseStatus::Treated,
                    ..active
                });
                pet.stats.adjust(Stat::Health, TREATMENT_HEALTH_BONUS);
            }
        }

        debug!(pet_id = %pet.id, action = self.label(), "applied care action");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use petsim_core::{AgeRisk, Severity, Species};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap()
    }

    fn pet() -> PetRecord {
        PetRecord::new("owner", "Rex", Species::Dog, 1.0, t0())
    }

    fn parvo() -> DiseaseRef {
        DiseaseRef {
            id: "parvovirus".into(),
            name: "Parvovirus".into(),
            severity: Severity::Severe,
            health_impact: 15,
            happiness_impact: 10,
            min_duration_days: 5,
            max_duration_days: 10,
            treatment_cost: 300.0,
            species: vec![Species::Dog],
            symptoms: vec![],
            prevention_tips: vec![],
            risk_by_age: vec![AgeRisk {
                max_age_months: None,
                risk: 0.2,
            }],
        }
    }

    fn rabies() -> VaccineRef {
        VaccineRef {
            id: "rabies".into(),
            name: "Rabies".into(),
            target_disease: "rabies".into(),
            protection_months: 12,
            cost: 30.0,
            species: vec![Species::Dog, Species::Cat],
            min_age_months: 3,
            max_age_months: None,
            first_dose_deadline_months: Some(6),
            booster_interval_months: Some(12),
            residual_risk: 0.03,
            side_effects: vec![],
        }
    }

    #[test]
    fn feed_lowers_hunger_and_stamps_last_fed() {
        let mut p = pet();
        let later = t0() + Duration::hours(4);
        CareAction::Feed.apply(&mut p, later).unwrap();
        assert_eq!(p.stats.hunger, 0);
        assert_eq!(p.stats.happiness, 85);
        assert_eq!(p.stats.health, 100);
        assert_eq!(p.last_fed, later);
    }

    #[test]
    fn play_costs_energy_and_adds_hunger() {
        let mut p = pet();
        CareAction::Play.apply(&mut p, t0()).unwrap();
        assert_eq!(p.stats.happiness, 100);
        assert_eq!(p.stats.energy, 90);
        assert_eq!(p.stats.hunger, 35);
    }

    #[test]
    fn vaccination_appends_history_at_current_age() {
        let mut p = pet();
        p.age_months = 4;
        CareAction::Vaccinate(rabies()).apply(&mut p, t0()).unwrap();
        assert_eq!(p.vaccinations.len(), 1);
        assert_eq!(p.vaccinations[0].vaccine_id, "rabies");
        assert_eq!(p.vaccinations[0].age_months_at_dose, 4);
        assert_eq!(p.stats.happiness, 75);
    }

    #[test]
    fn vaccine_for_another_species_is_rejected() {
        let mut p = PetRecord::new("owner", "Tweety", Species::Bird, 0.02, t0());
        let before = p.clone();
        let err = CareAction::Vaccinate(rabies()).apply(&mut p, t0());
        assert!(matches!(err, Err(PetsimError::InvalidInput(_))));
        assert_eq!(p, before);
    }

    #[test]
    fn contract_then_treat_keeps_full_history() {
        let mut p = pet();
        CareAction::ContractDisease(parvo()).apply(&mut p, t0()).unwrap();
        assert_eq!(p.stats.health, 85);
        assert_eq!(p.active_diseases().len(), 1);

        let again = CareAction::ContractDisease(parvo()).apply(&mut p, t0());
        assert!(again.is_err());

        CareAction::TreatDisease("parvovirus".into())
            .apply(&mut p, t0() + Duration::days(1))
            .unwrap();
        assert!(p.active_diseases().is_empty());
        assert_eq!(p.diseases.len(), 2);
        assert_eq!(p.diseases[1].status, DiseaseStatus::Treated);
        assert_eq!(p.diseases[1].severity, Severity::Severe);
        assert_eq!(p.stats.health, 95);
    }

    #[test]
    fn treating_a_healthy_pet_fails() {
        let mut p = pet();
        let err = CareAction::TreatDisease("parvovirus".into()).apply(&mut p, t0());
        assert!(matches!(err, Err(PetsimError::InvalidInput(_))));
    }
}
