// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for vaccination scheduling and risk across a pet's life.

use chrono::{Duration, TimeZone, Utc};
use petsim_core::{PetRecord, Species, VaccinationRecord};
use petsim_health::{Catalog, disease_risk, overdue_vaccines, required_vaccines};
use proptest::prelude::*;

fn dog(age: u32) -> PetRecord {
    let t = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
    let mut pet = PetRecord::new("owner-1", "Biscuit", Species::Dog, 5.0, t);
    pet.age_months = age;
    pet
}

#[test]
fn dhpp_moves_from_required_to_overdue_as_the_dog_ages() {
    let catalog = Catalog::builtin();
    let mut pet = dog(7);

    let required: Vec<String> = required_vaccines(&pet, &catalog)
        .into_iter()
        .map(|v| v.id)
        .collect();
    assert!(required.contains(&"dhpp".to_string()));
    assert!(!overdue_vaccines(&pet, &catalog).iter().any(|v| v.id == "dhpp"));

    pet.age_months = 16;
    assert!(overdue_vaccines(&pet, &catalog).iter().any(|v| v.id == "dhpp"));
}

#[test]
fn vaccinating_clears_the_schedule_and_lowers_risk() {
    let catalog = Catalog::builtin();
    let mut pet = dog(16);
    let before = disease_risk(&pet, &catalog);

    for vaccine in required_vaccines(&pet, &catalog) {
        pet.record_vaccination(VaccinationRecord {
            vaccine_id: vaccine.id.clone(),
            vaccine_name: vaccine.name.clone(),
            age_months_at_dose: pet.age_months,
            administered_at: pet.created_at + Duration::hours(16),
        });
    }

    assert!(required_vaccines(&pet, &catalog).is_empty());
    assert!(overdue_vaccines(&pet, &catalog).is_empty());

    let after = disease_risk(&pet, &catalog);
    let parvo = |list: &[petsim_health::RiskAssessment]| {
        list.iter()
            .find(|r| r.disease.id == "canine-parvovirus")
            .map(|r| r.risk_percentage)
            .unwrap_or_default()
    };
    assert!(parvo(&after) < parvo(&before));
}

proptest! {
    #[test]
    fn overdue_is_always_a_subset_of_required(age in 0u32..200, dosed_at in proptest::option::of(0u32..200)) {
        let catalog = Catalog::builtin();
        let mut pet = dog(age);
        if let Some(at) = dosed_at.filter(|at| *at <= age) {
            pet.record_vaccination(VaccinationRecord {
                vaccine_id: "dhpp".into(),
                vaccine_name: "DHPP".into(),
                age_months_at_dose: at,
                administered_at: pet.created_at,
            });
        }
        let required: Vec<String> = required_vaccines(&pet, &catalog).into_iter().map(|v| v.id).collect();
        for overdue in overdue_vaccines(&pet, &catalog) {
            prop_assert!(required.contains(&overdue.id));
        }
    }

    #[test]
    fn risk_percentages_are_bounded(age in 0u32..300) {
        let catalog = Catalog::builtin();
        for risk in disease_risk(&dog(age), &catalog) {
            prop_assert!((0.0..=100.0).contains(&risk.risk_percentage));
            prop_assert_eq!(risk.is_high_risk, risk.risk_percentage > 30.0);
        }
    }
}
