// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Required and overdue vaccination schedules.

use petsim_core::{PetRecord, VaccinationRecord, VaccineRef};

use crate::catalog::Catalog;

/// Most recent dose of `vaccine` in the pet's history.
///
/// Records carrying a catalog id are matched by id. Records whose id is empty
/// or unknown to the catalog fall back to a case-insensitive, whole-word name
/// match in either direction ("Rabies" matches "Rabies booster", "dh" matches
/// nothing).
pub fn last_dose<'a>(
    pet: &'a PetRecord,
    vaccine: &VaccineRef,
    catalog: &Catalog,
) -> Option<&'a VaccinationRecord> {
    let wanted = words(&vaccine.name);
    pet.vaccinations
        .iter()
        .filter(|record| {
            if catalog.vaccine(&record.vaccine_id).is_some() {
                return record.vaccine_id == vaccine.id;
            }
            let given = words(&record.vaccine_name);
            !given.is_empty() && (contains_run(&given, &wanted) || contains_run(&wanted, &given))
        })
        .max_by_key(|record| record.administered_at)
}

fn words(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `needle` occurs as a contiguous run of words in `haystack`.
fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Whether the dose's booster interval has elapsed in pet-months.
fn booster_lapsed(vaccine: &VaccineRef, dose: &VaccinationRecord, age_months: u32) -> bool {
    vaccine
        .booster_interval_months
        .is_some_and(|interval| age_months.saturating_sub(dose.age_months_at_dose) >= interval)
}

/// Vaccines the pet should receive now.
///
/// Species and age window must match. A vaccine already given is required
/// again only once its booster interval has lapsed.
pub fn required_vaccines(pet: &PetRecord, catalog: &Catalog) -> Vec<VaccineRef> {
    catalog
        .vaccines_for(pet.species)
        .filter(|v| v.age_eligible(pet.age_months))
        .filter(|v| match last_dose(pet, v, catalog) {
            None => true,
            Some(dose) => booster_lapsed(v, dose, pet.age_months),
        })
        .cloned()
        .collect()
}

/// Required vaccines past their deadline: a first dose older than its
/// deadline age, or a booster whose interval has lapsed.
pub fn overdue_vaccines(pet: &PetRecord, catalog: &Catalog) -> Vec<VaccineRef> {
    required_vaccines(pet, catalog)
        .into_iter()
        .filter(|v| match last_dose(pet, v, catalog) {
            None => v
                .first_dose_deadline_months
                .is_some_and(|deadline| pet.age_months > deadline),
            Some(_) => true,
        })
        .collect()
}
