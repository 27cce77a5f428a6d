// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Probabilistic disease onset and the ongoing cost of active diseases.

use chrono::{DateTime, Utc};
use petsim_core::{DiseaseRef, GrowthStage, PetRecord};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::catalog::Catalog;
use crate::risk::disease_risk;
use crate::vaccines::overdue_vaccines;

const BASE_THRESHOLD: f64 = 0.05;
const VULNERABLE_THRESHOLD: f64 = 0.15;
const OVERDUE_BONUS: f64 = 0.10;
const LOW_HEALTH_BONUS: f64 = 0.05;
const MAX_THRESHOLD: f64 = 0.25;
const LOW_HEALTH: u8 = 50;
/// Only diseases above this risk percentage are onset candidates.
const CANDIDATE_RISK_PERCENT: f64 = 10.0;

/// An active disease resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDisease {
    pub disease: DiseaseRef,
    /// When the currently active episode was recorded.
    pub since: DateTime<Utc>,
}

/// Stat loss per decay interval from all active diseases combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiseaseImpact {
    pub health: u32,
    pub happiness: u32,
}

impl DiseaseImpact {
    pub fn is_zero(&self) -> bool {
        self.health == 0 && self.happiness == 0
    }
}

/// Onset probability for this pet in one draw.
pub fn onset_threshold(pet: &PetRecord, catalog: &Catalog) -> f64 {
    let mut threshold = match pet.growth_stage() {
        GrowthStage::Baby | GrowthStage::Senior => VULNERABLE_THRESHOLD,
        GrowthStage::Young | GrowthStage::Adult => BASE_THRESHOLD,
    };
    if !overdue_vaccines(pet, catalog).is_empty() {
        threshold += OVERDUE_BONUS;
    }
    if pet.stats.health < LOW_HEALTH {
        threshold += LOW_HEALTH_BONUS;
    }
    threshold.min(MAX_THRESHOLD)
}

/// Roll for a new disease.
///
/// Draws once from `rng`; when the draw falls under [`onset_threshold`], picks
/// uniformly among diseases with risk above 10% that the pet does not already
/// have. Callers only roll when the pet aged up in the current pass.
pub fn maybe_trigger_disease<R: Rng + ?Sized>(
    pet: &PetRecord,
    catalog: &Catalog,
    rng: &mut R,
) -> Option<DiseaseRef> {
    let threshold = onset_threshold(pet, catalog);
    let roll: f64 = rng.gen_range(0.0..1.0);
    if roll >= threshold {
        return None;
    }

    let active: Vec<&str> = pet
        .active_diseases()
        .into_iter()
        .map(|d| d.disease_id.as_str())
        .collect();
    let candidates: Vec<DiseaseRef> = disease_risk(pet, catalog)
        .into_iter()
        .filter(|r| r.risk_percentage > CANDIDATE_RISK_PERCENT)
        .filter(|r| !active.contains(&r.disease.id.as_str()))
        .map(|r| r.disease)
        .collect();

    let picked = candidates.choose(rng).cloned();
    debug!(
        pet_id = %pet.id,
        roll,
        threshold,
        candidates = candidates.len(),
        picked = picked.as_ref().map(|d| d.id.as_str()),
        "disease onset roll hit"
    );
    picked
}

/// Active diseases on the record that the catalog knows about.
pub fn active_diseases(pet: &PetRecord, catalog: &Catalog) -> Vec<ActiveDisease> {
    pet.active_diseases()
        .into_iter()
        .filter_map(|record| match catalog.disease(&record.disease_id) {
            Some(disease) => Some(ActiveDisease {
                disease: disease.clone(),
                since: record.recorded_at,
            }),
            None => {
                debug!(
                    pet_id = %pet.id,
                    disease_id = %record.disease_id,
                    "active disease missing from catalog"
                );
                None
            }
        })
        .collect()
}

/// Combined per-interval impact of `active`.
pub fn disease_impact(active: &[ActiveDisease]) -> DiseaseImpact {
    active.iter().fold(DiseaseImpact::default(), |acc, a| DiseaseImpact {
        health: acc.health + u32::from(a.disease.health_impact),
        happiness: acc.happiness + u32::from(a.disease.happiness_impact),
    })
}
