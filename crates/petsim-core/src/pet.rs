// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pet record: the unit of simulation.
//!
//! A [`PetRecord`] carries the five bounded vital stats, the bookkeeping
//! timestamps the reconciliation engine keys off, and two append-only
//! histories (vaccinations and diseases).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lower bound of every vital stat.
pub const STAT_MIN: u8 = 0;
/// Upper bound of every vital stat.
pub const STAT_MAX: u8 = 100;

/// Clamp a signed intermediate value into the `[0, 100]` stat range.
pub fn clamp_stat(value: i32) -> u8 {
    value.clamp(i32::from(STAT_MIN), i32::from(STAT_MAX)) as u8
}

/// The fixed set of species a pet can be.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Hamster,
}

impl Species {
    /// Weight at age zero, in kilograms.
    pub fn birth_weight_kg(self) -> f64 {
        match self {
            Species::Dog => 0.4,
            Species::Cat => 0.1,
            Species::Bird => 0.01,
            Species::Rabbit => 0.06,
            Species::Hamster => 0.003,
        }
    }

    /// Plateau weight reached by adult animals, in kilograms.
    pub fn adult_weight_kg(self) -> f64 {
        match self {
            Species::Dog => 25.0,
            Species::Cat => 4.5,
            Species::Bird => 0.09,
            Species::Rabbit => 2.2,
            Species::Hamster => 0.12,
        }
    }
}

/// Life-stage bucket derived purely from age in pet-months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthStage {
    Baby,
    Young,
    Adult,
    Senior,
}

impl GrowthStage {
    /// BABY 0–6, YOUNG 7–24, ADULT 25–84, SENIOR 85+.
    pub fn for_age(age_months: u32) -> Self {
        match age_months {
            0..=6 => GrowthStage::Baby,
            7..=24 => GrowthStage::Young,
            25..=84 => GrowthStage::Adult,
            _ => GrowthStage::Senior,
        }
    }
}

/// Identifies one of the five vital stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Stat {
    Health,
    Happiness,
    Hunger,
    Energy,
    Cleanliness,
}

/// The five bounded vital stats. Hunger grows towards 100 when neglected;
/// the other four fall towards 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalStats {
    pub health: u8,
    pub happiness: u8,
    pub hunger: u8,
    pub energy: u8,
    pub cleanliness: u8,
}

impl Default for VitalStats {
    fn default() -> Self {
        Self {
            health: 100,
            happiness: 80,
            hunger: 30,
            energy: 100,
            cleanliness: 100,
        }
    }
}

impl VitalStats {
    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Health => self.health,
            Stat::Happiness => self.happiness,
            Stat::Hunger => self.hunger,
            Stat::Energy => self.energy,
            Stat::Cleanliness => self.cleanliness,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut u8 {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Happiness => &mut self.happiness,
            Stat::Hunger => &mut self.hunger,
            Stat::Energy => &mut self.energy,
            Stat::Cleanliness => &mut self.cleanliness,
        }
    }

    /// Apply a signed delta, clamping the result into `[0, 100]`.
    pub fn adjust(&mut self, stat: Stat, delta: i32) {
        let slot = self.slot(stat);
        *slot = clamp_stat(i32::from(*slot) + delta);
    }

    /// Lower the stat to `cap` if it currently exceeds it.
    pub fn cap(&mut self, stat: Stat, cap: u8) {
        let slot = self.slot(stat);
        *slot = (*slot).min(cap.min(STAT_MAX));
    }
}

/// One administered vaccine dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    /// Canonical catalog identifier. Empty for legacy free-text records.
    pub vaccine_id: String,
    /// Display name at the time of administration.
    pub vaccine_name: String,
    /// Pet age when the dose was given.
    pub age_months_at_dose: u32,
    pub administered_at: DateTime<Utc>,
}

/// Severity tier shared by disease reference entries and history records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// Status carried by a disease history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseStatus {
    Active,
    Treated,
    Recovered,
}

/// One entry in the append-only disease log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub disease_id: String,
    pub disease_name: String,
    pub severity: Severity,
    pub recorded_at: DateTime<Utc>,
    pub status: DiseaseStatus,
}

/// A simulated animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub species: Species,
    pub age_months: u32,
    pub weight_kg: f64,
    pub stats: VitalStats,
    pub last_fed: DateTime<Utc>,
    pub last_played: DateTime<Utc>,
    pub last_cleaned: DateTime<Utc>,
    pub last_age_update: DateTime<Utc>,
    pub last_stats_decay: DateTime<Utc>,
    pub vaccinations: Vec<VaccinationRecord>,
    pub diseases: Vec<DiseaseRecord>,
    pub created_at: DateTime<Utc>,
}

impl PetRecord {
    /// Create a freshly adopted pet: age 1, default stats, every bookkeeping
    /// timestamp set to `now`.
    pub fn new(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        species: Species,
        weight_kg: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            species,
            age_months: 1,
            weight_kg,
            stats: VitalStats::default(),
            last_fed: now,
            last_played: now,
            last_cleaned: now,
            last_age_update: now,
            last_stats_decay: now,
            vaccinations: Vec::new(),
            diseases: Vec::new(),
            created_at: now,
        }
    }

    pub fn growth_stage(&self) -> GrowthStage {
        GrowthStage::for_age(self.age_months)
    }

    /// Append a vaccination record. History is never rewritten.
    pub fn record_vaccination(&mut self, record: VaccinationRecord) {
        self.vaccinations.push(record);
    }

    /// Append a disease record. History is never rewritten.
    pub fn record_disease(&mut self, record: DiseaseRecord) {
        self.diseases.push(record);
    }

    /// Latest history entry for every disease the pet has ever had.
    pub fn latest_disease_entries(&self) -> Vec<&DiseaseRecord> {
        let mut latest: HashMap<&str, &DiseaseRecord> = HashMap::new();
        for record in &self.diseases {
            latest.insert(record.disease_id.as_str(), record);
        }
        let mut entries: Vec<&DiseaseRecord> = latest.into_values().collect();
        entries.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        entries
    }

    /// Diseases whose most recent entry is still `Active`.
    pub fn active_diseases(&self) -> Vec<&DiseaseRecord> {
        self.latest_disease_entries()
            .into_iter()
            .filter(|r| r.status == DiseaseStatus::Active)
            .collect()
    }

    /// Most recent dose of the given canonical vaccine id, if any.
    pub fn last_dose_of(&self, vaccine_id: &str) -> Option<&VaccinationRecord> {
        self.vaccinations
            .iter()
            .filter(|v| v.vaccine_id == vaccine_id)
            .max_by_key(|v| v.administered_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_pet_has_defaults_and_aligned_timestamps() {
        let pet = PetRecord::new("owner-1", "Rex", Species::Dog, 1.0, t0());
        assert_eq!(pet.age_months, 1);
        assert_eq!(pet.stats, VitalStats::default());
        assert_eq!(pet.last_fed, t0());
        assert_eq!(pet.last_stats_decay, t0());
        assert_eq!(pet.last_age_update, t0());
        assert_eq!(pet.created_at, t0());
        assert!(pet.vaccinations.is_empty());
        assert_eq!(pet.growth_stage(), GrowthStage::Baby);
    }

    #[test]
    fn growth_stage_brackets() {
        assert_eq!(GrowthStage::for_age(0), GrowthStage::Baby);
        assert_eq!(GrowthStage::for_age(6), GrowthStage::Baby);
        assert_eq!(GrowthStage::for_age(7), GrowthStage::Young);
        assert_eq!(GrowthStage::for_age(24), GrowthStage::Young);
        assert_eq!(GrowthStage::for_age(25), GrowthStage::Adult);
        assert_eq!(GrowthStage::for_age(84), GrowthStage::Adult);
        assert_eq!(GrowthStage::for_age(85), GrowthStage::Senior);
    }

    #[test]
    fn species_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(Species::from_str("Dog").unwrap(), Species::Dog);
        assert_eq!(Species::from_str("hamster").unwrap(), Species::Hamster);
        assert!(Species::from_str("dragon").is_err());
        assert_eq!(Species::Cat.to_string(), "cat");
    }

    #[test]
    fn cap_never_raises_a_stat() {
        let mut stats = VitalStats {
            health: 50,
            ..VitalStats::default()
        };
        stats.cap(Stat::Health, 90);
        assert_eq!(stats.health, 50);
        stats.cap(Stat::Energy, 80);
        assert_eq!(stats.energy, 80);
    }

    #[test]
    fn active_diseases_uses_latest_entry() {
        let mut pet = PetRecord::new("o", "Tom", Species::Cat, 1.0, t0());
        pet.record_disease(DiseaseRecord {
            disease_id: "feline-flu".into(),
            disease_name: "Feline Flu".into(),
            severity: Severity::Moderate,
            recorded_at: t0(),
            status: DiseaseStatus::Active,
        });
        assert_eq!(pet.active_diseases().len(), 1);

        pet.record_disease(DiseaseRecord {
            disease_id: "feline-flu".into(),
            disease_name: "Feline Flu".into(),
            severity: Severity::Moderate,
            recorded_at: t0() + chrono::Duration::days(2),
            status: DiseaseStatus::Treated,
        });
        assert!(pet.active_diseases().is_empty());
        assert_eq!(pet.diseases.len(), 2, "history is append-only");
    }

    proptest! {
        #[test]
        fn adjust_stays_in_bounds(start in 0u8..=100, delta in -500i32..500) {
            let mut stats = VitalStats { hunger: start, ..VitalStats::default() };
            stats.adjust(Stat::Hunger, delta);
            prop_assert!(stats.hunger <= STAT_MAX);
        }
    }
}
