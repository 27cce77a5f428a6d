// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decay and aging reconciliation.
//!
//! Every step is keyed off the timestamps stored on the record, so running a
//! pass more often than the thresholds is a no-op and no elapsed time is ever
//! counted twice. A stored timestamp ahead of `now` yields zero elapsed time
//! and is left where it is.

use chrono::{DateTime, Utc};
use petsim_config::model::{DecayRates, LifecycleConfig};
use petsim_core::{GrowthStage, PetRecord, Stat};
use tracing::debug;

use crate::growth::weight_for_age;

/// Upper bound on decay intervals that can still move a stat. Rates are
/// monotone per stat, so after this many intervals every stat sits at a bound.
const SATURATION_INTERVALS: u32 = 256;

/// Hunger at or above this after an interval costs health.
const NEGLECT_HUNGER: u8 = 80;
/// Cleanliness at or below this after an interval costs health.
const NEGLECT_CLEANLINESS: u8 = 20;

/// Which rate table a pass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Time that elapsed while the process was not running or was backgrounded.
    CatchUp,
    /// Foreground timer tick.
    Live,
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub pet: PetRecord,
    /// Whether anything on the record differs from the input.
    pub changed: bool,
    pub decay_intervals: u32,
    pub months_aged: u32,
}

/// Pure reconciliation engine parameterised by the lifecycle configuration.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: LifecycleConfig,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl Reconciler {
    pub fn new(config: LifecycleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Catch-up reconciliation with the background rates.
    pub fn reconcile_catch_up(&self, pet: &PetRecord, now: DateTime<Utc>) -> Reconciliation {
        self.reconcile(pet, now, TickMode::CatchUp)
    }

    /// Bring `pet` up to `now`.
    pub fn reconcile(&self, pet: &PetRecord, now: DateTime<Utc>, mode: TickMode) -> Reconciliation {
        let mut next = pet.clone();

        let decay_intervals = self.apply_decay(&mut next, now, self.rates(mode));
        let months_aged = self.apply_aging(&mut next, now);

        if decay_intervals > 0 || months_aged > 0 {
            self.apply_stage_effects(&mut next, now, decay_intervals);
        }

        let changed = next != *pet;
        if changed {
            debug!(
                pet_id = %pet.id,
                ?mode,
                decay_intervals,
                months_aged,
                age_months = next.age_months,
                "reconciled pet"
            );
        }

        Reconciliation {
            pet: next,
            changed,
            decay_intervals,
            months_aged,
        }
    }

    fn rates(&self, mode: TickMode) -> DecayRates {
        match mode {
            TickMode::CatchUp => self.config.background,
            TickMode::Live => self.config.live,
        }
    }

    /// Apply whole decay intervals since `last_stats_decay`. Returns the count.
    fn apply_decay(&self, pet: &mut PetRecord, now: DateTime<Utc>, rates: DecayRates) -> u32 {
        let interval = i64::from(self.config.decay_interval_minutes.max(1));
        let elapsed = (now - pet.last_stats_decay).num_minutes().max(0);
        let intervals = u32::try_from(elapsed / interval).unwrap_or(u32::MAX);
        if intervals == 0 {
            return 0;
        }

        for _ in 0..intervals.min(SATURATION_INTERVALS) {
            let stats = &mut pet.stats;
            stats.adjust(Stat::Hunger, i32::from(rates.hunger));
            stats.adjust(Stat::Energy, -i32::from(rates.energy));
            stats.adjust(Stat::Cleanliness, -i32::from(rates.cleanliness));
            stats.adjust(Stat::Happiness, -i32::from(rates.happiness));

            if stats.hunger >= NEGLECT_HUNGER {
                stats.adjust(Stat::Health, -2);
            }
            if stats.cleanliness <= NEGLECT_CLEANLINESS {
                stats.adjust(Stat::Health, -1);
            }
        }

        pet.last_stats_decay = now;
        intervals
    }

    /// Add one pet-month per elapsed aging interval. Returns the months added.
    fn apply_aging(&self, pet: &mut PetRecord, now: DateTime<Utc>) -> u32 {
        let interval = i64::from(self.config.aging_interval_minutes.max(1));
        let elapsed = (now - pet.last_age_update).num_minutes().max(0);
        let months = u32::try_from(elapsed / interval).unwrap_or(u32::MAX);
        if months == 0 {
            return 0;
        }

        pet.age_months = pet.age_months.saturating_add(months);
        pet.weight_kg = weight_for_age(pet.species, pet.age_months);
        pet.last_age_update = now;
        months
    }

    /// Clamp stats to the ceilings of the pet's growth stage. Care actions
    /// call this after applying their effects.
    pub fn enforce_stage_caps(&self, pet: &mut PetRecord) {
        if pet.growth_stage() == GrowthStage::Senior {
            pet.stats.cap(Stat::Health, self.config.senior_health_cap);
            pet.stats.cap(Stat::Energy, self.config.senior_energy_cap);
        }
    }

    fn apply_stage_effects(&self, pet: &mut PetRecord, now: DateTime<Utc>, decay_intervals: u32) {
        match pet.growth_stage() {
            GrowthStage::Senior => self.enforce_stage_caps(pet),
            GrowthStage::Baby if decay_intervals > 0 => {
                let unfed_minutes = (now - pet.last_fed).num_minutes();
                if unfed_minutes > i64::from(self.config.baby_unfed_hours) * 60 {
                    let steps = i32::try_from(decay_intervals.min(SATURATION_INTERVALS))
                        .unwrap_or(i32::MAX);
                    pet.stats.adjust(Stat::Hunger, 2 * steps);
                    pet.stats.adjust(Stat::Happiness, -2 * steps);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use petsim_core::{Species, VitalStats};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 18, 0, 0).unwrap()
    }

    fn adult_dog() -> PetRecord {
        let mut pet = PetRecord::new("owner", "Rex", Species::Dog, 25.0, now());
        pet.age_months = 30;
        pet
    }

    #[test]
    fn hunger_rises_two_background_intervals_after_65_minutes() {
        let mut pet = adult_dog();
        pet.stats.hunger = 70;
        pet.last_stats_decay = now() - Duration::minutes(65);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());

        assert_eq!(out.decay_intervals, 2);
        assert_eq!(out.pet.stats.hunger, 70 + 2 * 6);
        assert_eq!(out.pet.stats.energy, 100 - 2 * 4);
        assert_eq!(out.pet.stats.cleanliness, 100 - 2 * 3);
        assert_eq!(out.pet.last_stats_decay, now());
        assert!(out.changed);
    }

    #[test]
    fn aging_three_hours_adds_three_months_and_regrows() {
        let mut pet = adult_dog();
        pet.age_months = 5;
        pet.weight_kg = weight_for_age(Species::Dog, 5);
        pet.last_age_update = now() - Duration::hours(3);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());

        assert_eq!(out.months_aged, 3);
        assert_eq!(out.pet.age_months, 8);
        assert_eq!(out.pet.weight_kg, weight_for_age(Species::Dog, 8));
        assert!(out.pet.weight_kg > pet.weight_kg);
        assert_eq!(out.pet.last_age_update, now());
    }

    #[test]
    fn below_thresholds_nothing_changes() {
        let mut pet = adult_dog();
        pet.last_stats_decay = now() - Duration::minutes(29);
        pet.last_age_update = now() - Duration::minutes(59);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert!(!out.changed);
        assert_eq!(out.pet, pet);
    }

    #[test]
    fn future_timestamps_count_as_zero_elapsed() {
        let mut pet = adult_dog();
        pet.last_stats_decay = now() + Duration::hours(5);
        pet.last_age_update = now() + Duration::hours(5);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert!(!out.changed);
        assert_eq!(out.pet.last_stats_decay, now() + Duration::hours(5));
    }

    #[test]
    fn live_ticks_use_gentler_rates() {
        let mut pet = adult_dog();
        pet.stats.hunger = 10;
        pet.last_stats_decay = now() - Duration::minutes(30);

        let out = Reconciler::default().reconcile(&pet, now(), TickMode::Live);
        assert_eq!(out.pet.stats.hunger, 15);
        assert_eq!(out.pet.stats.energy, 97);
        assert_eq!(out.pet.stats.cleanliness, 98);
        assert_eq!(out.pet.stats.happiness, 79);
    }

    #[test]
    fn starving_pet_loses_health_per_interval() {
        let mut pet = adult_dog();
        pet.stats.hunger = 90;
        pet.last_stats_decay = now() - Duration::minutes(90);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert_eq!(out.pet.stats.health, 100 - 3 * 2);
    }

    #[test]
    fn senior_caps_apply_when_the_pass_does_work() {
        let mut pet = adult_dog();
        pet.age_months = 90;
        pet.stats = VitalStats {
            health: 100,
            energy: 100,
            ..VitalStats::default()
        };
        pet.last_stats_decay = now() - Duration::minutes(30);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert_eq!(out.pet.stats.health, 90);
        assert_eq!(out.pet.stats.energy, 80);
    }

    #[test]
    fn stage_caps_clamp_seniors_only() {
        let reconciler = Reconciler::default();
        let mut senior = adult_dog();
        senior.age_months = 90;
        senior.stats.health = 100;
        senior.stats.energy = 100;
        reconciler.enforce_stage_caps(&mut senior);
        assert_eq!((senior.stats.health, senior.stats.energy), (90, 80));

        let mut adult = adult_dog();
        adult.stats.energy = 100;
        reconciler.enforce_stage_caps(&mut adult);
        assert_eq!(adult.stats.energy, 100);
    }

    #[test]
    fn unfed_baby_takes_extra_penalty() {
        let mut pet = PetRecord::new("owner", "Pip", Species::Cat, 0.1, now());
        pet.age_months = 2;
        pet.last_fed = now() - Duration::hours(3);
        pet.last_stats_decay = now() - Duration::minutes(60);
        pet.last_age_update = now();

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert_eq!(out.pet.stats.hunger, 30 + 2 * 6 + 2 * 2);
        assert_eq!(out.pet.stats.happiness, 80 - 2 * 2 - 2 * 2);
    }

    #[test]
    fn fed_baby_decays_normally() {
        let mut pet = PetRecord::new("owner", "Pip", Species::Cat, 0.1, now());
        pet.last_fed = now() - Duration::minutes(60);
        pet.last_stats_decay = now() - Duration::minutes(60);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert_eq!(out.pet.stats.hunger, 30 + 2 * 6);
    }

    #[test]
    fn reconciling_twice_at_the_same_instant_is_a_no_op() {
        let mut pet = adult_dog();
        pet.last_stats_decay = now() - Duration::days(3);
        pet.last_age_update = now() - Duration::days(3);

        let reconciler = Reconciler::default();
        let once = reconciler.reconcile_catch_up(&pet, now());
        let twice = reconciler.reconcile_catch_up(&once.pet, now());
        assert_eq!(once.pet, twice.pet);
        assert!(!twice.changed);
    }

    #[test]
    fn long_absence_saturates_without_overflow() {
        let mut pet = adult_dog();
        pet.last_stats_decay = now() - Duration::days(3650);
        pet.last_age_update = now() - Duration::days(3650);

        let out = Reconciler::default().reconcile_catch_up(&pet, now());
        assert_eq!(out.pet.stats.hunger, 100);
        assert_eq!(out.pet.stats.energy, 0);
        assert_eq!(out.pet.stats.health, 0);
        assert_eq!(out.pet.age_months, 30 + 24 * 3650);
    }

    #[test]
    fn custom_interval_lengths_are_respected() {
        let config = LifecycleConfig {
            decay_interval_minutes: 10,
            aging_interval_minutes: 120,
            ..LifecycleConfig::default()
        };
        let mut pet = adult_dog();
        pet.last_stats_decay = now() - Duration::minutes(35);
        pet.last_age_update = now() - Duration::minutes(239);

        let out = Reconciler::new(config).reconcile_catch_up(&pet, now());
        assert_eq!(out.decay_intervals, 3);
        assert_eq!(out.months_aged, 1);
    }
}
