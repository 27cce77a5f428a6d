// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Piecewise per-species growth curve.
//!
//! Weight ramps quickly through the first year, slows through the second, and
//! holds at the species' adult weight from 25 months on.

use petsim_core::Species;

/// Share of the birth-to-adult gain reached at 12 months.
const FIRST_YEAR_SHARE: f64 = 0.75;

/// Weight in kilograms for a pet of `species` at `age_months`.
///
/// Non-decreasing in age and bounded by the species' birth and adult weights.
pub fn weight_for_age(species: Species, age_months: u32) -> f64 {
    let birth = species.birth_weight_kg();
    let adult = species.adult_weight_kg();
    let gain = adult - birth;

    let share = match age_months {
        0..=12 => FIRST_YEAR_SHARE * f64::from(age_months) / 12.0,
        13..=24 => FIRST_YEAR_SHARE + (1.0 - FIRST_YEAR_SHARE) * f64::from(age_months - 12) / 12.0,
        _ => 1.0,
    };

    birth + gain * share
}
