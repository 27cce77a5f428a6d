// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned records shared by tests.

use chrono::{DateTime, TimeZone, Utc};
use petsim_core::{PetRecord, Species};

/// Owner id used by fixtures.
pub const OWNER: &str = "owner-1";

/// A fixed instant all fixtures are anchored to.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A freshly adopted pet with its id replaced by `id` so tests can refer to it.
pub fn pet(id: &str, name: &str, species: Species, age_months: u32, now: DateTime<Utc>) -> PetRecord {
    let mut pet = PetRecord::new(OWNER, name, species, 1.0, now);
    pet.id = id.to_string();
    pet.age_months = age_months;
    pet
}
