// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pet CRUD operations.
//!
//! Histories live in their own tables keyed by `(pet_id, seq)`. Writes only
//! ever append rows past the stored length; existing history rows are never
//! updated or deleted.

use std::str::FromStr;

use petsim_core::{
    DiseaseRecord, DiseaseStatus, PetRecord, PetsimError, Severity, Species, VaccinationRecord,
    VitalStats,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::database::{Database, decode_ts, encode_ts, map_tr_err};

const PET_COLUMNS: &str = "id, owner_id, name, species, age_months, weight_kg,
     health, happiness, hunger, energy, cleanliness,
     last_fed, last_played, last_cleaned, last_age_update, last_stats_decay, created_at";

/// Insert a new pet together with any history it already carries.
pub async fn insert_pet(db: &Database, pet: &PetRecord) -> Result<(), PetsimError> {
    let pet = pet.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let now = encode_ts(&chrono::Utc::now());
            tx.execute(
                "INSERT INTO pets (id, owner_id, name, species, age_months, weight_kg,
                     health, happiness, hunger, energy, cleanliness,
                     last_fed, last_played, last_cleaned, last_age_update, last_stats_decay,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                params![
                    pet.id,
                    pet.owner_id,
                    pet.name,
                    pet.species.to_string(),
                    pet.age_months,
                    pet.weight_kg,
                    pet.stats.health,
                    pet.stats.happiness,
                    pet.stats.hunger,
                    pet.stats.energy,
                    pet.stats.cleanliness,
                    encode_ts(&pet.last_fed),
                    encode_ts(&pet.last_played),
                    encode_ts(&pet.last_cleaned),
                    encode_ts(&pet.last_age_update),
                    encode_ts(&pet.last_stats_decay),
                    encode_ts(&pet.created_at),
                    now,
                ],
            )?;
            append_history(&tx, &pet)?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a pet by ID, with its full history.
pub async fn get_pet(db: &Database, id: &str) -> Result<Option<PetRecord>, PetsimError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let pet = conn
                .query_row(
                    &format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?1"),
                    params![id],
                    row_to_pet,
                )
                .optional()?;
            match pet {
                Some(mut pet) => {
                    load_history(conn, &mut pet)?;
                    Ok(Some(pet))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// All pets belonging to an owner, oldest adoption first.
pub async fn get_pets_by_owner(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<PetRecord>, PetsimError> {
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PET_COLUMNS} FROM pets WHERE owner_id = ?1 ORDER BY created_at, id"
            ))?;
            let mut pets = stmt
                .query_map(params![owner_id], row_to_pet)?
                .collect::<Result<Vec<_>, _>>()?;
            for pet in &mut pets {
                load_history(conn, pet)?;
            }
            Ok(pets)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite a pet's scalar state and append any new history entries.
///
/// Returns `NotFound` if no pet with this id exists.
pub async fn update_pet(db: &Database, pet: &PetRecord) -> Result<(), PetsimError> {
    let pet = pet.clone();
    let id = pet.id.clone();
    let updated = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE pets SET name = ?2, species = ?3, age_months = ?4, weight_kg = ?5,
                     health = ?6, happiness = ?7, hunger = ?8, energy = ?9, cleanliness = ?10,
                     last_fed = ?11, last_played = ?12, last_cleaned = ?13,
                     last_age_update = ?14, last_stats_decay = ?15, updated_at = ?16
                 WHERE id = ?1",
                params![
                    pet.id,
                    pet.name,
                    pet.species.to_string(),
                    pet.age_months,
                    pet.weight_kg,
                    pet.stats.health,
                    pet.stats.happiness,
                    pet.stats.hunger,
                    pet.stats.energy,
                    pet.stats.cleanliness,
                    encode_ts(&pet.last_fed),
                    encode_ts(&pet.last_played),
                    encode_ts(&pet.last_cleaned),
                    encode_ts(&pet.last_age_update),
                    encode_ts(&pet.last_stats_decay),
                    encode_ts(&chrono::Utc::now()),
                ],
            )?;
            if changed == 0 {
                return Ok(false);
            }
            append_history(&tx, &pet)?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if updated {
        Ok(())
    } else {
        Err(PetsimError::pet_not_found(id))
    }
}

fn append_history(conn: &Connection, pet: &PetRecord) -> Result<(), rusqlite::Error> {
    let stored: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pet_vaccinations WHERE pet_id = ?1",
        params![pet.id],
        |row| row.get(0),
    )?;
    for (seq, dose) in pet.vaccinations.iter().enumerate().skip(stored as usize) {
        conn.execute(
            "INSERT INTO pet_vaccinations
                 (pet_id, seq, vaccine_id, vaccine_name, age_months_at_dose, administered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                pet.id,
                seq as i64,
                dose.vaccine_id,
                dose.vaccine_name,
                dose.age_months_at_dose,
                encode_ts(&dose.administered_at),
            ],
        )?;
    }

    let stored: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pet_diseases WHERE pet_id = ?1",
        params![pet.id],
        |row| row.get(0),
    )?;
    for (seq, entry) in pet.diseases.iter().enumerate().skip(stored as usize) {
        conn.execute(
            "INSERT INTO pet_diseases
                 (pet_id, seq, disease_id, disease_name, severity, status, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                pet.id,
                seq as i64,
                entry.disease_id,
                entry.disease_name,
                entry.severity.to_string(),
                entry.status.to_string(),
                encode_ts(&entry.recorded_at),
            ],
        )?;
    }
    Ok(())
}

fn load_history(conn: &Connection, pet: &mut PetRecord) -> Result<(), rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT vaccine_id, vaccine_name, age_months_at_dose, administered_at
         FROM pet_vaccinations WHERE pet_id = ?1 ORDER BY seq",
    )?;
    pet.vaccinations = stmt
        .query_map(params![pet.id], |row| {
            Ok(VaccinationRecord {
                vaccine_id: row.get(0)?,
                vaccine_name: row.get(1)?,
                age_months_at_dose: row.get(2)?,
                administered_at: decode_ts(3, &row.get::<_, String>(3)?)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT disease_id, disease_name, severity, status, recorded_at
         FROM pet_diseases WHERE pet_id = ?1 ORDER BY seq",
    )?;
    pet.diseases = stmt
        .query_map(params![pet.id], |row| {
            Ok(DiseaseRecord {
                disease_id: row.get(0)?,
                disease_name: row.get(1)?,
                severity: parse_column::<Severity>(row, 2)?,
                status: parse_column::<DiseaseStatus>(row, 3)?,
                recorded_at: decode_ts(4, &row.get::<_, String>(4)?)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(())
}

fn row_to_pet(row: &Row<'_>) -> Result<PetRecord, rusqlite::Error> {
    let ts = |idx: usize| -> Result<_, rusqlite::Error> { decode_ts(idx, &row.get::<_, String>(idx)?) };
    Ok(PetRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        species: parse_column::<Species>(row, 3)?,
        age_months: row.get(4)?,
        weight_kg: row.get(5)?,
        stats: VitalStats {
            health: row.get(6)?,
            happiness: row.get(7)?,
            hunger: row.get(8)?,
            energy: row.get(9)?,
            cleanliness: row.get(10)?,
        },
        last_fed: ts(11)?,
        last_played: ts(12)?,
        last_cleaned: ts(13)?,
        last_age_update: ts(14)?,
        last_stats_decay: ts(15)?,
        vaccinations: Vec::new(),
        diseases: Vec::new(),
        created_at: ts(16)?,
    })
}

/// Parse a text column through the type's `FromStr`.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    async fn open(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("pets.db");
        Database::open(path.to_str().unwrap(), true).await.unwrap()
    }

    fn sample(id: &str, owner: &str, created: DateTime<Utc>) -> PetRecord {
        let mut pet = PetRecord::new(owner, "Biscuit", Species::Dog, 0.4, created);
        pet.id = id.to_string();
        pet
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        let mut pet = sample("p1", "o1", t0() + Duration::nanoseconds(42));
        pet.stats.hunger = 77;
        pet.record_vaccination(VaccinationRecord {
            vaccine_id: "dhpp".into(),
            vaccine_name: "DHPP".into(),
            age_months_at_dose: 2,
            administered_at: t0(),
        });
        insert_pet(&db, &pet).await.unwrap();

        let loaded = get_pet(&db, "p1").await.unwrap().unwrap();
        assert_eq!(loaded, pet);
        assert!(get_pet(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pets_by_owner_are_scoped_and_ordered() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        insert_pet(&db, &sample("b", "o1", t0() + Duration::hours(1))).await.unwrap();
        insert_pet(&db, &sample("a", "o1", t0())).await.unwrap();
        insert_pet(&db, &sample("c", "o2", t0())).await.unwrap();

        let ids: Vec<String> = get_pets_by_owner(&db, "o1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn update_appends_history_without_rewriting_it() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        let mut pet = sample("p1", "o1", t0());
        insert_pet(&db, &pet).await.unwrap();

        pet.age_months = 5;
        pet.record_disease(DiseaseRecord {
            disease_id: "kennel-cough".into(),
            disease_name: "Kennel Cough".into(),
            severity: Severity::Mild,
            recorded_at: t0(),
            status: DiseaseStatus::Active,
        });
        update_pet(&db, &pet).await.unwrap();

        pet.record_disease(DiseaseRecord {
            disease_id: "kennel-cough".into(),
            disease_name: "Kennel Cough".into(),
            severity: Severity::Mild,
            recorded_at: t0() + Duration::days(2),
            status: DiseaseStatus::Treated,
        });
        update_pet(&db, &pet).await.unwrap();

        let loaded = get_pet(&db, "p1").await.unwrap().unwrap();
        assert_eq!(loaded.age_months, 5);
        assert_eq!(loaded.diseases, pet.diseases);
        assert!(loaded.active_diseases().is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_pet_is_not_found() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        let err = update_pet(&db, &sample("ghost", "o1", t0())).await.unwrap_err();
        assert!(matches!(err, PetsimError::NotFound { ref entity, .. } if entity == "pet"));
    }
}
