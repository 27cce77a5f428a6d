// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference catalog rows: one JSON document per disease or vaccine.

use petsim_core::{CatalogKind, DiseaseRef, PetsimError, VaccineRef};
use rusqlite::params;
use serde::de::DeserializeOwned;

use crate::database::{Database, map_tr_err};

/// Replace the whole catalog. Returns the number of rows written.
pub async fn replace_catalog(
    db: &Database,
    diseases: &[DiseaseRef],
    vaccines: &[VaccineRef],
) -> Result<usize, PetsimError> {
    let mut rows: Vec<(String, String, String)> = Vec::with_capacity(diseases.len() + vaccines.len());
    for disease in diseases {
        rows.push((
            CatalogKind::Disease.to_string(),
            disease.id.clone(),
            encode(CatalogKind::Disease, disease)?,
        ));
    }
    for vaccine in vaccines {
        rows.push((
            CatalogKind::Vaccine.to_string(),
            vaccine.id.clone(),
            encode(CatalogKind::Vaccine, vaccine)?,
        ));
    }

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM reference_catalog", [])?;
            for (kind, id, payload) in &rows {
                tx.execute(
                    "INSERT INTO reference_catalog (kind, id, payload) VALUES (?1, ?2, ?3)",
                    params![kind, id, payload],
                )?;
            }
            tx.commit()?;
            Ok(rows.len())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn load_diseases(db: &Database) -> Result<Vec<DiseaseRef>, PetsimError> {
    load(db, CatalogKind::Disease).await
}

pub async fn load_vaccines(db: &Database) -> Result<Vec<VaccineRef>, PetsimError> {
    load(db, CatalogKind::Vaccine).await
}

async fn load<T: DeserializeOwned>(db: &Database, kind: CatalogKind) -> Result<Vec<T>, PetsimError> {
    let kind_str = kind.to_string();
    let payloads = db
        .connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT payload FROM reference_catalog WHERE kind = ?1 ORDER BY id")?;
            let rows = stmt
                .query_map(params![kind_str], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    payloads
        .iter()
        .map(|raw| {
            serde_json::from_str(raw).map_err(|e| PetsimError::CatalogUnavailable {
                kind: kind.to_string(),
                source: Box::new(e),
            })
        })
        .collect()
}

fn encode<T: serde::Serialize>(kind: CatalogKind, entry: &T) -> Result<String, PetsimError> {
    serde_json::to_string(entry).map_err(|e| PetsimError::CatalogUnavailable {
        kind: kind.to_string(),
        source: Box::new(e),
    })
}
