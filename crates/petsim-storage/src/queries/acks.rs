// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification acknowledgement operations.

use chrono::{DateTime, Utc};
use petsim_core::{AckState, PetsimError};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, encode_ts, map_tr_err};

/// Record (or overwrite) the acknowledgement for a read key.
pub async fn acknowledge(
    db: &Database,
    pet_id: &str,
    key: &str,
    state: AckState,
    at: DateTime<Utc>,
) -> Result<(), PetsimError> {
    let pet_id = pet_id.to_string();
    let key = key.to_string();
    let at = encode_ts(&at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notification_acks (read_key, pet_id, state, acknowledged_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(read_key) DO UPDATE SET
                     pet_id = excluded.pet_id,
                     state = excluded.state,
                     acknowledged_at = excluded.acknowledged_at",
                params![key, pet_id, state.to_string(), at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn acknowledgement(db: &Database, key: &str) -> Result<Option<AckState>, PetsimError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT state FROM notification_acks WHERE read_key = ?1",
                params![key],
                |row| {
                    let raw: String = row.get(0)?;
                    raw.parse::<AckState>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Every acknowledged key for a pet, sorted.
pub async fn acknowledged_keys(db: &Database, pet_id: &str) -> Result<Vec<String>, PetsimError> {
    let pet_id = pet_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT read_key FROM notification_acks WHERE pet_id = ?1 ORDER BY read_key",
            )?;
            let keys = stmt
                .query_map(params![pet_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn forget(db: &Database, key: &str) -> Result<(), PetsimError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM notification_acks WHERE read_key = ?1",
                params![key],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn acknowledge_upserts_and_forget_removes() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("acks.db").to_str().unwrap(), true)
            .await
            .unwrap();
        let key = "p1|reminder|Feeding Reminder|feed";

        assert_eq!(acknowledgement(&db, key).await.unwrap(), None);
        acknowledge(&db, "p1", key, AckState::Read, t0()).await.unwrap();
        assert_eq!(acknowledgement(&db, key).await.unwrap(), Some(AckState::Read));

        acknowledge(&db, "p1", key, AckState::Cleared, t0()).await.unwrap();
        assert_eq!(acknowledgement(&db, key).await.unwrap(), Some(AckState::Cleared));
        assert_eq!(acknowledged_keys(&db, "p1").await.unwrap(), vec![key]);
        assert!(acknowledged_keys(&db, "p2").await.unwrap().is_empty());

        forget(&db, key).await.unwrap();
        assert_eq!(acknowledgement(&db, key).await.unwrap(), None);
        // forgetting twice is harmless
        forget(&db, key).await.unwrap();
    }
}
