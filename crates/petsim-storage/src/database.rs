// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use chrono::{DateTime, SecondsFormat, Utc};
use petsim_core::PetsimError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Handle to the petsim database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and bring its schema
    /// up to date.
    ///
    /// Schema setup runs on a short-lived synchronous connection in a blocking
    /// task; the returned handle owns the single async writer connection.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, PetsimError> {
        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || prepare(&setup_path, wal_mode))
            .await
            .map_err(|e| PetsimError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| PetsimError::Storage {
                source: Box::new(e),
            })?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(CONNECTION_PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The async connection all queries go through.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Fold the WAL back into the main database file.
    pub async fn checkpoint(&self) -> Result<(), PetsimError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Per-connection settings. `journal_mode` is persistent and set once in [`prepare`].
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;
     PRAGMA busy_timeout = 5000;
     PRAGMA synchronous = NORMAL;";

fn prepare(path: &str, wal_mode: bool) -> Result<(), PetsimError> {
    let mut conn = rusqlite::Connection::open(path).map_err(storage_err)?;
    let journal = if wal_mode { "WAL" } else { "DELETE" };
    // journal_mode returns a row, so it cannot go through execute_batch.
    let applied: String = conn
        .query_row(&format!("PRAGMA journal_mode = {journal};"), [], |row| row.get(0))
        .map_err(storage_err)?;
    debug!(requested = journal, applied = %applied, "journal mode set");
    conn.execute_batch(CONNECTION_PRAGMAS).map_err(storage_err)?;
    run_migrations(&mut conn)
}

fn storage_err(e: rusqlite::Error) -> PetsimError {
    PetsimError::Storage {
        source: Box::new(e),
    }
}

/// Convert a tokio-rusqlite error into `PetsimError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PetsimError {
    PetsimError::Storage {
        source: Box::new(e),
    }
}

/// Timestamps are stored as RFC 3339 strings with nanosecond precision.
pub(crate) fn encode_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored timestamp; `idx` is the column the text came from.
pub(crate) fn decode_ts(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema_and_enables_wal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("open.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let (mode, tables) = db
            .connection()
            .call(|conn| -> Result<(String, i64), rusqlite::Error> {
                let mode: String = conn.query_row("PRAGMA journal_mode;", [], |r| r.get(0))?;
                let tables: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                     ('pets', 'pet_vaccinations', 'pet_diseases', 'notification_acks', 'reference_catalog')",
                    [],
                    |r| r.get(0),
                )?;
                Ok((mode, tables))
            })
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert_eq!(tables, 5);
    }

    #[tokio::test]
    async fn reopening_is_a_no_op_migration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        let path = path.to_str().unwrap();
        drop(Database::open(path, true).await.unwrap());
        Database::open(path, true).await.unwrap();
    }

    #[test]
    fn timestamps_keep_nanoseconds() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let encoded = encode_ts(&ts);
        assert_eq!(encoded, "2026-03-14T09:00:00.123456789Z");
        assert_eq!(decode_ts(0, &encoded).unwrap(), ts);
    }

    #[test]
    fn malformed_timestamp_is_a_conversion_error() {
        assert!(matches!(
            decode_ts(3, "yesterday"),
            Err(rusqlite::Error::FromSqlConversionFailure(3, _, _))
        ));
    }
}
