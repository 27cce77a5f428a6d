// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the persistence collaborator traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use petsim_config::model::StorageConfig;
use petsim_core::{
    AckState, AdapterType, DiseaseRef, HealthStatus, PetRecord, PetStore, PetsimError,
    PluginAdapter, ReadStateStore, ReferenceCatalog, VaccineRef,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`PetStore::initialize`]. One adapter serves as pet store,
/// read-state store, and reference catalog.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`PetStore::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, PetsimError> {
        self.db.get().ok_or_else(|| PetsimError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Replace the stored reference catalog. Returns the number of entries written.
    pub async fn seed_catalog(
        &self,
        diseases: &[DiseaseRef],
        vaccines: &[VaccineRef],
    ) -> Result<usize, PetsimError> {
        let written = queries::catalog::replace_catalog(self.db()?, diseases, vaccines).await?;
        debug!(written, "reference catalog seeded");
        Ok(written)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PetsimError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PetsimError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PetStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), PetsimError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PetsimError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PetsimError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert_pet(&self, pet: &PetRecord) -> Result<(), PetsimError> {
        queries::pets::insert_pet(self.db()?, pet).await
    }

    async fn get_pet(&self, id: &str) -> Result<Option<PetRecord>, PetsimError> {
        queries::pets::get_pet(self.db()?, id).await
    }

    async fn get_pets_by_owner(&self, owner_id: &str) -> Result<Vec<PetRecord>, PetsimError> {
        queries::pets::get_pets_by_owner(self.db()?, owner_id).await
    }

    async fn update_pet(&self, pet: &PetRecord) -> Result<(), PetsimError> {
        queries::pets::update_pet(self.db()?, pet).await
    }
}

#[async_trait]
impl ReadStateStore for SqliteStorage {
    async fn acknowledgement(&self, key: &str) -> Result<Option<AckState>, PetsimError> {
        queries::acks::acknowledgement(self.db()?, key).await
    }

    async fn acknowledge(
        &self,
        pet_id: &str,
        key: &str,
        state: AckState,
        at: DateTime<Utc>,
    ) -> Result<(), PetsimError> {
        queries::acks::acknowledge(self.db()?, pet_id, key, state, at).await
    }

    async fn acknowledged_keys(&self, pet_id: &str) -> Result<Vec<String>, PetsimError> {
        queries::acks::acknowledged_keys(self.db()?, pet_id).await
    }

    async fn forget(&self, key: &str) -> Result<(), PetsimError> {
        queries::acks::forget(self.db()?, key).await
    }
}

#[async_trait]
impl ReferenceCatalog for SqliteStorage {
    async fn diseases(&self) -> Result<Vec<DiseaseRef>, PetsimError> {
        let diseases = queries::catalog::load_diseases(self.db()?).await?;
        if diseases.is_empty() {
            debug!("reference catalog has no disease rows");
        }
        Ok(diseases)
    }

    async fn vaccines(&self) -> Result<Vec<VaccineRef>, PetsimError> {
        let vaccines = queries::catalog::load_vaccines(self.db()?).await?;
        if vaccines.is_empty() {
            debug!("reference catalog has no vaccine rows");
        }
        Ok(vaccines)
    }
}
