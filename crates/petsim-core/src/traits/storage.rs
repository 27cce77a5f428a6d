// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for pet records.

use async_trait::async_trait;

use crate::error::PetsimError;
use crate::pet::PetRecord;
use crate::traits::adapter::PluginAdapter;

/// Adapter for pet record persistence.
///
/// Records are addressed by pet id and listed by owner id. `update_pet`
/// overwrites the scalar fields and appends any history entries the store
/// has not seen yet; stored history is never rewritten.
#[async_trait]
pub trait PetStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), PetsimError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), PetsimError>;

    async fn insert_pet(&self, pet: &PetRecord) -> Result<(), PetsimError>;

    async fn get_pet(&self, id: &str) -> Result<Option<PetRecord>, PetsimError>;

    async fn get_pets_by_owner(&self, owner_id: &str) -> Result<Vec<PetRecord>, PetsimError>;

    async fn update_pet(&self, pet: &PetRecord) -> Result<(), PetsimError>;
}
