// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted notification acknowledgements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::PetsimError;
use crate::types::AckState;

/// Stores read/cleared status keyed by a notification read key.
///
/// Keys survive process restarts so a re-derived alert is still recognised
/// as acknowledged.
#[async_trait]
pub trait ReadStateStore: Send + Sync + 'static {
    async fn acknowledgement(&self, key: &str) -> Result<Option<AckState>, PetsimError>;

    async fn acknowledge(
        &self,
        pet_id: &str,
        key: &str,
        state: AckState,
        at: DateTime<Utc>,
    ) -> Result<(), PetsimError>;

    /// All acknowledged keys belonging to a pet.
    async fn acknowledged_keys(&self, pet_id: &str) -> Result<Vec<String>, PetsimError>;

    /// Drop the acknowledgement for a key whose condition has resolved.
    async fn forget(&self, key: &str) -> Result<(), PetsimError>;

    async fn is_read(&self, key: &str) -> Result<bool, PetsimError> {
        Ok(self.acknowledgement(key).await?.is_some())
    }

    async fn mark_read(
        &self,
        pet_id: &str,
        key: &str,
        at: DateTime<Utc>,
    ) -> Result<(), PetsimError> {
        self.acknowledge(pet_id, key, AckState::Read, at).await
    }
}
