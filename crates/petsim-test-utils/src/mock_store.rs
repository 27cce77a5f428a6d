// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory pet store for deterministic testing.
//!
//! `MockStore` implements `PetStore` over a `HashMap` and can be told to fail
//! writes, which is how tests exercise the retained-record path.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use petsim_core::traits::{PetStore, PluginAdapter};
use petsim_core::{AdapterType, HealthStatus, PetRecord, PetsimError};

pub struct MockStore {
    pets: Arc<Mutex<HashMap<String, PetRecord>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    updates: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            pets: Arc::new(Mutex::new(HashMap::new())),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            updates: AtomicUsize::new(0),
        }
    }

    /// Seed the store directly, bypassing failure injection.
    pub async fn put(&self, pet: PetRecord) {
        self.pets.lock().await.insert(pet.id.clone(), pet);
    }

    /// Current stored copy of a pet.
    pub async fn stored(&self, id: &str) -> Option<PetRecord> {
        self.pets.lock().await.get(id).cloned()
    }

    /// Make `insert_pet`/`update_pet` return a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make reads return a storage error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `update_pet` calls.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<(), PetsimError> {
        if flag.load(Ordering::SeqCst) {
            return Err(PetsimError::Storage {
                source: format!("mock store {op} failure").into(),
            });
        }
        Ok(())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PetsimError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("writes failing".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PetsimError> {
        Ok(())
    }
}

#[async_trait]
impl PetStore for MockStore {
    async fn initialize(&self) -> Result<(), PetsimError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), PetsimError> {
        Ok(())
    }

    async fn insert_pet(&self, pet: &PetRecord) -> Result<(), PetsimError> {
        self.check(&self.fail_writes, "insert")?;
        self.pets.lock().await.insert(pet.id.clone(), pet.clone());
        Ok(())
    }

    async fn get_pet(&self, id: &str) -> Result<Option<PetRecord>, PetsimError> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.pets.lock().await.get(id).cloned())
    }

    async fn get_pets_by_owner(&self, owner_id: &str) -> Result<Vec<PetRecord>, PetsimError> {
        self.check(&self.fail_reads, "read")?;
        let mut pets: Vec<PetRecord> = self
            .pets
            .lock()
            .await
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        pets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(pets)
    }

    async fn update_pet(&self, pet: &PetRecord) -> Result<(), PetsimError> {
        self.check(&self.fail_writes, "update")?;
        let mut pets = self.pets.lock().await;
        if !pets.contains_key(&pet.id) {
            return Err(PetsimError::pet_not_found(&pet.id));
        }
        pets.insert(pet.id.clone(), pet.clone());
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
