// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end reconciliation testing.
//!
//! `TestHarness` assembles a runner with a fixed clock, a notification
//! center, and either in-memory mocks or a temp SQLite database. Provides
//! `pass()` to drive a reconciliation pass at the harness clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use petsim_config::model::{HealthConfig, LifecycleConfig, SchedulerConfig, StorageConfig};
use petsim_core::{Clock, PetRecord, PetStore, PetsimError, ReadStateStore, ReferenceCatalog};
use petsim_health::BuiltinCatalog;
use petsim_lifecycle::TickMode;
use petsim_notify::{NotificationCenter, PushPolicy};
use petsim_runtime::{PassReport, ReconciliationRunner, Scheduler};
use petsim_storage::SqliteStorage;

use crate::clock::FixedClock;
use crate::fixtures;
use crate::mock_delivery::MockDelivery;
use crate::mock_read_state::MockReadState;
use crate::mock_store::MockStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    pets: Vec<PetRecord>,
    catalog: Option<Arc<dyn ReferenceCatalog>>,
    lifecycle: LifecycleConfig,
    health: HealthConfig,
    push: PushPolicy,
    sqlite: bool,
    start: DateTime<Utc>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            pets: Vec::new(),
            catalog: None,
            lifecycle: LifecycleConfig::default(),
            health: HealthConfig {
                disease_onset_enabled: false,
                rng_seed: Some(7),
            },
            push: PushPolicy::default(),
            sqlite: false,
            start: fixtures::t0(),
        }
    }

    /// Seed a pet into the store before the first pass.
    pub fn with_pet(mut self, pet: PetRecord) -> Self {
        self.pets.push(pet);
        self
    }

    /// Use a specific reference catalog instead of the builtin one.
    pub fn with_catalog(mut self, catalog: Arc<dyn ReferenceCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: LifecycleConfig) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Enable disease onset with a seeded rng.
    pub fn with_onset(mut self, seed: u64) -> Self {
        self.health = HealthConfig {
            disease_onset_enabled: true,
            rng_seed: Some(seed),
        };
        self
    }

    pub fn with_push_policy(mut self, policy: PushPolicy) -> Self {
        self.push = policy;
        self
    }

    /// Back the runner with a temp SQLite database instead of mocks.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Start the harness clock somewhere other than [`fixtures::t0`].
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, PetsimError> {
        let clock = Arc::new(FixedClock::new(self.start));
        let delivery = Arc::new(MockDelivery::new());

        let (store, read_state, mock_store, mock_read_state, temp_dir): (
            Arc<dyn PetStore>,
            Arc<dyn ReadStateStore>,
            Option<Arc<MockStore>>,
            Option<Arc<MockReadState>>,
            Option<tempfile::TempDir>,
        ) = if self.sqlite {
            let temp_dir =
                tempfile::TempDir::new().map_err(|e| PetsimError::Storage { source: e.into() })?;
            let storage = Arc::new(SqliteStorage::new(StorageConfig {
                database_path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
                wal_mode: true,
            }));
            storage.initialize().await?;
            let store: Arc<dyn PetStore> = storage.clone();
            let read_state: Arc<dyn ReadStateStore> = storage;
            (store, read_state, None, None, Some(temp_dir))
        } else {
            let mock_store = Arc::new(MockStore::new());
            let mock_read_state = Arc::new(MockReadState::new());
            let store: Arc<dyn PetStore> = mock_store.clone();
            let read_state: Arc<dyn ReadStateStore> = mock_read_state.clone();
            (
                store,
                read_state,
                Some(mock_store),
                Some(mock_read_state),
                None,
            )
        };

        for pet in &self.pets {
            store.insert_pet(pet).await?;
        }

        let catalog: Arc<dyn ReferenceCatalog> = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(BuiltinCatalog::new()),
        };
        let center = Arc::new(NotificationCenter::new(
            fixtures::OWNER,
            read_state.clone(),
            Some(delivery.clone()),
            self.push,
        ));
        let runner = Arc::new(ReconciliationRunner::new(
            store.clone(),
            catalog,
            center.clone(),
            self.lifecycle,
            &self.health,
        ));

        Ok(TestHarness {
            runner,
            center,
            clock,
            delivery,
            store,
            read_state,
            mock_store,
            mock_read_state,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment: runner, notification center, and storage.
pub struct TestHarness {
    pub runner: Arc<ReconciliationRunner>,
    pub center: Arc<NotificationCenter>,
    pub clock: Arc<FixedClock>,
    /// Captures every pushed notification.
    pub delivery: Arc<MockDelivery>,
    pub store: Arc<dyn PetStore>,
    pub read_state: Arc<dyn ReadStateStore>,
    mock_store: Option<Arc<MockStore>>,
    mock_read_state: Option<Arc<MockReadState>>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The mock store, when not backed by SQLite.
    pub fn mock_store(&self) -> Option<&Arc<MockStore>> {
        self.mock_store.as_ref()
    }

    /// The mock read-state store, when not backed by SQLite.
    pub fn mock_read_state(&self) -> Option<&Arc<MockReadState>> {
        self.mock_read_state.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Run one reconciliation pass at the current harness time.
    pub async fn pass(&self, mode: TickMode) -> Result<PassReport, PetsimError> {
        self.runner.run_pass(self.now(), mode).await
    }

    /// Stored copy of a pet.
    pub async fn stored(&self, pet_id: &str) -> Result<Option<PetRecord>, PetsimError> {
        self.store.get_pet(pet_id).await
    }

    /// A scheduler driving this harness' runner off the harness clock.
    pub fn scheduler(&self, config: &SchedulerConfig) -> Scheduler {
        let clock: Arc<dyn Clock> = self.clock.clone();
        Scheduler::new(self.runner.clone(), clock, config)
    }
}
