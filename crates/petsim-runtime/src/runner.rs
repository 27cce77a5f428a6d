// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation passes over one owner's pets.
//!
//! A pass walks the owner's pets sequentially. For each pet, under that pet's
//! lock: reconcile to `now`, apply active-disease impact, roll for disease
//! onset if the pet aged, persist if anything changed, then derive fresh
//! notifications. All fresh notifications are merged into the notification
//! center once at the end of the pass.
//!
//! A record that fails to persist is kept in memory and used as the starting
//! point for the next pass (or care action) until a write succeeds.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use petsim_config::model::{HealthConfig, LifecycleConfig};
use petsim_core::pet::STAT_MAX;
use petsim_core::{
    Notification, NotificationCategory, PetRecord, PetStore, PetsimError, ReferenceCatalog,
    Species, Stat,
};
use petsim_health::{
    Catalog, active_diseases, disease_impact, disease_risk, maybe_trigger_disease,
    overdue_vaccines, required_vaccines,
};
use petsim_lifecycle::{CareAction, Reconciler, TickMode, weight_for_age};
use petsim_notify::{IngestReport, NotificationCenter, derive, sync_issue};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Categories derived from the reference catalog. Their acknowledgements
/// survive a pass that ran without it.
const CATALOG_CATEGORIES: [NotificationCategory; 2] =
    [NotificationCategory::Vaccination, NotificationCategory::Disease];

/// What happened to one pet during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetOutcome {
    pub pet_id: String,
    pub pet_name: String,
    pub changed: bool,
    pub decay_intervals: u32,
    pub months_aged: u32,
    /// Catalog id of a disease contracted this pass.
    pub disease_onset: Option<String>,
    /// False when the record could not be persisted and is retained in memory.
    pub synced: bool,
    pub error: Option<String>,
    pub notifications: usize,
}

/// Summary of one [`ReconciliationRunner::run_pass`].
#[derive(Debug, Clone)]
pub struct PassReport {
    pub at: DateTime<Utc>,
    pub mode: TickMode,
    pub pets: Vec<PetOutcome>,
    pub catalog_error: Option<String>,
    pub notifications: Option<IngestReport>,
    pub notify_error: Option<String>,
}

impl PassReport {
    fn new(at: DateTime<Utc>, mode: TickMode) -> Self {
        Self {
            at,
            mode,
            pets: Vec::new(),
            catalog_error: None,
            notifications: None,
            notify_error: None,
        }
    }

    pub fn changed_count(&self) -> usize {
        self.pets.iter().filter(|p| p.changed).count()
    }

    pub fn unsynced_count(&self) -> usize {
        self.pets.iter().filter(|p| !p.synced).count()
    }

    pub fn onset_count(&self) -> usize {
        self.pets.iter().filter(|p| p.disease_onset.is_some()).count()
    }

    pub fn outcome(&self, pet_id: &str) -> Option<&PetOutcome> {
        self.pets.iter().find(|p| p.pet_id == pet_id)
    }
}

/// Result of a care action.
#[derive(Debug, Clone, PartialEq)]
pub struct CareOutcome {
    pub pet: PetRecord,
    pub synced: bool,
}

/// A reconciled record plus the bookkeeping the pass reports.
struct Advanced {
    pet: PetRecord,
    decay_intervals: u32,
    months_aged: u32,
    onset: Option<String>,
}

pub struct ReconciliationRunner {
    owner_id: String,
    store: Arc<dyn PetStore>,
    catalog_source: Arc<dyn ReferenceCatalog>,
    center: Arc<NotificationCenter>,
    reconciler: Reconciler,
    onset_enabled: bool,
    catalog: OnceCell<Catalog>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    unsynced: Mutex<HashMap<String, PetRecord>>,
    rng: std::sync::Mutex<StdRng>,
}

impl ReconciliationRunner {
    pub fn new(
        store: Arc<dyn PetStore>,
        catalog_source: Arc<dyn ReferenceCatalog>,
        center: Arc<NotificationCenter>,
        lifecycle: LifecycleConfig,
        health: &HealthConfig,
    ) -> Self {
        let rng = match health.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            owner_id: center.owner_id().to_string(),
            store,
            catalog_source,
            center,
            reconciler: Reconciler::new(lifecycle),
            onset_enabled: health.disease_onset_enabled,
            catalog: OnceCell::new(),
            locks: DashMap::new(),
            unsynced: Mutex::new(HashMap::new()),
            rng: std::sync::Mutex::new(rng),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn center(&self) -> &Arc<NotificationCenter> {
        &self.center
    }

    /// The reference catalog, loaded on first use and cached afterwards.
    /// A failed load is not cached.
    pub async fn catalog(&self) -> Result<&Catalog, PetsimError> {
        self.catalog
            .get_or_try_init(|| Catalog::load(self.catalog_source.as_ref()))
            .await
    }

    /// Number of records currently held in memory because persisting failed.
    pub async fn unsynced_count(&self) -> usize {
        self.unsynced.lock().await.len()
    }

    /// The owner's pets as the runner sees them: stored records overlaid with
    /// any retained unsynced ones.
    pub async fn pets(&self) -> Result<Vec<PetRecord>, PetsimError> {
        let listed = self.store.get_pets_by_owner(&self.owner_id).await?;
        Ok(self.with_retained(listed).await)
    }

    /// Run one reconciliation pass over every pet of the owner.
    ///
    /// Fails only if the owner's pets cannot be listed. Per-pet persistence
    /// failures, an unavailable catalog, and notification errors are recorded
    /// in the report.
    pub async fn run_pass(
        &self,
        now: DateTime<Utc>,
        mode: TickMode,
    ) -> Result<PassReport, PetsimError> {
        let started = Instant::now();
        let pets = self.pets().await?;
        let mut report = PassReport::new(now, mode);

        let fallback = Catalog::default();
        let catalog = match self.catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "reference catalog unavailable; health scheduling skipped this pass");
                report.catalog_error = Some(e.to_string());
                &fallback
            }
        };

        let mut fresh: Vec<Notification> = Vec::new();
        let mut covered: Vec<String> = Vec::with_capacity(pets.len());
        for pet in pets {
            covered.push(pet.id.clone());
            let (outcome, mut derived) = self.process_pet(pet, catalog, now, mode).await;
            fresh.append(&mut derived);
            report.pets.push(outcome);
        }

        let skipped: &[NotificationCategory] = if report.catalog_error.is_some() {
            &CATALOG_CATEGORIES
        } else {
            &[]
        };
        match self.center.ingest_partial(fresh, &covered, skipped, now).await {
            Ok(ingest) => report.notifications = Some(ingest),
            Err(e) => {
                warn!(error = %e, "notification merge failed; keeping previous set");
                report.notify_error = Some(e.to_string());
            }
        }

        info!(
            owner_id = %self.owner_id,
            mode = ?mode,
            pets = report.pets.len(),
            changed = report.changed_count(),
            unsynced = report.unsynced_count(),
            onsets = report.onset_count(),
            unread = report.notifications.as_ref().map(|n| n.unread),
            critical = report.notifications.as_ref().map(|n| n.critical),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "reconciliation pass complete"
        );
        Ok(report)
    }

    async fn process_pet(
        &self,
        listed: PetRecord,
        catalog: &Catalog,
        now: DateTime<Utc>,
        mode: TickMode,
    ) -> (PetOutcome, Vec<Notification>) {
        let lock = self.pet_lock(&listed.id);
        let _guard = lock.lock().await;

        let (current, retained) = self.current_record(listed).await;
        let advanced = self.advance(&current, catalog, now, mode);
        let next = advanced.pet;
        let changed = next != current;

        let mut outcome = PetOutcome {
            pet_id: next.id.clone(),
            pet_name: next.name.clone(),
            changed,
            decay_intervals: advanced.decay_intervals,
            months_aged: advanced.months_aged,
            disease_onset: advanced.onset,
            synced: true,
            error: None,
            notifications: 0,
        };

        if changed || retained {
            if let Err(e) = self.persist(&next).await {
                outcome.synced = false;
                outcome.error = Some(e.to_string());
            }
        }

        let mut fresh = derive_for(&next, catalog, now);
        if !outcome.synced {
            fresh.push(sync_issue(&next, now));
        }
        outcome.notifications = fresh.len();

        debug!(
            pet_id = %outcome.pet_id,
            changed,
            decay_intervals = outcome.decay_intervals,
            months_aged = outcome.months_aged,
            notifications = outcome.notifications,
            "pet reconciled"
        );
        (outcome, fresh)
    }

    /// Apply a care action: reconcile, apply, persist, all under the pet's lock.
    pub async fn perform_care(
        &self,
        pet_id: &str,
        action: CareAction,
        now: DateTime<Utc>,
    ) -> Result<CareOutcome, PetsimError> {
        let lock = self.pet_lock(pet_id);
        let _guard = lock.lock().await;

        let current = match self.retained(pet_id).await {
            Some(pet) => pet,
            None => self
                .store
                .get_pet(pet_id)
                .await?
                .filter(|pet| pet.owner_id == self.owner_id)
                .ok_or_else(|| PetsimError::pet_not_found(pet_id))?,
        };

        let fallback = Catalog::default();
        let catalog = self.catalog().await.unwrap_or(&fallback);
        let mut next = self.advance(&current, catalog, now, TickMode::Live).pet;
        action.apply(&mut next, now)?;
        self.reconciler.enforce_stage_caps(&mut next);

        let synced = self.persist(&next).await.is_ok();
        info!(pet_id, action = action.label(), synced, "care action applied");
        Ok(CareOutcome { pet: next, synced })
    }

    /// Create and store a new pet for the owner.
    pub async fn adopt(
        &self,
        name: &str,
        species: Species,
        now: DateTime<Utc>,
    ) -> Result<PetRecord, PetsimError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PetsimError::InvalidInput("pet name must not be empty".into()));
        }
        let pet = PetRecord::new(&self.owner_id, name, species, weight_for_age(species, 1), now);
        self.store.insert_pet(&pet).await?;
        info!(pet_id = %pet.id, species = %species, "pet adopted");
        Ok(pet)
    }

    fn advance(
        &self,
        pet: &PetRecord,
        catalog: &Catalog,
        now: DateTime<Utc>,
        mode: TickMode,
    ) -> Advanced {
        let reconciled = self.reconciler.reconcile(pet, now, mode);
        let mut next = reconciled.pet;

        if reconciled.decay_intervals > 0 {
            apply_disease_impact(&mut next, catalog, reconciled.decay_intervals);
        }

        let onset = if self.onset_enabled && reconciled.months_aged > 0 {
            self.roll_onset(&mut next, catalog, now)
        } else {
            None
        };

        Advanced {
            pet: next,
            decay_intervals: reconciled.decay_intervals,
            months_aged: reconciled.months_aged,
            onset,
        }
    }

    fn roll_onset(
        &self,
        pet: &mut PetRecord,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let picked = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            maybe_trigger_disease(pet, catalog, &mut *rng)
        }?;

        match CareAction::ContractDisease(picked.clone()).apply(pet, now) {
            Ok(()) => {
                info!(pet_id = %pet.id, disease = %picked.id, "disease onset");
                Some(picked.id)
            }
            Err(e) => {
                debug!(pet_id = %pet.id, error = %e, "onset pick rejected");
                None
            }
        }
    }

    /// Write `pet`, inserting it if the store has never seen it. On failure the
    /// record is retained for the next pass.
    async fn persist(&self, pet: &PetRecord) -> Result<(), PetsimError> {
        let result = match self.store.update_pet(pet).await {
            Err(PetsimError::NotFound { .. }) => self.store.insert_pet(pet).await,
            other => other,
        };

        let mut unsynced = self.unsynced.lock().await;
        match result {
            Ok(()) => {
                if unsynced.remove(&pet.id).is_some() {
                    info!(pet_id = %pet.id, "retained record persisted");
                }
                Ok(())
            }
            Err(e) => {
                warn!(
                    pet_id = %pet.id,
                    error = %e,
                    "failed to persist pet; retaining in memory for next pass"
                );
                unsynced.insert(pet.id.clone(), pet.clone());
                Err(e)
            }
        }
    }

    async fn retained(&self, pet_id: &str) -> Option<PetRecord> {
        self.unsynced.lock().await.get(pet_id).cloned()
    }

    /// Latest known state of a listed pet once its lock is held.
    async fn current_record(&self, listed: PetRecord) -> (PetRecord, bool) {
        if let Some(retained) = self.retained(&listed.id).await {
            return (retained, true);
        }
        match self.store.get_pet(&listed.id).await {
            Ok(Some(stored)) => (stored, false),
            Ok(None) => (listed, false),
            Err(e) => {
                debug!(pet_id = %listed.id, error = %e, "re-read failed; using listed copy");
                (listed, false)
            }
        }
    }

    async fn with_retained(&self, listed: Vec<PetRecord>) -> Vec<PetRecord> {
        let unsynced = self.unsynced.lock().await;
        let mut pets: Vec<PetRecord> = listed
            .into_iter()
            .map(|pet| unsynced.get(&pet.id).cloned().unwrap_or(pet))
            .collect();

        let mut orphans: Vec<&PetRecord> = unsynced
            .values()
            .filter(|r| r.owner_id == self.owner_id && !pets.iter().any(|p| p.id == r.id))
            .collect();
        orphans.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pets.extend(orphans.into_iter().cloned());
        pets
    }

    fn pet_lock(&self, pet_id: &str) -> Arc<Mutex<()>> {
        self.locks.entry(pet_id.to_string()).or_default().clone()
    }
}

fn apply_disease_impact(pet: &mut PetRecord, catalog: &Catalog, intervals: u32) {
    let impact = disease_impact(&active_diseases(pet, catalog));
    if impact.is_zero() {
        return;
    }
    let scaled = |per_interval: u32| -> i32 {
        (u64::from(per_interval) * u64::from(intervals)).min(u64::from(STAT_MAX)) as i32
    };
    pet.stats.adjust(Stat::Health, -scaled(impact.health));
    pet.stats.adjust(Stat::Happiness, -scaled(impact.happiness));
    debug!(
        pet_id = %pet.id,
        health = impact.health,
        happiness = impact.happiness,
        intervals,
        "active disease impact applied"
    );
}

fn derive_for(pet: &PetRecord, catalog: &Catalog, now: DateTime<Utc>) -> Vec<Notification> {
    let required = required_vaccines(pet, catalog);
    let overdue = overdue_vaccines(pet, catalog);
    let risks = disease_risk(pet, catalog);
    let active = active_diseases(pet, catalog);
    derive(pet, &required, &overdue, &risks, &active, now)
}
