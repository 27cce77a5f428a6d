// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composition root shared by every subcommand.
//!
//! Opens SQLite storage, picks the reference catalog source, and builds the
//! owner's notification center and reconciliation runner. Nothing here is
//! global: each command owns its `App` and drops it on exit.

use std::sync::Arc;

use petsim_config::model::{CatalogSource, PetsimConfig};
use petsim_core::{PetStore, PetsimError, ReferenceCatalog};
use petsim_health::BuiltinCatalog;
use petsim_notify::{NotificationCenter, PushPolicy};
use petsim_runtime::{LogDelivery, ReconciliationRunner};
use petsim_storage::SqliteStorage;
use tracing::{debug, info, warn};

pub struct App {
    pub storage: Arc<SqliteStorage>,
    pub center: Arc<NotificationCenter>,
    pub runner: Arc<ReconciliationRunner>,
}

impl App {
    /// Wire storage, catalog, notifications, and the runner for `owner_id`.
    pub async fn open(config: &PetsimConfig, owner_id: &str) -> Result<Self, PetsimError> {
        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;
        debug!(path = %config.storage.database_path, "storage initialized");

        let catalog: Arc<dyn ReferenceCatalog> = match config.catalog.source {
            CatalogSource::Builtin => Arc::new(BuiltinCatalog::new()),
            CatalogSource::Database => storage.clone(),
        };

        let center = Arc::new(NotificationCenter::new(
            owner_id,
            storage.clone(),
            Some(Arc::new(LogDelivery)),
            PushPolicy::from(&config.notifications),
        ));

        let runner = Arc::new(ReconciliationRunner::new(
            storage.clone(),
            catalog,
            center.clone(),
            config.lifecycle.clone(),
            &config.health,
        ));

        info!(
            owner_id,
            catalog = ?config.catalog.source,
            onset = config.health.disease_onset_enabled,
            "petsim initialized"
        );
        Ok(Self {
            storage,
            center,
            runner,
        })
    }

    /// Checkpoint and close storage. Failures are logged, not returned.
    pub async fn close(&self) {
        if let Err(e) = self.storage.close().await {
            warn!(error = %e, "failed to close storage cleanly");
        }
    }
}

/// Resolve the acting owner from the command line or `app.owner_id`.
pub fn resolve_owner(flag: Option<String>, config: &PetsimConfig) -> Result<String, PetsimError> {
    flag.or_else(|| config.app.owner_id.clone())
        .map(|owner| owner.trim().to_string())
        .filter(|owner| !owner.is_empty())
        .ok_or_else(|| {
            PetsimError::InvalidInput(
                "no owner given: pass --owner or set app.owner_id in petsim.toml".into(),
            )
        })
}
