// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: `pass`, `adopt`, `care`, `ack`, `seed-catalog`.

use chrono::Utc;
use clap::ValueEnum;
use petsim_config::model::PetsimConfig;
use petsim_core::{PetStore, PetsimError, Species};
use petsim_health::Catalog;
use petsim_lifecycle::{CareAction, TickMode};
use petsim_storage::SqliteStorage;

use crate::app::App;

/// Care actions exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CareKind {
    Feed,
    Play,
    Clean,
    Rest,
    Vaccinate,
    Treat,
}

/// Turn a command-line care request into a [`CareAction`].
pub fn care_action(
    kind: CareKind,
    target: Option<&str>,
    catalog: &Catalog,
) -> Result<CareAction, PetsimError> {
    let require_target = |what: &str| {
        target.ok_or_else(|| PetsimError::InvalidInput(format!("--target <{what} id> is required")))
    };

    Ok(match kind {
        CareKind::Feed => CareAction::Feed,
        CareKind::Play => CareAction::Play,
        CareKind::Clean => CareAction::Clean,
        CareKind::Rest => CareAction::Rest,
        CareKind::Vaccinate => {
            let id = require_target("vaccine")?;
            let vaccine = catalog.vaccine(id).ok_or_else(|| PetsimError::NotFound {
                entity: "vaccine".into(),
                id: id.to_string(),
            })?;
            CareAction::Vaccinate(vaccine.clone())
        }
        CareKind::Treat => CareAction::TreatDisease(require_target("disease")?.to_string()),
    })
}

pub async fn pass(config: &PetsimConfig, owner: &str) -> Result<(), PetsimError> {
    let app = App::open(config, owner).await?;
    let report = app.runner.run_pass(Utc::now(), TickMode::CatchUp).await;
    app.close().await;
    let report = report?;

    println!(
        "reconciled {} pet(s): {} changed, {} unsynced, {} new disease(s)",
        report.pets.len(),
        report.changed_count(),
        report.unsynced_count(),
        report.onset_count()
    );
    if let Some(notifications) = &report.notifications {
        println!(
            "notifications: {} total, {} unread, {} critical",
            notifications.total, notifications.unread, notifications.critical
        );
    }
    if let Some(e) = &report.catalog_error {
        println!("warning: reference catalog unavailable: {e}");
    }
    Ok(())
}

pub async fn adopt(
    config: &PetsimConfig,
    owner: &str,
    name: &str,
    species: Species,
) -> Result<(), PetsimError> {
    let app = App::open(config, owner).await?;
    let adopted = app.runner.adopt(name, species, Utc::now()).await;
    app.close().await;
    let pet = adopted?;
    println!("adopted {} the {} ({})", pet.name, pet.species, pet.id);
    Ok(())
}

/// Bring the owner's pets up to date, then apply one care action.
pub async fn care(
    config: &PetsimConfig,
    owner: &str,
    pet_id: &str,
    kind: CareKind,
    target: Option<&str>,
) -> Result<(), PetsimError> {
    let app = App::open(config, owner).await?;
    let result = async {
        let now = Utc::now();
        app.runner.run_pass(now, TickMode::CatchUp).await?;
        let unloaded = Catalog::default();
        let catalog = match kind {
            CareKind::Vaccinate => app.runner.catalog().await?,
            _ => &unloaded,
        };
        let action = care_action(kind, target, catalog)?;
        app.runner.perform_care(pet_id, action, now).await
    }
    .await;
    app.close().await;

    let outcome = result?;
    let stats = &outcome.pet.stats;
    println!(
        "{}: health {} happiness {} hunger {} energy {} cleanliness {}",
        outcome.pet.name, stats.health, stats.happiness, stats.hunger, stats.energy, stats.cleanliness
    );
    if !outcome.synced {
        println!("warning: the new state could not be saved and will be retried");
    }
    Ok(())
}

/// Mark read (or clear) everything the owner currently sees.
pub async fn ack(config: &PetsimConfig, owner: &str, clear: bool) -> Result<(), PetsimError> {
    let app = App::open(config, owner).await?;
    let result = async {
        let now = Utc::now();
        app.runner.run_pass(now, TickMode::CatchUp).await?;
        if clear {
            app.center.clear_all(now).await
        } else {
            app.center.mark_all_read(now).await
        }
    }
    .await;
    app.close().await;

    let count = result?;
    let verb = if clear { "cleared" } else { "marked read" };
    println!("{count} notification(s) {verb}");
    Ok(())
}

/// Copy the compiled-in catalog into the database's reference tables.
pub async fn seed_catalog(config: &PetsimConfig) -> Result<(), PetsimError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let builtin = Catalog::builtin();
    let written = storage
        .seed_catalog(&builtin.diseases, &builtin.vaccines)
        .await;
    storage.close().await?;
    println!(
        "seeded {} reference entries into {}",
        written?, config.storage.database_path
    );
    Ok(())
}
