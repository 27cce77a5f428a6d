// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for reconciliation passes and care actions.

use std::sync::Arc;

use chrono::Duration;
use petsim_core::{AckState, PetsimError, ReadStateStore, Species};
use petsim_health::Catalog;
use petsim_lifecycle::{CareAction, TickMode, weight_for_age};
use petsim_test_utils::fixtures::{self, t0};
use petsim_test_utils::{MockCatalog, TestHarness};
use tracing_test::traced_test;

#[tokio::test]
async fn catch_up_pass_persists_decay_and_aging() {
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 5, t0()))
        .build()
        .await
        .unwrap();

    h.advance(Duration::minutes(65));
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    let outcome = report.outcome("p1").unwrap();
    assert!(outcome.changed);
    assert!(outcome.synced);
    assert_eq!(outcome.decay_intervals, 2);
    assert_eq!(outcome.months_aged, 1);

    let stored = h.stored("p1").await.unwrap().unwrap();
    assert_eq!(stored.stats.hunger, 30 + 2 * 6);
    assert_eq!(stored.age_months, 6);
    assert_eq!(stored.weight_kg, weight_for_age(Species::Dog, 6));
    assert_eq!(stored.last_stats_decay, h.now());
    assert_eq!(stored.last_age_update, h.now());
}

#[tokio::test]
async fn repeated_pass_at_the_same_instant_writes_nothing() {
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Cat, 30, t0()))
        .build()
        .await
        .unwrap();
    let store = h.mock_store().unwrap().clone();

    h.advance(Duration::minutes(40));
    h.pass(TickMode::Live).await.unwrap();
    let writes = store.update_count();
    let first = store.stored("p1").await.unwrap();

    let report = h.pass(TickMode::Live).await.unwrap();
    assert_eq!(report.changed_count(), 0);
    assert_eq!(store.update_count(), writes);
    assert_eq!(store.stored("p1").await.unwrap(), first);
}

#[tokio::test]
async fn other_owners_pets_are_left_alone() {
    let mut theirs = fixtures::pet("p2", "Tom", Species::Cat, 30, t0());
    theirs.owner_id = "someone-else".into();
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 30, t0()))
        .with_pet(theirs.clone())
        .build()
        .await
        .unwrap();

    h.advance(Duration::hours(2));
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    assert_eq!(report.pets.len(), 1);
    assert_eq!(h.stored("p2").await.unwrap(), Some(theirs));

    let err = h
        .runner
        .perform_care("p2", CareAction::Feed, h.now())
        .await
        .unwrap_err();
    assert!(matches!(err, PetsimError::NotFound { .. }));
}

#[tokio::test]
#[traced_test]
async fn failed_write_is_retained_and_retried() {
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 30, t0()))
        .build()
        .await
        .unwrap();
    let store = h.mock_store().unwrap().clone();

    store.set_fail_writes(true);
    h.advance(Duration::minutes(65));
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    assert_eq!(report.unsynced_count(), 1);
    assert!(report.outcome("p1").unwrap().error.is_some());
    assert!(logs_contain("retaining in memory"));
    assert_eq!(h.runner.unsynced_count().await, 1);

    // The stored copy is stale but the runner reports the retained one.
    assert_eq!(store.stored("p1").await.unwrap().stats.hunger, 30);
    assert_eq!(h.runner.pets().await.unwrap()[0].stats.hunger, 42);
    let titles: Vec<String> = h.center.snapshot().await.into_iter().map(|n| n.title).collect();
    assert!(titles.contains(&"Sync Issue".to_string()));

    store.set_fail_writes(false);
    h.advance(Duration::minutes(5));
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    assert_eq!(report.unsynced_count(), 0);
    assert_eq!(h.runner.unsynced_count().await, 0);

    // Continued from the retained record, so its decay timestamp is kept.
    let stored = store.stored("p1").await.unwrap();
    assert_eq!(stored.stats.hunger, 42);
    assert_eq!(stored.last_stats_decay, t0() + Duration::minutes(65));
}

#[tokio::test]
async fn unavailable_catalog_is_reported_then_cached_once_loaded() {
    let builtin = Catalog::builtin();
    let catalog = Arc::new(MockCatalog::new(builtin.diseases, builtin.vaccines));
    catalog.set_fail(true);
    let h = TestHarness::builder()
        .with_catalog(catalog.clone())
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 30, t0()))
        .build()
        .await
        .unwrap();

    h.advance(Duration::minutes(30));
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    assert!(report.catalog_error.is_some());
    assert!(report.outcome("p1").unwrap().changed);

    catalog.set_fail(false);
    for _ in 0..3 {
        h.advance(Duration::minutes(30));
        let report = h.pass(TickMode::CatchUp).await.unwrap();
        assert!(report.catalog_error.is_none());
    }
    assert_eq!(catalog.load_count(), 1);
}

#[tokio::test]
async fn catalog_outage_keeps_vaccine_acknowledgements() {
    let builtin = Catalog::builtin();
    let catalog = Arc::new(MockCatalog::new(builtin.diseases, builtin.vaccines));
    let h = TestHarness::builder()
        .with_catalog(catalog.clone())
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 16, t0()))
        .build()
        .await
        .unwrap();
    let key = "p1|vaccination|Vaccine Overdue: DHPP|vaccinate";
    h.read_state
        .acknowledge("p1", key, AckState::Read, t0())
        .await
        .unwrap();

    catalog.set_fail(true);
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    assert!(report.catalog_error.is_some());
    assert_eq!(report.notifications.as_ref().unwrap().forgotten, 0);
    assert_eq!(
        h.read_state.acknowledgement(key).await.unwrap(),
        Some(AckState::Read)
    );

    catalog.set_fail(false);
    h.advance(Duration::minutes(1));
    let report = h.pass(TickMode::CatchUp).await.unwrap();
    assert!(report.catalog_error.is_none());
    let overdue = h
        .center
        .snapshot()
        .await
        .into_iter()
        .find(|n| n.title == "Vaccine Overdue: DHPP")
        .expect("overdue alert derived once the catalog is back");
    assert!(overdue.read);
    assert!(
        !h.delivery
            .delivered()
            .await
            .iter()
            .any(|n| n.title == "Vaccine Overdue: DHPP")
    );
}

#[tokio::test]
async fn unseeded_catalog_is_reported_every_pass() {
    let catalog = Arc::new(MockCatalog::empty());
    let h = TestHarness::builder()
        .with_catalog(catalog.clone())
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 16, t0()))
        .build()
        .await
        .unwrap();

    for _ in 0..2 {
        let report = h.pass(TickMode::CatchUp).await.unwrap();
        let error = report.catalog_error.expect("empty catalog reported");
        assert!(error.contains("no disease entries"));
        h.advance(Duration::minutes(1));
    }
    assert_eq!(catalog.load_count(), 2);
}

#[tokio::test]
async fn critical_health_is_pushed_once() {
    let mut pet = fixtures::pet("p1", "Rex", Species::Hamster, 30, t0());
    pet.stats.health = 10;
    let h = TestHarness::builder().with_pet(pet).build().await.unwrap();

    for _ in 0..3 {
        h.pass(TickMode::Live).await.unwrap();
        h.advance(Duration::minutes(1));
    }
    let delivered = h.delivery.delivered().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].title, "Health Emergency");
    assert_eq!(h.center.critical_count().await, 1);
}

#[tokio::test]
async fn seeded_onset_is_reproducible() {
    async fn history(seed: u64) -> Vec<String> {
        let h = TestHarness::builder()
            .with_onset(seed)
            .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 2, t0()))
            .build()
            .await
            .unwrap();
        for _ in 0..24 {
            h.advance(Duration::hours(1));
            h.pass(TickMode::CatchUp).await.unwrap();
        }
        h.stored("p1")
            .await
            .unwrap()
            .unwrap()
            .diseases
            .into_iter()
            .map(|d| d.disease_id)
            .collect()
    }

    assert_eq!(history(42).await, history(42).await);
}

#[tokio::test]
async fn onset_disabled_never_adds_diseases() {
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 2, t0()))
        .build()
        .await
        .unwrap();
    for _ in 0..12 {
        h.advance(Duration::hours(1));
        let report = h.pass(TickMode::CatchUp).await.unwrap();
        assert_eq!(report.onset_count(), 0);
    }
    assert!(h.stored("p1").await.unwrap().unwrap().diseases.is_empty());
}

#[tokio::test]
async fn care_reconciles_before_applying() {
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Cat, 30, t0()))
        .build()
        .await
        .unwrap();

    h.advance(Duration::minutes(60));
    let outcome = h
        .runner
        .perform_care("p1", CareAction::Feed, h.now())
        .await
        .unwrap();
    assert!(outcome.synced);
    // two live intervals (+10 hunger) then a meal (-30)
    assert_eq!(outcome.pet.stats.hunger, 10);
    assert_eq!(outcome.pet.last_fed, h.now());
    assert_eq!(h.stored("p1").await.unwrap(), Some(outcome.pet));
}

#[tokio::test]
async fn care_respects_senior_caps() {
    let mut senior = fixtures::pet("p1", "Old Rex", Species::Dog, 90, t0());
    senior.stats.health = 100;
    senior.stats.energy = 70;
    let h = TestHarness::builder().with_pet(senior).build().await.unwrap();

    let outcome = h
        .runner
        .perform_care("p1", CareAction::Rest, h.now())
        .await
        .unwrap();
    assert_eq!(outcome.pet.stats.energy, 80);
    assert_eq!(outcome.pet.stats.health, 90);

    let stored = h.stored("p1").await.unwrap().unwrap();
    assert_eq!((stored.stats.health, stored.stats.energy), (90, 80));
}

#[tokio::test]
async fn care_on_unknown_pet_is_not_found() {
    let h = TestHarness::builder().build().await.unwrap();
    let err = h
        .runner
        .perform_care("ghost", CareAction::Play, h.now())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn sqlite_backed_pass_keeps_read_state() {
    let mut pet = fixtures::pet("p1", "Rex", Species::Hamster, 30, t0());
    pet.last_fed = t0() - Duration::hours(7);
    let h = TestHarness::builder()
        .with_sqlite()
        .with_pet(pet)
        .build()
        .await
        .unwrap();

    h.advance(Duration::minutes(65));
    h.pass(TickMode::CatchUp).await.unwrap();
    let stored = h.stored("p1").await.unwrap().unwrap();
    assert_eq!(stored.stats.hunger, 42);

    let reminder = h
        .center
        .snapshot()
        .await
        .into_iter()
        .find(|n| n.title == "Feeding Reminder")
        .expect("reminder derived");
    h.center.mark_read(&reminder.id, h.now()).await.unwrap();

    h.advance(Duration::minutes(30));
    h.pass(TickMode::CatchUp).await.unwrap();
    let held = h
        .center
        .snapshot()
        .await
        .into_iter()
        .find(|n| n.title == "Feeding Reminder")
        .expect("reminder still held");
    assert!(held.read);
}
