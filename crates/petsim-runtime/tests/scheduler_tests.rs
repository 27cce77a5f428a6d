// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduler cadence and cancellation, on paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use petsim_config::model::SchedulerConfig;
use petsim_core::Species;
use petsim_runtime::shutdown::drain_scheduler;
use petsim_test_utils::TestHarness;
use petsim_test_utils::fixtures::{self, t0};
use tokio_util::sync::CancellationToken;

fn cadence(start_in_foreground: bool) -> SchedulerConfig {
    SchedulerConfig {
        foreground_interval_secs: 60,
        background_interval_secs: 3600,
        start_in_foreground,
    }
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_runs_only_the_catch_up_pass() {
    let h = TestHarness::builder()
        .with_pet(fixtures::pet("p1", "Rex", Species::Dog, 30, t0()))
        .build()
        .await
        .unwrap();
    let scheduler = h.scheduler(&cadence(true));

    let token = CancellationToken::new();
    token.cancel();
    assert_eq!(scheduler.run(token).await, 1);
}

#[tokio::test(start_paused = true)]
async fn foreground_ticks_on_its_interval() {
    let h = TestHarness::builder().build().await.unwrap();
    let scheduler = Arc::new(h.scheduler(&cadence(true)));
    let token = CancellationToken::new();

    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        let token = token.clone();
        async move { scheduler.run(token).await }
    });

    // passes at 0s, 60s, 120s
    tokio::time::sleep(Duration::from_secs(150)).await;
    token.cancel();
    assert_eq!(drain_scheduler(handle, Duration::from_secs(5)).await, Some(3));
}

#[tokio::test(start_paused = true)]
async fn resuming_to_foreground_runs_a_pass_immediately() {
    let h = TestHarness::builder().build().await.unwrap();
    let scheduler = Arc::new(h.scheduler(&cadence(false)));
    assert!(!scheduler.is_foreground());
    let token = CancellationToken::new();

    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        let token = token.clone();
        async move { scheduler.run(token).await }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    scheduler.set_foreground(true);
    tokio::time::sleep(Duration::from_secs(1)).await;
    token.cancel();
    assert_eq!(drain_scheduler(handle, Duration::from_secs(5)).await, Some(2));
}

#[tokio::test(start_paused = true)]
async fn trigger_now_requests_one_extra_pass() {
    let h = TestHarness::builder().build().await.unwrap();
    let scheduler = Arc::new(h.scheduler(&cadence(false)));
    let token = CancellationToken::new();

    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        let token = token.clone();
        async move { scheduler.run(token).await }
    });

    tokio::time::sleep(Duration::from_secs(10)).await;
    scheduler.trigger_now();
    tokio::time::sleep(Duration::from_secs(10)).await;
    token.cancel();
    assert_eq!(drain_scheduler(handle, Duration::from_secs(5)).await, Some(2));
}
