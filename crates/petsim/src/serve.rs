// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `petsim serve` command implementation.
//!
//! Builds the owner's runtime, starts the scheduler on its own task, and
//! waits for SIGINT/SIGTERM. The pass in flight finishes before storage is
//! checkpointed and closed.

use std::sync::Arc;
use std::time::Duration;

use petsim_config::model::PetsimConfig;
use petsim_core::{PetsimError, SystemClock};
use petsim_runtime::Scheduler;
use petsim_runtime::shutdown;
use tracing::{info, warn};

use crate::app::App;

/// How long shutdown waits for an in-flight pass.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run_serve(config: &PetsimConfig, owner: &str) -> Result<(), PetsimError> {
    info!(owner_id = owner, "starting petsim serve");
    let app = App::open(config, owner).await?;

    let scheduler = Arc::new(Scheduler::new(
        app.runner.clone(),
        Arc::new(SystemClock),
        &config.scheduler,
    ));

    let cancel = shutdown::install_signal_handler();
    let handle = tokio::spawn({
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        async move { scheduler.run(cancel).await }
    });

    cancel.cancelled().await;
    match shutdown::drain_scheduler(handle, DRAIN_TIMEOUT).await {
        Some(passes) => info!(passes, "scheduler stopped"),
        None => warn!("scheduler did not stop cleanly"),
    }

    let unsynced = app.runner.unsynced_count().await;
    if unsynced > 0 {
        warn!(unsynced, "exiting with records that were never persisted");
    }
    app.close().await;

    info!("petsim serve shutdown complete");
    Ok(())
}
