// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic reconciliation trigger.
//!
//! The scheduler runs a catch-up pass immediately, then one pass per
//! interval: live passes every `foreground_interval_secs` while in the
//! foreground, catch-up passes every `background_interval_secs` otherwise.
//! [`Scheduler::trigger_now`] (or returning to the foreground) requests an
//! immediate catch-up pass. Cancellation is observed between passes only;
//! a pass in flight always completes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use petsim_config::model::SchedulerConfig;
use petsim_core::Clock;
use petsim_lifecycle::TickMode;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::runner::ReconciliationRunner;

pub struct Scheduler {
    runner: Arc<ReconciliationRunner>,
    clock: Arc<dyn Clock>,
    foreground_interval: Duration,
    background_interval: Duration,
    foreground: AtomicBool,
    wake: Notify,
}

impl Scheduler {
    pub fn new(
        runner: Arc<ReconciliationRunner>,
        clock: Arc<dyn Clock>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            runner,
            clock,
            foreground_interval: Duration::from_secs(config.foreground_interval_secs),
            background_interval: Duration::from_secs(config.background_interval_secs),
            foreground: AtomicBool::new(config.start_in_foreground),
            wake: Notify::new(),
        }
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground.load(Ordering::SeqCst)
    }

    /// Switch cadence. Returning to the foreground requests an immediate pass.
    pub fn set_foreground(&self, foreground: bool) {
        let was = self.foreground.swap(foreground, Ordering::SeqCst);
        if foreground && !was {
            debug!("resumed to foreground");
            self.trigger_now();
        }
    }

    /// Request a one-shot catch-up pass as soon as the current one (if any) ends.
    pub fn trigger_now(&self) {
        self.wake.notify_one();
    }

    fn interval(&self) -> Duration {
        if self.is_foreground() {
            self.foreground_interval
        } else {
            self.background_interval
        }
    }

    /// Run passes until `cancel` is triggered. Returns how many passes ran.
    pub async fn run(&self, cancel: CancellationToken) -> usize {
        info!(
            foreground = self.is_foreground(),
            foreground_secs = self.foreground_interval.as_secs(),
            background_secs = self.background_interval.as_secs(),
            "scheduler started"
        );

        let mut passes = 0;
        let mut mode = TickMode::CatchUp;
        loop {
            self.pass(mode).await;
            passes += 1;

            mode = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.wake.notified() => TickMode::CatchUp,
                _ = tokio::time::sleep(self.interval()) => {
                    if self.is_foreground() { TickMode::Live } else { TickMode::CatchUp }
                }
            };
        }

        info!(passes, "scheduler shutting down");
        passes
    }

    async fn pass(&self, mode: TickMode) {
        match self.runner.run_pass(self.clock.now(), mode).await {
            Ok(report) => debug!(pets = report.pets.len(), mode = ?mode, "scheduled pass finished"),
            Err(e) => warn!(error = %e, "reconciliation pass failed (non-fatal)"),
        }
    }
}
