// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock push delivery.
//!
//! `MockDelivery` captures every notification passed to `deliver()` and can be
//! switched into a failing mode to exercise retry behaviour.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use petsim_core::traits::{PluginAdapter, PushDelivery};
use petsim_core::{AdapterType, HealthStatus, Notification, PetsimError};

pub struct MockDelivery {
    delivered: Arc<Mutex<Vec<Notification>>>,
    fail: AtomicBool,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self {
            delivered: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// All notifications successfully delivered so far.
    pub async fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().await.clone()
    }

    pub async fn delivered_count(&self) -> usize {
        self.delivered.lock().await.len()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDelivery {
    fn name(&self) -> &str {
        "mock-delivery"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, PetsimError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PetsimError> {
        Ok(())
    }
}

#[async_trait]
impl PushDelivery for MockDelivery {
    async fn deliver(&self, notification: &Notification) -> Result<(), PetsimError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PetsimError::Delivery {
                message: "mock transport unreachable".into(),
                source: None,
            });
        }
        self.delivered.lock().await.push(notification.clone());
        Ok(())
    }
}
