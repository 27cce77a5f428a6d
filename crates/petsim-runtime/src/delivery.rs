// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default push transport: writes each alert to the log.

use async_trait::async_trait;
use petsim_core::{
    AdapterType, HealthStatus, Notification, PetsimError, PluginAdapter, PushDelivery,
};
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

#[async_trait]
impl PluginAdapter for LogDelivery {
    fn name(&self) -> &str {
        "log"
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
impl PushDelivery for LogDelivery {
    async fn deliver(&self, notification: &Notification) -> Result<(), PetsimError> {
        info!(
            pet = %notification.pet_name,
            priority = ?notification.priority,
            category = %notification.category,
            title = %notification.title,
            "push: {}",
            notification.message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use petsim_core::{NotificationCategory, Priority};
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn delivery_logs_the_alert() {
        let note = Notification::new(
            "Health Emergency",
            "Rex's health is critically low (10%). Visit the vet now.",
            NotificationCategory::HealthCritical,
            Priority::Critical,
            "p1",
            "Rex",
            Utc::now(),
            None,
            None,
        );
        LogDelivery.deliver(&note).await.unwrap();
        assert!(logs_contain("push: Rex's health is critically low"));
        assert_eq!(LogDelivery.adapter_type(), AdapterType::Delivery);
    }
}
