// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-scoped notification center.
//!
//! One `NotificationCenter` exists per signed-in owner. It is built by the
//! composition root and shared by `Arc`; there is no process-wide instance.
//! The center holds the merged notification set behind an async `RwLock`,
//! persists read/cleared acknowledgements through a [`ReadStateStore`], and
//! forwards unread alerts to an optional [`PushDelivery`] at most once per
//! read key until that key is acknowledged or leaves the set.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use petsim_config::model::NotificationConfig;
use petsim_core::{
    AckState, Notification, NotificationCategory, PetsimError, Priority, PushDelivery,
    ReadStateStore,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::merge::merge;

/// Which notifications are forwarded to push delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushPolicy {
    pub enabled: bool,
    pub critical_only: bool,
}

impl Default for PushPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            critical_only: true,
        }
    }
}

impl From<&NotificationConfig> for PushPolicy {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            enabled: config.push_enabled,
            critical_only: config.critical_push_only,
        }
    }
}

/// Summary of one [`NotificationCenter::ingest`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub total: usize,
    pub unread: usize,
    pub critical: usize,
    pub pushed: usize,
    pub push_failures: usize,
    /// Acknowledgements dropped because their condition resolved.
    pub forgotten: usize,
}

#[derive(Default)]
struct CenterState {
    notifications: Vec<Notification>,
    /// Read keys already forwarded to push delivery.
    pushed: HashSet<String>,
}

pub struct NotificationCenter {
    owner_id: String,
    read_state: Arc<dyn ReadStateStore>,
    push: Option<Arc<dyn PushDelivery>>,
    policy: PushPolicy,
    state: RwLock<CenterState>,
}

impl NotificationCenter {
    pub fn new(
        owner_id: impl Into<String>,
        read_state: Arc<dyn ReadStateStore>,
        push: Option<Arc<dyn PushDelivery>>,
        policy: PushPolicy,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            read_state,
            push,
            policy,
            state: RwLock::new(CenterState::default()),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Merge a fresh derivation for `covered_pets` into the held set.
    ///
    /// Acknowledgements of covered pets whose keys were not re-derived are
    /// forgotten, so a later recurrence surfaces as unread. Fails without
    /// touching the held set if acknowledgements cannot be read.
    pub async fn ingest(
        &self,
        fresh: Vec<Notification>,
        covered_pets: &[String],
        now: DateTime<Utc>,
    ) -> Result<IngestReport, PetsimError> {
        self.ingest_partial(fresh, covered_pets, &[], now).await
    }

    /// Like [`ingest`](Self::ingest), for a derivation that could not
    /// evaluate the `skipped` categories. Acknowledgements in those
    /// categories are kept on record even though nothing re-derived them.
    pub async fn ingest_partial(
        &self,
        fresh: Vec<Notification>,
        covered_pets: &[String],
        skipped: &[NotificationCategory],
        now: DateTime<Utc>,
    ) -> Result<IngestReport, PetsimError> {
        let fresh_keys: HashSet<String> = fresh.iter().map(Notification::read_key).collect();

        let mut acks: HashMap<String, AckState> = HashMap::new();
        let mut resolved: Vec<String> = Vec::new();
        for pet_id in covered_pets {
            for key in self.read_state.acknowledged_keys(pet_id).await? {
                if !fresh_keys.contains(&key) && !in_categories(&key, skipped) {
                    resolved.push(key);
                    continue;
                }
                if let Some(state) = self.read_state.acknowledgement(&key).await? {
                    acks.insert(key, state);
                }
            }
        }

        let mut report = IngestReport::default();
        for key in &resolved {
            match self.read_state.forget(key).await {
                Ok(()) => report.forgotten += 1,
                Err(e) => warn!(key = %key, error = %e, "failed to forget resolved acknowledgement"),
            }
        }

        let to_push: Vec<Notification> = {
            let mut state = self.state.write().await;
            let merged = merge(&state.notifications, fresh, &acks, now);

            let unread_keys: HashSet<String> = merged
                .iter()
                .filter(|n| !n.read)
                .map(Notification::read_key)
                .collect();
            state.pushed.retain(|key| unread_keys.contains(key));
            state.notifications = merged;

            state
                .notifications
                .iter()
                .filter(|n| self.wants_push(n) && !state.pushed.contains(&n.read_key()))
                .cloned()
                .collect()
        };

        let delivered = self.deliver_all(&to_push, &mut report).await;

        let mut state = self.state.write().await;
        state.pushed.extend(delivered);
        report.total = state.notifications.len();
        report.unread = state.notifications.iter().filter(|n| !n.read).count();
        report.critical = state
            .notifications
            .iter()
            .filter(|n| n.is_critical_unread())
            .count();

        debug!(
            owner_id = %self.owner_id,
            total = report.total,
            unread = report.unread,
            critical = report.critical,
            pushed = report.pushed,
            forgotten = report.forgotten,
            "notification set merged"
        );
        Ok(report)
    }

    fn wants_push(&self, notification: &Notification) -> bool {
        self.push.is_some()
            && self.policy.enabled
            && !notification.read
            && (!self.policy.critical_only || notification.priority == Priority::Critical)
    }

    /// Deliver each notification, returning the read keys that went through.
    async fn deliver_all(
        &self,
        notifications: &[Notification],
        report: &mut IngestReport,
    ) -> Vec<String> {
        let Some(push) = &self.push else {
            return Vec::new();
        };

        let mut delivered = Vec::new();
        for notification in notifications {
            match push.deliver(notification).await {
                Ok(()) => {
                    report.pushed += 1;
                    delivered.push(notification.read_key());
                }
                Err(e) => {
                    report.push_failures += 1;
                    warn!(
                        pet_id = %notification.pet_id,
                        title = %notification.title,
                        error = %e,
                        "push delivery failed; will retry next pass"
                    );
                }
            }
        }
        delivered
    }

    /// Current notification set, highest priority first.
    pub async fn snapshot(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Unread critical notifications.
    pub async fn critical_count(&self) -> usize {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.is_critical_unread())
            .count()
    }

    async fn find(&self, id: &str) -> Result<Notification, PetsimError> {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| PetsimError::NotFound {
                entity: "notification".to_string(),
                id: id.to_string(),
            })
    }

    /// Mark one notification read and persist its read key.
    pub async fn mark_read(&self, id: &str, now: DateTime<Utc>) -> Result<(), PetsimError> {
        let notification = self.find(id).await?;
        let key = notification.read_key();
        self.read_state
            .mark_read(&notification.pet_id, &key, now)
            .await?;

        let mut state = self.state.write().await;
        if let Some(held) = state.notifications.iter_mut().find(|n| n.id == id) {
            held.read = true;
        }
        state.pushed.remove(&key);
        Ok(())
    }

    /// Mark every unread notification read. Returns how many changed.
    pub async fn mark_all_read(&self, now: DateTime<Utc>) -> Result<usize, PetsimError> {
        let unread: Vec<Notification> = self
            .state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| !n.read)
            .cloned()
            .collect();

        for notification in &unread {
            self.read_state
                .mark_read(&notification.pet_id, &notification.read_key(), now)
                .await?;
        }

        let ids: HashSet<&str> = unread.iter().map(|n| n.id.as_str()).collect();
        let mut state = self.state.write().await;
        for held in state.notifications.iter_mut() {
            if ids.contains(held.id.as_str()) {
                held.read = true;
            }
        }
        state.pushed.clear();
        Ok(unread.len())
    }

    /// Dismiss one notification until its condition changes.
    pub async fn clear(&self, id: &str, now: DateTime<Utc>) -> Result<(), PetsimError> {
        let notification = self.find(id).await?;
        let key = notification.read_key();
        self.read_state
            .acknowledge(&notification.pet_id, &key, AckState::Cleared, now)
            .await?;

        let mut state = self.state.write().await;
        state.notifications.retain(|n| n.id != id);
        state.pushed.remove(&key);
        Ok(())
    }

    /// Dismiss everything currently held. Returns how many were cleared.
    pub async fn clear_all(&self, now: DateTime<Utc>) -> Result<usize, PetsimError> {
        let held = self.snapshot().await;
        for notification in &held {
            self.read_state
                .acknowledge(
                    &notification.pet_id,
                    &notification.read_key(),
                    AckState::Cleared,
                    now,
                )
                .await?;
        }

        let ids: HashSet<&str> = held.iter().map(|n| n.id.as_str()).collect();
        let mut state = self.state.write().await;
        state.notifications.retain(|n| !ids.contains(n.id.as_str()));
        state.pushed.clear();
        Ok(held.len())
    }
}

/// Whether a read key (`pet|category|title|action`) belongs to one of `categories`.
fn in_categories(key: &str, categories: &[NotificationCategory]) -> bool {
    let Some(category) = key.split('|').nth(1) else {
        return false;
    };
    categories.iter().any(|c| c.to_string() == category)
}
