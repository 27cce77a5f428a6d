// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification types shared by the derivation pipeline, the notification
//! center, storage, and push delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What kind of condition a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    HealthCritical,
    Hunger,
    Energy,
    Cleanliness,
    Happiness,
    Vaccination,
    Disease,
    AgingMilestone,
    Reminder,
    System,
}

/// Priority tier. Ordering follows the numeric tier, so `Critical` sorts highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Priority {
    pub fn tier(self) -> u8 {
        self as u8
    }
}

/// Suggested user action attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    Feed,
    Play,
    Clean,
    Rest,
    Vaccinate,
    VisitVet,
    ViewPet,
}

/// A derived, user-facing alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Ephemeral identifier, regenerated on every derivation pass.
    pub id: String,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub priority: Priority,
    pub pet_id: String,
    pub pet_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub action: Option<ActionTag>,
    pub read: bool,
}

/// Identity used to correlate a fresh notification with a held one.
///
/// Titles are stable per condition while messages carry fresh numbers, so
/// the generated id and the message are deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub title: String,
    pub pet_id: String,
    pub category: NotificationCategory,
}

impl Notification {
    /// Build an unread notification with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
        priority: Priority,
        pet_id: impl Into<String>,
        pet_name: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        action: Option<ActionTag>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            category,
            priority,
            pet_id: pet_id.into(),
            pet_name: pet_name.into(),
            created_at,
            expires_at,
            action,
            read: false,
        }
    }

    pub fn merge_key(&self) -> MergeKey {
        MergeKey {
            title: self.title.clone(),
            pet_id: self.pet_id.clone(),
            category: self.category,
        }
    }

    /// Persisted acknowledgement key built from title, pet, category and action.
    ///
    /// Two distinct conditions sharing all four components collide; that is
    /// an accepted approximation.
    pub fn read_key(&self) -> String {
        let action = self
            .action
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "{}|{}|{}|{}",
            self.pet_id, self.category, self.title, action
        )
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn is_critical_unread(&self) -> bool {
        self.priority == Priority::Critical && !self.read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(action: Option<ActionTag>) -> Notification {
        Notification::new(
            "Feeding Reminder",
            "Rex has not eaten for 7 hours",
            NotificationCategory::Reminder,
            Priority::Medium,
            "p1",
            "Rex",
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            None,
            action,
        )
    }

    #[test]
    fn priority_orders_by_tier() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::Critical.tier(), 4);
        assert_eq!(Priority::Low.tier(), 1);
    }

    #[test]
    fn read_key_ignores_id_and_message() {
        let a = sample(Some(ActionTag::Feed));
        let mut b = sample(Some(ActionTag::Feed));
        b.message = "Rex has not eaten for 9 hours".into();
        assert_ne!(a.id, b.id);
        assert_eq!(a.read_key(), b.read_key());
        assert_eq!(a.read_key(), "p1|reminder|Feeding Reminder|feed");
    }

    #[test]
    fn read_key_includes_action_tag() {
        assert_ne!(
            sample(Some(ActionTag::Feed)).read_key(),
            sample(None).read_key()
        );
    }

    #[test]
    fn expiry_is_inclusive_of_the_deadline() {
        let mut n = sample(None);
        let now = n.created_at;
        assert!(!n.is_expired(now));
        n.expires_at = Some(now + Duration::hours(1));
        assert!(!n.is_expired(now));
        assert!(n.is_expired(now + Duration::hours(1)));
    }
}
