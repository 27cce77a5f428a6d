// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derivation rules: one pet's state in, fresh notifications out.
//!
//! Rules are independent and may co-fire. Titles are stable per condition so
//! the merge stage and the read-state store can recognise a re-derived alert;
//! the message carries the changing detail.

use chrono::{DateTime, Duration, Utc};
use petsim_core::{
    ActionTag, Notification, NotificationCategory, PetRecord, Priority, Severity, VaccineRef,
};
use petsim_health::{ActiveDisease, RiskAssessment};

/// Untreated severe diseases escalate after this long.
const SEVERE_ESCALATION_DAYS: i64 = 7;

struct Rule<'a> {
    pet: &'a PetRecord,
    now: DateTime<Utc>,
    out: Vec<Notification>,
}

impl Rule<'_> {
    #[allow(clippy::too_many_arguments)]
    fn emit(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
        priority: Priority,
        action: ActionTag,
        ttl: Duration,
    ) {
        self.out.push(Notification::new(
            title,
            message,
            category,
            priority,
            &self.pet.id,
            &self.pet.name,
            self.now,
            Some(self.now + ttl),
            Some(action),
        ));
    }
}

/// Time-to-live for a stat alert of the given priority.
fn stat_ttl(priority: Priority) -> Duration {
    match priority {
        Priority::Critical | Priority::High => Duration::hours(2),
        Priority::Medium | Priority::Low => Duration::hours(4),
    }
}

/// Derive every notification `pet` warrants at `now`.
pub fn derive(
    pet: &PetRecord,
    required: &[VaccineRef],
    overdue: &[VaccineRef],
    risks: &[RiskAssessment],
    active: &[ActiveDisease],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut rule = Rule {
        pet,
        now,
        out: Vec::new(),
    };
    let name = &pet.name;
    let stats = pet.stats;

    use ActionTag::*;
    use NotificationCategory as C;
    use Priority::*;

    // Vital stats.
    if stats.health <= 15 {
        rule.emit(
            "Health Emergency",
            format!("{name}'s health is critically low ({}%). Visit the vet now.", stats.health),
            C::HealthCritical,
            Critical,
            VisitVet,
            stat_ttl(Critical),
        );
    } else if stats.health <= 40 {
        rule.emit(
            "Health Warning",
            format!("{name}'s health is at {}%.", stats.health),
            C::HealthCritical,
            High,
            VisitVet,
            stat_ttl(High),
        );
    }

    let hunger = match stats.hunger {
        90.. => Some(("Starving", Critical)),
        60..=89 => Some(("Very Hungry", High)),
        40..=59 => Some(("Hungry", Medium)),
        _ => None,
    };
    if let Some((title, priority)) = hunger {
        rule.emit(
            title,
            format!("{name}'s hunger is at {}%.", stats.hunger),
            C::Hunger,
            priority,
            Feed,
            stat_ttl(priority),
        );
    }

    let energy = match stats.energy {
        0..=10 => Some(("Exhausted", Critical)),
        11..=20 => Some(("Very Tired", High)),
        21..=40 => Some(("Tired", Medium)),
        _ => None,
    };
    if let Some((title, priority)) = energy {
        rule.emit(
            title,
            format!("{name}'s energy is down to {}%.", stats.energy),
            C::Energy,
            priority,
            Rest,
            stat_ttl(priority),
        );
    }

    let cleanliness = match stats.cleanliness {
        0..=20 => Some(("Very Dirty", High)),
        21..=40 => Some(("Needs a Bath", Medium)),
        _ => None,
    };
    if let Some((title, priority)) = cleanliness {
        rule.emit(
            title,
            format!("{name}'s cleanliness is at {}%.", stats.cleanliness),
            C::Cleanliness,
            priority,
            Clean,
            stat_ttl(priority),
        );
    }

    let happiness = match stats.happiness {
        0..=20 => Some(("Very Unhappy", High)),
        21..=40 => Some(("Feeling Lonely", Medium)),
        _ => None,
    };
    if let Some((title, priority)) = happiness {
        rule.emit(
            title,
            format!("{name}'s happiness is at {}%.", stats.happiness),
            C::Happiness,
            priority,
            Play,
            stat_ttl(priority),
        );
    }

    // Care reminders keyed off the last-event timestamps.
    let hours_since_fed = (now - pet.last_fed).num_hours();
    if hours_since_fed >= 12 {
        rule.emit(
            "Feeding Overdue",
            format!("{name} has not eaten for {hours_since_fed} hours."),
            C::Reminder,
            High,
            Feed,
            Duration::hours(12),
        );
    } else if hours_since_fed >= 6 {
        rule.emit(
            "Feeding Reminder",
            format!("{name} has not eaten for {hours_since_fed} hours."),
            C::Reminder,
            Medium,
            Feed,
            Duration::hours(12),
        );
    }

    let hours_since_played = (now - pet.last_played).num_hours();
    if hours_since_played >= 8 {
        rule.emit(
            "Playtime Reminder",
            format!("{name} has not played for {hours_since_played} hours."),
            C::Reminder,
            Medium,
            Play,
            Duration::hours(12),
        );
    }

    let days_since_cleaned = (now - pet.last_cleaned).num_days();
    if days_since_cleaned >= 3 {
        rule.emit(
            "Cleaning Reminder",
            format!("{name} has not been cleaned for {days_since_cleaned} days."),
            C::Reminder,
            Medium,
            Clean,
            Duration::hours(12),
        );
    }

    // Vaccinations.
    for vaccine in overdue {
        rule.emit(
            format!("Vaccine Overdue: {}", vaccine.name),
            format!("{name} is overdue for the {} vaccine.", vaccine.name),
            C::Vaccination,
            Critical,
            Vaccinate,
            Duration::hours(24),
        );
    }
    for vaccine in required.iter().filter(|v| !overdue.iter().any(|o| o.id == v.id)) {
        rule.emit(
            format!("Vaccine Due: {}", vaccine.name),
            format!("{name} is due for the {} vaccine.", vaccine.name),
            C::Vaccination,
            High,
            Vaccinate,
            Duration::hours(24),
        );
    }

    // Diseases.
    for episode in active {
        let untreated_days = (now - episode.since).num_days();
        if episode.disease.severity == Severity::Severe && untreated_days >= SEVERE_ESCALATION_DAYS
        {
            rule.emit(
                format!("Severe Illness: {}", episode.disease.name),
                format!(
                    "{name} has had untreated {} for {untreated_days} days.",
                    episode.disease.name
                ),
                C::Disease,
                Critical,
                VisitVet,
                Duration::hours(24),
            );
        }
    }
    let active_ids: Vec<&str> = active.iter().map(|a| a.disease.id.as_str()).collect();
    for risk in risks
        .iter()
        .filter(|r| r.is_high_risk && !active_ids.contains(&r.disease.id.as_str()))
    {
        let tip = risk
            .prevention_tips
            .first()
            .map(|t| format!(" Tip: {t}."))
            .unwrap_or_default();
        rule.emit(
            format!("Health Risk: {}", risk.disease.name),
            format!(
                "{name} has a {:.0}% risk of {}.{tip}",
                risk.risk_percentage, risk.disease.name
            ),
            C::Disease,
            Low,
            ViewPet,
            Duration::hours(24),
        );
    }

    // Age milestones fire only while the age equals the milestone.
    let milestone = match pet.age_months {
        6 => Some(("Milestone: 6 Months", "is six months old and growing fast", Medium)),
        12 => Some(("Milestone: First Birthday", "turned one today", High)),
        52 => Some(("Milestone: 52 Months", "is in the prime of life", Medium)),
        84 => Some(("Milestone: Senior Years", "is entering the senior years", High)),
        _ => None,
    };
    if let Some((title, text, priority)) = milestone {
        rule.emit(
            title,
            format!("{name} {text}."),
            C::AgingMilestone,
            priority,
            ViewPet,
            Duration::hours(72),
        );
    }

    rule.out
}

/// System alert raised when a pet's reconciled state could not be persisted.
pub fn sync_issue(pet: &PetRecord, now: DateTime<Utc>) -> Notification {
    Notification::new(
        "Sync Issue",
        format!(
            "{}'s latest state could not be saved. It will be retried automatically.",
            pet.name
        ),
        NotificationCategory::System,
        Priority::Medium,
        &pet.id,
        &pet.name,
        now,
        Some(now + Duration::hours(1)),
        None,
    )
}
