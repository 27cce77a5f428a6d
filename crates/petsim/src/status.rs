// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `petsim status` command implementation.
//!
//! Runs a catch-up pass so the numbers are current, then prints each pet and
//! the owner's notifications. `--json` emits a structured document for
//! scripting. `--plain` or a non-TTY stdout disables colors.

use std::io::IsTerminal;

use chrono::Utc;
use petsim_config::model::PetsimConfig;
use petsim_core::{Notification, PetRecord, PetsimError, Priority, VitalStats};
use petsim_lifecycle::TickMode;
use serde::Serialize;

use crate::app::App;

/// One pet as shown by `status`.
#[derive(Debug, Serialize)]
pub struct PetStatus {
    pub id: String,
    pub name: String,
    pub species: String,
    pub stage: String,
    pub age_months: u32,
    pub weight_kg: f64,
    pub stats: VitalStats,
    pub active_diseases: Vec<String>,
}

impl From<&PetRecord> for PetStatus {
    fn from(pet: &PetRecord) -> Self {
        Self {
            id: pet.id.clone(),
            name: pet.name.clone(),
            species: pet.species.to_string(),
            stage: pet.growth_stage().to_string(),
            age_months: pet.age_months,
            weight_kg: pet.weight_kg,
            stats: pet.stats,
            active_diseases: pet
                .active_diseases()
                .into_iter()
                .map(|d| d.disease_name.clone())
                .collect(),
        }
    }
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub owner_id: String,
    pub pets: Vec<PetStatus>,
    pub unread: usize,
    pub critical: usize,
    pub unsynced: usize,
    pub notifications: Vec<Notification>,
}

/// Run the `petsim status` command.
pub async fn run_status(
    config: &PetsimConfig,
    owner: &str,
    json: bool,
    plain: bool,
) -> Result<(), PetsimError> {
    let app = App::open(config, owner).await?;
    let collected = collect(&app).await;
    app.close().await;
    let status = collected?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&status).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }
    Ok(())
}

async fn collect(app: &App) -> Result<StatusResponse, PetsimError> {
    app.runner.run_pass(Utc::now(), TickMode::CatchUp).await?;
    let pets = app.runner.pets().await?;
    Ok(StatusResponse {
        owner_id: app.runner.owner_id().to_string(),
        pets: pets.iter().map(PetStatus::from).collect(),
        unread: app.center.unread_count().await,
        critical: app.center.critical_count().await,
        unsynced: app.runner.unsynced_count().await,
        notifications: app.center.snapshot().await,
    })
}

/// Render a 0-100 stat as a ten-cell bar.
fn stat_bar(value: u8) -> String {
    let filled = usize::from(value.min(100)).div_ceil(10);
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}

fn priority_tag(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "CRIT",
        Priority::High => "HIGH",
        Priority::Medium => "MED ",
        Priority::Low => "LOW ",
    }
}

fn print_status(status: &StatusResponse, use_color: bool) {
    use colored::Colorize;

    println!();
    println!("  petsim status ({})", status.owner_id);
    println!("  {}", "-".repeat(35));

    if status.pets.is_empty() {
        println!("    No pets yet. Adopt one with: petsim adopt <name> --species <species>");
    }
    for pet in &status.pets {
        println!();
        if use_color {
            println!(
                "    {} the {} ({}, {} months, {:.2} kg)",
                pet.name.bold(),
                pet.species,
                pet.stage,
                pet.age_months,
                pet.weight_kg
            );
        } else {
            println!(
                "    {} the {} ({}, {} months, {:.2} kg)",
                pet.name, pet.species, pet.stage, pet.age_months, pet.weight_kg
            );
        }
        let s = &pet.stats;
        for (label, value) in [
            ("health", s.health),
            ("happiness", s.happiness),
            ("hunger", s.hunger),
            ("energy", s.energy),
            ("cleanliness", s.cleanliness),
        ] {
            println!("      {label:<12} {} {value:>3}", stat_bar(value));
        }
        if !pet.active_diseases.is_empty() {
            println!("      sick with:   {}", pet.active_diseases.join(", "));
        }
    }

    println!();
    println!(
        "  Notifications: {} unread, {} critical",
        status.unread, status.critical
    );
    for n in &status.notifications {
        let marker = if n.read { " " } else { "*" };
        let tag = priority_tag(n.priority);
        if use_color {
            let tag = match n.priority {
                Priority::Critical => tag.red().bold(),
                Priority::High => tag.yellow(),
                Priority::Medium => tag.normal(),
                Priority::Low => tag.dimmed(),
            };
            println!("    {marker} [{tag}] {}: {}", n.pet_name, n.message);
        } else {
            println!("    {marker} [{tag}] {}: {}", n.pet_name, n.message);
        }
    }
    if status.unsynced > 0 {
        println!();
        if use_color {
            println!(
                "  {} {} pet(s) could not be saved; will retry",
                "!".yellow(),
                status.unsynced
            );
        } else {
            println!("  [WARN] {} pet(s) could not be saved; will retry", status.unsynced);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stat_bar_rounds_up_partial_cells() {
        assert_eq!(stat_bar(0), "..........");
        assert_eq!(stat_bar(5), "#.........");
        assert_eq!(stat_bar(100), "##########");
    }

    #[test]
    fn pet_status_carries_stage_and_stats() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut pet = PetRecord::new("o1", "Rex", petsim_core::Species::Dog, 3.0, now);
        pet.age_months = 30;
        let status = PetStatus::from(&pet);
        assert_eq!(status.stage, "ADULT");
        assert_eq!(status.species, "dog");
        assert_eq!(status.stats, pet.stats);
    }

    #[test]
    fn status_response_serializes() {
        let resp = StatusResponse {
            owner_id: "o1".into(),
            pets: Vec::new(),
            unread: 2,
            critical: 1,
            unsynced: 0,
            notifications: Vec::new(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"owner_id\":\"o1\""));
        assert!(json.contains("\"critical\":1"));
    }
}
