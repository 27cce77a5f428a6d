// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! non-empty paths, positive intervals, caps and rates within the stat range.

use crate::diagnostic::ConfigError;
use crate::model::{DecayRates, PetsimConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected validation error (does not fail fast).
pub fn validate_config(config: &PetsimConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(invalid("storage.database_path must not be empty".to_string()));
    }

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        errors.push(invalid(format!(
            "app.log_level `{}` is not one of {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let lifecycle = &config.lifecycle;
    if lifecycle.decay_interval_minutes == 0 {
        errors.push(invalid(
            "lifecycle.decay_interval_minutes must be greater than 0".to_string(),
        ));
    }
    if lifecycle.aging_interval_minutes == 0 {
        errors.push(invalid(
            "lifecycle.aging_interval_minutes must be greater than 0".to_string(),
        ));
    }
    if lifecycle.senior_health_cap > 100 {
        errors.push(invalid(format!(
            "lifecycle.senior_health_cap must be at most 100, got {}",
            lifecycle.senior_health_cap
        )));
    }
    if lifecycle.senior_energy_cap > 100 {
        errors.push(invalid(format!(
            "lifecycle.senior_energy_cap must be at most 100, got {}",
            lifecycle.senior_energy_cap
        )));
    }
    check_rates("lifecycle.background", &lifecycle.background, &mut errors);
    check_rates("lifecycle.live", &lifecycle.live, &mut errors);

    let scheduler = &config.scheduler;
    if scheduler.foreground_interval_secs == 0 {
        errors.push(invalid(
            "scheduler.foreground_interval_secs must be greater than 0".to_string(),
        ));
    }
    if scheduler.background_interval_secs == 0 {
        errors.push(invalid(
            "scheduler.background_interval_secs must be greater than 0".to_string(),
        ));
    }

    if let Some(owner) = &config.app.owner_id {
        if owner.trim().is_empty() {
            errors.push(invalid("app.owner_id must not be blank when set".to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rates(section: &str, rates: &DecayRates, errors: &mut Vec<ConfigError>) {
    for (name, value) in [
        ("hunger", rates.hunger),
        ("energy", rates.energy),
        ("cleanliness", rates.cleanliness),
        ("happiness", rates.happiness),
    ] {
        if value > 100 {
            errors.push(invalid(format!(
                "{section}.{name} must be at most 100, got {value}"
            )));
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PetsimConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = PetsimConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn zero_intervals_are_all_reported() {
        let mut config = PetsimConfig::default();
        config.lifecycle.decay_interval_minutes = 0;
        config.scheduler.foreground_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_message(&errors, "decay_interval_minutes"));
        assert!(has_message(&errors, "foreground_interval_secs"));
    }

    #[test]
    fn out_of_range_rate_fails_validation() {
        let mut config = PetsimConfig::default();
        config.lifecycle.live.hunger = 150;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "lifecycle.live.hunger"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = PetsimConfig::default();
        config.app.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "log_level"));
    }

    #[test]
    fn blank_owner_fails_validation() {
        let mut config = PetsimConfig::default();
        config.app.owner_id = Some(String::new());
        assert!(validate_config(&config).is_err());
    }
}
