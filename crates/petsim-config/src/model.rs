// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the petsim lifecycle engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level petsim configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PetsimConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Decay and aging parameters for the reconciliation engine.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Periodic reconciliation cadence.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Notification forwarding settings.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Disease onset settings.
    #[serde(default)]
    pub health: HealthConfig,

    /// Reference catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in log lines.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Owner whose pets CLI commands operate on when `--owner` is omitted.
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            owner_id: None,
        }
    }
}

fn default_app_name() -> String {
    "petsim".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "petsim.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Per-interval stat deltas. Hunger rises; the other three fall.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecayRates {
    pub hunger: u8,
    pub energy: u8,
    pub cleanliness: u8,
    pub happiness: u8,
}

impl DecayRates {
    /// Rates applied while catching up on time the process was not running.
    pub const BACKGROUND: DecayRates = DecayRates {
        hunger: 6,
        energy: 4,
        cleanliness: 3,
        happiness: 2,
    };

    /// Rates applied by the foreground timer.
    pub const LIVE: DecayRates = DecayRates {
        hunger: 5,
        energy: 3,
        cleanliness: 2,
        happiness: 1,
    };
}

/// Reconciliation engine parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Length of one decay interval in minutes.
    #[serde(default = "default_decay_interval_minutes")]
    pub decay_interval_minutes: u32,

    /// Real minutes per pet-month of aging.
    #[serde(default = "default_aging_interval_minutes")]
    pub aging_interval_minutes: u32,

    #[serde(default = "default_background_rates")]
    pub background: DecayRates,

    #[serde(default = "default_live_rates")]
    pub live: DecayRates,

    /// Hours without food after which baby pets take an extra penalty.
    #[serde(default = "default_baby_unfed_hours")]
    pub baby_unfed_hours: u32,

    #[serde(default = "default_senior_health_cap")]
    pub senior_health_cap: u8,

    #[serde(default = "default_senior_energy_cap")]
    pub senior_energy_cap: u8,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            decay_interval_minutes: default_decay_interval_minutes(),
            aging_interval_minutes: default_aging_interval_minutes(),
            background: default_background_rates(),
            live: default_live_rates(),
            baby_unfed_hours: default_baby_unfed_hours(),
            senior_health_cap: default_senior_health_cap(),
            senior_energy_cap: default_senior_energy_cap(),
        }
    }
}

fn default_decay_interval_minutes() -> u32 {
    30
}

fn default_aging_interval_minutes() -> u32 {
    60
}

fn default_background_rates() -> DecayRates {
    DecayRates::BACKGROUND
}

fn default_live_rates() -> DecayRates {
    DecayRates::LIVE
}

fn default_baby_unfed_hours() -> u32 {
    2
}

fn default_senior_health_cap() -> u8 {
    90
}

fn default_senior_energy_cap() -> u8 {
    80
}

/// Periodic trigger cadence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Seconds between passes while the app is in the foreground.
    #[serde(default = "default_foreground_interval_secs")]
    pub foreground_interval_secs: u64,

    /// Seconds between passes while the app is in the background.
    #[serde(default = "default_background_interval_secs")]
    pub background_interval_secs: u64,

    /// Whether `serve` starts in foreground cadence.
    #[serde(default = "default_start_in_foreground")]
    pub start_in_foreground: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            foreground_interval_secs: default_foreground_interval_secs(),
            background_interval_secs: default_background_interval_secs(),
            start_in_foreground: default_start_in_foreground(),
        }
    }
}

fn default_foreground_interval_secs() -> u64 {
    60
}

fn default_background_interval_secs() -> u64 {
    900
}

fn default_start_in_foreground() -> bool {
    true
}

/// Notification forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Forward alerts to the push-delivery collaborator.
    #[serde(default = "default_push_enabled")]
    pub push_enabled: bool,

    /// Only forward critical-tier alerts.
    #[serde(default = "default_critical_push_only")]
    pub critical_push_only: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            push_enabled: default_push_enabled(),
            critical_push_only: default_critical_push_only(),
        }
    }
}

fn default_push_enabled() -> bool {
    true
}

fn default_critical_push_only() -> bool {
    true
}

/// Disease onset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Roll for disease onset when a pet ages up.
    #[serde(default = "default_disease_onset_enabled")]
    pub disease_onset_enabled: bool,

    /// Fixed RNG seed for reproducible onset draws. `None` seeds from entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            disease_onset_enabled: default_disease_onset_enabled(),
            rng_seed: None,
        }
    }
}

fn default_disease_onset_enabled() -> bool {
    true
}

/// Where reference data comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Compiled-in catalog.
    #[default]
    Builtin,
    /// `reference_catalog` table in the configured database.
    Database,
}

/// Reference catalog configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,
}
