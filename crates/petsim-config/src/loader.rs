// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./petsim.toml` > `~/.config/petsim/petsim.toml` > `/etc/petsim/petsim.toml`,
//! with environment variable overrides via the `PETSIM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PetsimConfig;

/// Top-level sections recognised in env var names, e.g. `PETSIM_STORAGE_DATABASE_PATH`.
const ENV_SECTIONS: &[&str] = &[
    "app",
    "storage",
    "lifecycle",
    "scheduler",
    "notifications",
    "health",
    "catalog",
];

/// Path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/petsim/petsim.toml";

/// Path of the per-user config file, if a config dir exists on this platform.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("petsim").join("petsim.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/petsim/petsim.toml`
/// 3. `~/.config/petsim/petsim.toml`
/// 4. `./petsim.toml`
/// 5. `PETSIM_*` environment variables
pub fn load_config() -> Result<PetsimConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PetsimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PetsimConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PetsimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PetsimConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PetsimConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file("petsim.toml"))
        .merge(env_provider())
}

/// Map `PETSIM_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `PETSIM_LIFECYCLE_BABY_UNFED_HOURS` maps to `lifecycle.baby_unfed_hours`.
fn env_provider() -> Env {
    Env::prefixed("PETSIM_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(
            map_env_key("lifecycle_baby_unfed_hours"),
            "lifecycle.baby_unfed_hours"
        );
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("app_log_level"), "app.log_level");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }
}
