// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! petsim - virtual pet lifecycle engine.
//!
//! This is the binary entry point. Every subcommand loads configuration,
//! builds an [`app::App`] for the acting owner, and runs against it.

mod app;
mod commands;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use petsim_config::model::PetsimConfig;
use petsim_core::{PetsimError, Species};

use crate::commands::CareKind;

/// petsim - virtual pet lifecycle engine.
#[derive(Parser, Debug)]
#[command(name = "petsim", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Owner to act as. Defaults to `app.owner_id`.
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler until SIGINT/SIGTERM.
    Serve,
    /// Run one catch-up reconciliation pass and exit.
    Pass,
    /// Adopt a new pet.
    Adopt {
        name: String,
        /// dog, cat, bird, rabbit, or hamster.
        #[arg(long)]
        species: Species,
    },
    /// Catch up, then apply a care action to a pet.
    Care {
        pet_id: String,
        #[arg(value_enum)]
        action: CareKind,
        /// Vaccine id for `vaccinate`, disease id for `treat`.
        #[arg(long)]
        target: Option<String>,
    },
    /// Catch up, then show pets and notifications.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Catch up, then acknowledge every current notification.
    Ack {
        /// Dismiss instead of marking read.
        #[arg(long)]
        clear: bool,
    },
    /// Write the built-in reference catalog into the database.
    SeedCatalog,
}

fn load_config(path: Option<&PathBuf>) -> PetsimConfig {
    let loaded = match path {
        Some(path) => petsim_config::load_and_validate_path(path),
        None => petsim_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            petsim_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("petsim={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli, config: PetsimConfig) -> Result<(), PetsimError> {
    let Some(command) = cli.command else {
        println!("petsim: use --help for available commands");
        return Ok(());
    };

    let owner = || app::resolve_owner(cli.owner.clone(), &config);
    match command {
        Commands::Serve => serve::run_serve(&config, &owner()?).await,
        Commands::Pass => commands::pass(&config, &owner()?).await,
        Commands::Adopt { name, species } => {
            commands::adopt(&config, &owner()?, &name, species).await
        }
        Commands::Care {
            pet_id,
            action,
            target,
        } => commands::care(&config, &owner()?, &pet_id, action, target.as_deref()).await,
        Commands::Status { json, plain } => {
            status::run_status(&config, &owner()?, json, plain).await
        }
        Commands::Ack { clear } => commands::ack(&config, &owner()?, clear).await,
        Commands::SeedCatalog => commands::seed_catalog(&config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.app.log_level);

    if let Err(e) = dispatch(cli, config).await {
        eprintln!("petsim: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_care_with_target() {
        let cli = Cli::try_parse_from([
            "petsim", "--owner", "o1", "care", "p1", "vaccinate", "--target", "dhpp",
        ])
        .unwrap();
        assert_eq!(cli.owner.as_deref(), Some("o1"));
        match cli.command {
            Some(Commands::Care {
                pet_id,
                action,
                target,
            }) => {
                assert_eq!(pet_id, "p1");
                assert_eq!(action, CareKind::Vaccinate);
                assert_eq!(target.as_deref(), Some("dhpp"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn species_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["petsim", "adopt", "Mochi", "--species", "Cat"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Adopt {
                species: Species::Cat,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["petsim", "adopt", "X", "--species", "dragon"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = petsim_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.app.name, "petsim");
    }
}
