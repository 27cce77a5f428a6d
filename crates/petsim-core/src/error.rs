// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the petsim lifecycle engine.

use thiserror::Error;

/// The primary error type used across all petsim collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum PetsimError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Push delivery errors (transport unreachable, rejected payload).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A reference catalog (diseases or vaccines) could not be loaded.
    #[error("reference catalog `{kind}` unavailable: {source}")]
    CatalogUnavailable {
        kind: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A pet or other entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Caller supplied an input the engine refuses to apply.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PetsimError {
    /// Convenience constructor for a missing pet.
    pub fn pet_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "pet".to_string(),
            id: id.into(),
        }
    }

    /// Whether the failure is worth retrying on the next pass.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PetsimError::Storage { .. } | PetsimError::Delivery { .. } | PetsimError::Timeout { .. }
        )
    }
}
