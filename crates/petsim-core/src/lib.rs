// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the petsim lifecycle engine.
//!
//! This crate provides the pet record, reference catalog entries, notification
//! types, the collaborator traits (storage, read-state, catalog, push delivery),
//! and the shared error type used throughout the workspace.

pub mod clock;
pub mod error;
pub mod notification;
pub mod pet;
pub mod reference;
pub mod traits;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::PetsimError;
pub use notification::{ActionTag, MergeKey, Notification, NotificationCategory, Priority};
pub use pet::{
    DiseaseRecord, DiseaseStatus, GrowthStage, PetRecord, Severity, Species, Stat,
    VaccinationRecord, VitalStats,
};
pub use reference::{AgeRisk, CatalogKind, DiseaseRef, VaccineRef};
pub use types::{AckState, AdapterType, HealthStatus};

pub use traits::{PetStore, PluginAdapter, PushDelivery, ReadStateStore, ReferenceCatalog};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn petsim_error_variants_render() {
        let storage = PetsimError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert_eq!(storage.to_string(), "storage error: disk full");
        assert!(storage.is_transient());

        let missing = PetsimError::pet_not_found("p-9");
        assert_eq!(missing.to_string(), "pet not found: p-9");
        assert!(!missing.is_transient());

        let catalog = PetsimError::CatalogUnavailable {
            kind: CatalogKind::Vaccine.to_string(),
            source: "offline".into(),
        };
        assert!(catalog.to_string().contains("vaccine"));
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Storage,
            AdapterType::ReadState,
            AdapterType::Catalog,
            AdapterType::Delivery,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_pet_store<T: PetStore>() {}
        fn _assert_read_state<T: ReadStateStore>() {}
        fn _assert_catalog<T: ReferenceCatalog>() {}
        fn _assert_delivery<T: PushDelivery>() {}
        fn _assert_clock<T: Clock>() {}
    }
}
