// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health risk and vaccination scheduling for petsim.
//!
//! Everything here is a pure function of a pet record, a loaded [`Catalog`],
//! and (for onset) an injected random source.

pub mod catalog;
pub mod onset;
pub mod risk;
pub mod vaccines;

pub use catalog::{BuiltinCatalog, Catalog};
pub use onset::{ActiveDisease, DiseaseImpact, active_diseases, disease_impact, maybe_trigger_disease};
pub use risk::{HIGH_RISK_PERCENT, RiskAssessment, disease_risk};
pub use vaccines::{overdue_vaccines, required_vaccines};
