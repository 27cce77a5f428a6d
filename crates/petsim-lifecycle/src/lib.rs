// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporal reconciliation engine for petsim.
//!
//! This crate provides:
//! - **Reconciler**: decay and aging catch-up keyed off the record's stored timestamps
//! - **Growth curves**: per-species weight as a function of age
//! - **Care actions**: bounded stat changes for feed/play/clean/rest and history appends

pub mod care;
pub mod growth;
pub mod reconcile;

pub use care::CareAction;
pub use growth::weight_for_age;
pub use reconcile::{Reconciler, Reconciliation, TickMode};
