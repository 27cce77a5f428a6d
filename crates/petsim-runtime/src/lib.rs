// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime orchestration for petsim.
//!
//! - [`ReconciliationRunner`] drives one pass over an owner's pets:
//!   reconcile, persist, schedule, derive, then one merge into the
//!   owner's notification center. Care actions and adoption go through it
//!   too, so they share the per-pet locks.
//! - [`Scheduler`] fires passes on the foreground/background cadence until
//!   its cancellation token trips.
//! - [`shutdown`] wires SIGINT/SIGTERM to that token.

pub mod delivery;
pub mod runner;
pub mod scheduler;
pub mod shutdown;

pub use delivery::LogDelivery;
pub use runner::{CareOutcome, PassReport, PetOutcome, ReconciliationRunner};
pub use scheduler::Scheduler;
