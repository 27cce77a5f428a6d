// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification pipeline for petsim.
//!
//! Raw pet state plus scheduler output becomes a prioritized, deduplicated
//! set of alerts:
//! - [`derive`] turns one pet into fresh notifications
//! - [`merge`] folds them into the previously held set
//! - [`NotificationCenter`] owns that set for one owner, persists read and
//!   cleared state, and forwards critical alerts to push delivery

pub mod center;
pub mod derive;
pub mod merge;

pub use center::{IngestReport, NotificationCenter, PushPolicy};
pub use derive::{derive, sync_issue};
pub use merge::merge;
