// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Adapters with a lifecycle extend [`PluginAdapter`] and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod catalog;
pub mod delivery;
pub mod read_state;
pub mod storage;

pub use adapter::PluginAdapter;
pub use catalog::ReferenceCatalog;
pub use delivery::PushDelivery;
pub use read_state::ReadStateStore;
pub use storage::PetStore;
