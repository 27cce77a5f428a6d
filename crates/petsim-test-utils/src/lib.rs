// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for petsim integration tests.
//!
//! Provides mock collaborators and harness infrastructure for fast,
//! deterministic tests without a real database or push transport.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory pet store with failure injection
//! - [`MockReadState`] - In-memory acknowledgement store
//! - [`MockDelivery`] - Push delivery that captures notifications
//! - [`MockCatalog`] - Reference catalog that can be made unavailable
//! - [`FixedClock`] - Manually advanced clock
//! - [`TestHarness`] - Runner wired to the mocks or a temp SQLite database

pub mod clock;
pub mod fixtures;
pub mod harness;
pub mod mock_catalog;
pub mod mock_delivery;
pub mod mock_read_state;
pub mod mock_store;

pub use clock::FixedClock;
pub use harness::TestHarness;
pub use mock_catalog::MockCatalog;
pub use mock_delivery::MockDelivery;
pub use mock_read_state::MockReadState;
pub use mock_store::MockStore;
