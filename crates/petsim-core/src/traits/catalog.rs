// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only access to the disease and vaccine reference catalogs.

use async_trait::async_trait;

use crate::error::PetsimError;
use crate::reference::{DiseaseRef, VaccineRef};

/// Source of reference data. Callers load once and cache.
#[async_trait]
pub trait ReferenceCatalog: Send + Sync + 'static {
    async fn diseases(&self) -> Result<Vec<DiseaseRef>, PetsimError>;

    async fn vaccines(&self) -> Result<Vec<VaccineRef>, PetsimError>;
}
