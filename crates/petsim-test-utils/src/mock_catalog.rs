// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference catalog with injectable content and failure.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use petsim_core::traits::ReferenceCatalog;
use petsim_core::{DiseaseRef, PetsimError, VaccineRef};

pub struct MockCatalog {
    diseases: Vec<DiseaseRef>,
    vaccines: Vec<VaccineRef>,
    fail: AtomicBool,
    loads: AtomicUsize,
}

impl MockCatalog {
    pub fn new(diseases: Vec<DiseaseRef>, vaccines: Vec<VaccineRef>) -> Self {
        Self {
            diseases,
            vaccines,
            fail: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// How many times `diseases()` has been fetched.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PetsimError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PetsimError::Storage {
                source: "mock catalog offline".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReferenceCatalog for MockCatalog {
    async fn diseases(&self) -> Result<Vec<DiseaseRef>, PetsimError> {
        self.check()?;
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.diseases.clone())
    }

    async fn vaccines(&self) -> Result<Vec<VaccineRef>, PetsimError> {
        self.check()?;
        Ok(self.vaccines.clone())
    }
}
