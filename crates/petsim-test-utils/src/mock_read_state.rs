// SPDX-FileCopyrightText: 2026 Petsim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory acknowledgement store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use petsim_core::traits::ReadStateStore;
use petsim_core::{AckState, PetsimError};

/// `ReadStateStore` backed by a map of key -> (pet id, state).
pub struct MockReadState {
    acks: Mutex<HashMap<String, (String, AckState)>>,
    fail: AtomicBool,
}

impl MockReadState {
    pub fn new() -> Self {
        Self {
            acks: Mutex::new(HashMap::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every call return a storage error.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored acknowledgements.
    pub async fn entries(&self) -> HashMap<String, AckState> {
        self.acks
            .lock()
            .await
            .iter()
            .map(|(k, (_, s))| (k.clone(), *s))
            .collect()
    }

    fn check(&self) -> Result<(), PetsimError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PetsimError::Storage {
                source: "mock read-state failure".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockReadState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadStateStore for MockReadState {
    async fn acknowledgement(&self, key: &str) -> Result<Option<AckState>, PetsimError> {
        self.check()?;
        Ok(self.acks.lock().await.get(key).map(|(_, s)| *s))
    }

    async fn acknowledge(
        &self,
        pet_id: &str,
        key: &str,
        state: AckState,
        _at: DateTime<Utc>,
    ) -> Result<(), PetsimError> {
        self.check()?;
        self.acks
            .lock()
            .await
            .insert(key.to_string(), (pet_id.to_string(), state));
        Ok(())
    }

    async fn acknowledged_keys(&self, pet_id: &str) -> Result<Vec<String>, PetsimError> {
        self.check()?;
        let mut keys: Vec<String> = self
            .acks
            .lock()
            .await
            .iter()
            .filter(|(_, (owner, _))| owner == pet_id)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn forget(&self, key: &str) -> Result<(), PetsimError> {
        self.check()?;
        self.acks.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::t0;

    #[tokio::test]
    async fn default_methods_round_trip() {
        let store = MockReadState::new();
        assert!(!store.is_read("k").await.unwrap());
        store.mark_read("p1", "k", t0()).await.unwrap();
        assert!(store.is_read("k").await.unwrap());
        assert_eq!(store.acknowledged_keys("p1").await.unwrap(), vec!["k"]);
        store.forget("k").await.unwrap();
        assert!(!store.is_read("k").await.unwrap());
    }
}
