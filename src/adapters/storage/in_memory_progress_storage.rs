//! In-Memory Progress Storage Adapter
//!
//! Stores progress in memory. Useful for testing and development; records
//! every successful save and can be told to fail.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::IdeaId;
use crate::domain::journey::ProgressState;
use crate::ports::{ProgressStorage, StorageError};

/// In-memory storage for journey progress
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStorage {
    states: Arc<RwLock<HashMap<IdeaId, ProgressState>>>,
    save_log: Arc<RwLock<Vec<(IdeaId, u64)>>>,
    fail_saves: Arc<AtomicBool>,
}

impl InMemoryProgressStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored state directly
    pub async fn insert(&self, state: ProgressState) {
        self.states.write().await.insert(state.idea_id(), state);
    }

    /// Make every subsequent save fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Successful saves in the order they landed, as (idea, revision)
    pub async fn save_log(&self) -> Vec<(IdeaId, u64)> {
        self.save_log.read().await.clone()
    }

    /// Revision of the stored state for an idea
    pub async fn stored_revision(&self, idea_id: IdeaId) -> Option<u64> {
        self.states.read().await.get(&idea_id).map(|s| s.revision())
    }

    /// Get the number of stored states
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl ProgressStorage for InMemoryProgressStorage {
    async fn load(&self, idea_id: IdeaId) -> Result<Option<ProgressState>, StorageError> {
        Ok(self.states.read().await.get(&idea_id).cloned())
    }

    async fn save(&self, idea_id: IdeaId, state: &ProgressState) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::IoError("simulated save failure".to_string()));
        }
        self.states.write().await.insert(idea_id, state.clone());
        self.save_log.write().await.push((idea_id, state.revision()));
        Ok(())
    }

    async fn delete(&self, idea_id: IdeaId) -> Result<bool, StorageError> {
        Ok(self.states.write().await.remove(&idea_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ProgressState {
        ProgressState::start(IdeaId::new(), Vec::new())
    }

    #[tokio::test]
    async fn save_then_load() {
        let storage = InMemoryProgressStorage::new();
        let state = state();

        storage.save(state.idea_id(), &state).await.unwrap();

        let loaded = storage.load(state.idea_id()).await.unwrap();
        assert_eq!(loaded.map(|s| s.idea_id()), Some(state.idea_id()));
        assert_eq!(storage.save_log().await, vec![(state.idea_id(), 0)]);
    }

    #[tokio::test]
    async fn injected_failure_leaves_store_untouched() {
        let storage = InMemoryProgressStorage::new();
        storage.set_fail_saves(true);
        let state = state();

        assert!(storage.save(state.idea_id(), &state).await.is_err());
        assert_eq!(storage.state_count().await, 0);

        storage.set_fail_saves(false);
        storage.save(state.idea_id(), &state).await.unwrap();
        assert_eq!(storage.state_count().await, 1);
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let storage = InMemoryProgressStorage::new();
        let state = state();
        storage.insert(state.clone()).await;

        assert!(storage.delete(state.idea_id()).await.unwrap());
        assert!(!storage.delete(state.idea_id()).await.unwrap());
    }
}
