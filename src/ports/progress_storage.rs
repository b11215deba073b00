//! Progress Storage Port - Interface for persisting journey progress.
//!
//! Key-value load/save of the serializable [`ProgressState`], keyed by idea.
//! Saves overwrite, so repeating a save is harmless.

use async_trait::async_trait;

use crate::domain::foundation::IdeaId;
use crate::domain::journey::ProgressState;

/// Errors that can occur during progress storage operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to serialize progress: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize progress: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading progress state
#[async_trait]
pub trait ProgressStorage: Send + Sync {
    /// Load the progress for an idea
    ///
    /// # Returns
    /// `None` if nothing has been saved for the idea yet
    async fn load(&self, idea_id: IdeaId) -> Result<Option<ProgressState>, StorageError>;

    /// Save the progress for an idea, replacing any previous value
    async fn save(&self, idea_id: IdeaId, state: &ProgressState) -> Result<(), StorageError>;

    /// Delete the progress for an idea
    ///
    /// # Returns
    /// `true` if something was deleted
    async fn delete(&self, idea_id: IdeaId) -> Result<bool, StorageError>;
}
