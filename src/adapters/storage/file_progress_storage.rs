//! File-based Progress Storage Adapter
//!
//! Stores each journey's progress as a YAML file named after the idea id.
//! Writes go to a temporary file first and are then renamed into place, so a
//! reader never sees a half-written state.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::StorageConfig;
use crate::domain::foundation::IdeaId;
use crate::domain::journey::ProgressState;
use crate::ports::{ProgressStorage, StorageError};

/// File-based storage for journey progress
#[derive(Debug, Clone)]
pub struct FileProgressStorage {
    base_path: PathBuf,
}

impl FileProgressStorage {
    /// Create a new file storage with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileProgressStorage::new("./data/journeys");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Storage rooted at the configured `storage.data_dir`.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir)
    }

    /// Get the progress file path for an idea
    fn progress_file_path(&self, idea_id: IdeaId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", idea_id))
    }

    fn temp_file_path(&self, idea_id: IdeaId) -> PathBuf {
        self.base_path.join(format!(".{}.yaml.tmp", idea_id))
    }

    /// Ensure directory exists
    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }
}

#[async_trait]
impl ProgressStorage for FileProgressStorage {
    async fn load(&self, idea_id: IdeaId) -> Result<Option<ProgressState>, StorageError> {
        let file_path = self.progress_file_path(idea_id);

        let yaml = match fs::read_to_string(&file_path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e.to_string())),
        };

        let state = serde_yaml::from_str(&yaml)
            .map_err(|e| StorageError::DeserializationFailed(e.to_string()))?;

        Ok(Some(state))
    }

    async fn save(&self, idea_id: IdeaId, state: &ProgressState) -> Result<(), StorageError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(state)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        let temp_path = self.temp_file_path(idea_id);
        fs::write(&temp_path, yaml)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        fs::rename(&temp_path, self.progress_file_path(idea_id))
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(%idea_id, revision = state.revision(), "Progress written to disk");
        Ok(())
    }

    async fn delete(&self, idea_id: IdeaId) -> Result<bool, StorageError> {
        match fs::remove_file(self.progress_file_path(idea_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }
}
