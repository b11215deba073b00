//! Engine error type.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::{AIError, StorageError};

/// Errors returned by [`JourneyEngine`](super::JourneyEngine) operations.
///
/// Generation, persistence-write and calendar failures never appear here;
/// they are recovered inside the engine and reported through outcomes.
#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AIError),

    #[error("No journey is active")]
    NoActiveJourney,
}

impl JourneyError {
    /// Maps the error onto the shared error code vocabulary.
    pub fn code(&self) -> ErrorCode {
        match self {
            JourneyError::Validation(_) => ErrorCode::ValidationFailed,
            JourneyError::Domain(err) => err.code,
            JourneyError::Storage(_) => ErrorCode::StorageError,
            JourneyError::Assistant(_) => ErrorCode::AIProviderError,
            JourneyError::NoActiveJourney => ErrorCode::NoActiveJourney,
        }
    }
}
