//! AI Client Port - Interface for the generative-AI backend.
//!
//! The engine consumes two opaque capabilities: generating a stage list for
//! an idea and answering a free-form progress question. Prompt wording and
//! transport live entirely in the adapter.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct CannedClient;
//!
//! #[async_trait]
//! impl AIClient for CannedClient {
//!     async fn generate_stages(&self, brief: &str, count: usize) -> Result<Vec<StageDraft>, AIError> {
//!         Ok((0..count).map(|i| StageDraft::new(format!("Step {}", i), brief)).collect())
//!     }
//!
//!     async fn answer_progress_question(&self, question: &str, context: &str) -> Result<String, AIError> {
//!         Ok(format!("{} / {}", question, context))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::journey::StageDraft;

/// Port for generative-AI calls.
#[async_trait]
pub trait AIClient: Send + Sync {
    /// Generates `desired_count` stage drafts for an idea brief.
    ///
    /// # Errors
    /// Transport-level failures and unparseable responses.
    async fn generate_stages(
        &self,
        idea_brief: &str,
        desired_count: usize,
    ) -> Result<Vec<StageDraft>, AIError>;

    /// Answers a question about the user's progress.
    ///
    /// # Arguments
    /// * `question` - The user's question, already trimmed
    /// * `context_summary` - Plain-text summary of the journey
    async fn answer_progress_question(
        &self,
        question: &str,
        context_summary: &str,
    ) -> Result<String, AIError>;
}

/// AI client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Returns true if the response arrived but could not be understood.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, AIError::Parse(_))
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_malformed_not_retryable() {
        let err = AIError::parse("expected array");
        assert!(err.is_malformed_response());
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_errors_are_retryable() {
        assert!(AIError::network("reset").is_retryable());
        assert!(AIError::timeout(30).is_retryable());
        assert!(AIError::unavailable("offline").is_retryable());
        assert!(AIError::rate_limited(5).is_retryable());
    }

    #[test]
    fn timeout_displays_seconds() {
        assert_eq!(AIError::timeout(12).to_string(), "request timed out after 12s");
    }
}
