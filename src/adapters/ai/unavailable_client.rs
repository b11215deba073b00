//! AI client used when AI assistance is switched off.

use async_trait::async_trait;

use crate::domain::journey::StageDraft;
use crate::ports::{AIClient, AIError};

/// Fails every call with [`AIError::Unavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableAIClient {
    reason: String,
}

impl UnavailableAIClient {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableAIClient {
    fn default() -> Self {
        Self::new("AI assistance is disabled")
    }
}

#[async_trait]
impl AIClient for UnavailableAIClient {
    async fn generate_stages(&self, _: &str, _: usize) -> Result<Vec<StageDraft>, AIError> {
        Err(AIError::unavailable(self.reason.clone()))
    }

    async fn answer_progress_question(&self, _: &str, _: &str) -> Result<String, AIError> {
        Err(AIError::unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_unavailable() {
        let client = UnavailableAIClient::default();
        assert!(matches!(
            client.generate_stages("x", 3).await,
            Err(AIError::Unavailable { .. })
        ));
        assert!(client.answer_progress_question("q", "c").await.is_err());
    }
}
