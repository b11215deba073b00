//! Mock AI Client for testing.
//!
//! Provides a configurable mock implementation of the AIClient port,
//! allowing tests to run without calling a real AI backend.
//!
//! # Features
//!
//! - Queued stage and answer responses, consumed in call order
//! - Per-response delays for supersession and timeout testing
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockAIClient::new()
//!     .with_stage_titles(&["Research", "Build", "Launch"])
//!     .with_stage_error(AIError::network("connection reset"));
//!
//! let drafts = client.generate_stages("brief", 3).await?;
//! assert_eq!(drafts[0].title, "Research");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::journey::StageDraft;
use crate::ports::{AIClient, AIError};

/// A configured response for one call.
#[derive(Debug, Clone)]
pub struct MockReply<T> {
    pub result: Result<T, AIError>,
    pub delay: Duration,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GenerateStages { idea_brief: String, desired_count: usize },
    AnswerQuestion { question: String, context_summary: String },
}

/// Mock AI client for testing.
#[derive(Debug, Clone, Default)]
pub struct MockAIClient {
    stage_replies: Arc<Mutex<VecDeque<MockReply<Vec<StageDraft>>>>>,
    answer_replies: Arc<Mutex<VecDeque<MockReply<String>>>>,
    /// Latency applied when a reply has none of its own.
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAIClient {
    /// Creates a mock that generates numbered stages and canned answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a stage list.
    pub fn with_stages(self, drafts: Vec<StageDraft>) -> Self {
        self.with_stages_after(drafts, Duration::ZERO)
    }

    /// Queues a stage list built from titles.
    pub fn with_stage_titles(self, titles: &[&str]) -> Self {
        let drafts = titles
            .iter()
            .map(|title| StageDraft::new(*title, format!("{} for your business", title)))
            .collect();
        self.with_stages(drafts)
    }

    /// Queues a stage list delivered after `delay`.
    pub fn with_stages_after(self, drafts: Vec<StageDraft>, delay: Duration) -> Self {
        locked(&self.stage_replies).push_back(MockReply {
            result: Ok(drafts),
            delay,
        });
        self
    }

    /// Queues a stage generation failure.
    pub fn with_stage_error(self, error: AIError) -> Self {
        locked(&self.stage_replies).push_back(MockReply {
            result: Err(error),
            delay: Duration::ZERO,
        });
        self
    }

    /// Queues an answer.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        locked(&self.answer_replies).push_back(MockReply {
            result: Ok(answer.into()),
            delay: Duration::ZERO,
        });
        self
    }

    /// Queues an answer failure.
    pub fn with_answer_error(self, error: AIError) -> Self {
        locked(&self.answer_replies).push_back(MockReply {
            result: Err(error),
            delay: Duration::ZERO,
        });
        self
    }

    /// Sets simulated latency for replies without their own delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this client.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        locked(&self.calls).clone()
    }

    async fn settle<T>(&self, reply: MockReply<T>) -> Result<T, AIError> {
        let delay = if reply.delay.is_zero() {
            self.delay
        } else {
            reply.delay
        };
        if !delay.is_zero() {
            sleep(delay).await;
        }
        reply.result
    }
}

#[async_trait]
impl AIClient for MockAIClient {
    async fn generate_stages(
        &self,
        idea_brief: &str,
        desired_count: usize,
    ) -> Result<Vec<StageDraft>, AIError> {
        locked(&self.calls).push(MockCall::GenerateStages {
            idea_brief: idea_brief.to_string(),
            desired_count,
        });

        let reply = locked(&self.stage_replies)
            .pop_front()
            .unwrap_or_else(|| MockReply {
                result: Ok((0..desired_count)
                    .map(|i| StageDraft::new(format!("Generated stage {}", i + 1), "Mock stage"))
                    .collect()),
                delay: Duration::ZERO,
            });

        self.settle(reply).await
    }

    async fn answer_progress_question(
        &self,
        question: &str,
        context_summary: &str,
    ) -> Result<String, AIError> {
        locked(&self.calls).push(MockCall::AnswerQuestion {
            question: question.to_string(),
            context_summary: context_summary.to_string(),
        });

        let reply = locked(&self.answer_replies)
            .pop_front()
            .unwrap_or_else(|| MockReply {
                result: Ok("Mock answer".to_string()),
                delay: Duration::ZERO,
            });

        self.settle(reply).await
    }
}
