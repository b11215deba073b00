//! Turns AI-produced stage drafts into a well-formed catalog.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::foundation::StageId;
use crate::domain::journey::{Stage, StageDraft, StageKind};

/// Why AI generation did not yield a usable catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The call failed, timed out or the client is unavailable.
    #[error("Generation transport failed: {0}")]
    Transport(String),

    /// The call returned something that is not a valid stage list.
    #[error("Generation returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    pub fn transport(reason: impl Into<String>) -> Self {
        GenerationError::Transport(reason.into())
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        GenerationError::MalformedResponse(reason.into())
    }
}

/// Validates drafts returned by the AI client.
pub struct DraftValidator;

impl DraftValidator {
    /// Converts exactly `expected` drafts into stages ordered `0..expected`.
    ///
    /// Drafts are ranked by their explicit order, or by position when none
    /// is given, and then renumbered. Generated stages get fresh ids.
    pub fn into_stages(drafts: Vec<StageDraft>, expected: usize) -> Result<Vec<Stage>, GenerationError> {
        if drafts.len() != expected {
            return Err(GenerationError::malformed(format!(
                "expected {} stages, got {}",
                expected,
                drafts.len()
            )));
        }

        let mut ranked: BTreeMap<usize, StageDraft> = BTreeMap::new();
        for (position, draft) in drafts.into_iter().enumerate() {
            if draft.title.trim().is_empty() {
                return Err(GenerationError::malformed(format!(
                    "stage at position {} has no title",
                    position
                )));
            }

            let rank = draft.order.unwrap_or(position);
            if rank >= expected {
                return Err(GenerationError::malformed(format!(
                    "stage order {} is outside 0..{}",
                    rank, expected
                )));
            }
            if ranked.insert(rank, draft).is_some() {
                return Err(GenerationError::malformed(format!("duplicate stage order {}", rank)));
            }
        }

        Ok(ranked
            .into_values()
            .enumerate()
            .map(|(order, draft)| Stage {
                id: StageId::generated(),
                title: draft.title.trim().to_string(),
                description: draft.description.trim().to_string(),
                kind: draft
                    .kind
                    .as_deref()
                    .map(StageKind::from_label)
                    .unwrap_or_default(),
                order,
            })
            .collect())
    }
}
