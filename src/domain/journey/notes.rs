//! Notes attached to stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{NoteId, StageId, Timestamp, ValidationError};

/// A free-text note written against a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub content: String,
    pub created_at: Timestamp,
}

/// Per-stage note collections, in insertion order within each stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesStore {
    by_stage: BTreeMap<StageId, Vec<Note>>,
}

impl NotesStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a note to a stage.
    ///
    /// Content is trimmed; blank content is rejected.
    pub fn add(
        &mut self,
        stage_id: &StageId,
        content: &str,
        now: Timestamp,
    ) -> Result<Note, ValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        let note = Note {
            id: NoteId::new(),
            content: content.to_string(),
            created_at: now,
        };
        self.by_stage
            .entry(stage_id.clone())
            .or_default()
            .push(note.clone());
        Ok(note)
    }

    /// Removes a note by id, returning it and its stage if it existed.
    pub fn delete(&mut self, note_id: NoteId) -> Option<(StageId, Note)> {
        let (stage_id, position) = self.by_stage.iter().find_map(|(stage_id, notes)| {
            notes
                .iter()
                .position(|n| n.id == note_id)
                .map(|pos| (stage_id.clone(), pos))
        })?;

        let notes = self.by_stage.get_mut(&stage_id)?;
        let removed = notes.remove(position);
        if notes.is_empty() {
            self.by_stage.remove(&stage_id);
        }
        Some((stage_id, removed))
    }

    /// Returns the notes for a stage (empty if none).
    pub fn for_stage(&self, stage_id: &StageId) -> &[Note] {
        self.by_stage
            .get(stage_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drops notes whose stage is not accepted by `keep`, returning the count dropped.
    pub fn retain_stages(&mut self, mut keep: impl FnMut(&StageId) -> bool) -> usize {
        let mut dropped = 0;
        self.by_stage.retain(|stage_id, notes| {
            let kept = keep(stage_id);
            if !kept {
                dropped += notes.len();
            }
            kept
        });
        dropped
    }

    /// Total number of notes across all stages.
    pub fn len(&self) -> usize {
        self.by_stage.values().map(Vec::len).sum()
    }

    /// Returns true if there are no notes.
    pub fn is_empty(&self) -> bool {
        self.by_stage.is_empty()
    }
}
