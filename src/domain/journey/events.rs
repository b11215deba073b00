//! Journey domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IdeaId, NoteId, ReminderId, StageId, Timestamp};

/// Events that can occur during a journey's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JourneyEvent {
    /// A new journey was started for an idea.
    JourneyStarted {
        idea_id: IdeaId,
        stage_count: usize,
        started_at: Timestamp,
    },

    /// The current stage was completed.
    StageCompleted {
        idea_id: IdeaId,
        stage_id: StageId,
        current_index: usize,
    },

    /// An external signal moved the journey forward.
    ProgressReconciled {
        idea_id: IdeaId,
        from_index: usize,
        to_index: usize,
    },

    /// The stage catalog was replaced and progress reset.
    CatalogRegenerated {
        idea_id: IdeaId,
        stage_count: usize,
        dropped_notes: usize,
        dropped_reminders: usize,
    },

    /// A note was attached to a stage.
    NoteAdded {
        idea_id: IdeaId,
        stage_id: StageId,
        note_id: NoteId,
    },

    /// A note was removed.
    NoteDeleted { idea_id: IdeaId, note_id: NoteId },

    /// A reminder was created.
    ReminderAdded {
        idea_id: IdeaId,
        reminder_id: ReminderId,
        synced_to_calendar: bool,
    },

    /// A reminder was ticked off.
    ReminderCompleted {
        idea_id: IdeaId,
        reminder_id: ReminderId,
    },

    /// A reminder was removed.
    ReminderDeleted {
        idea_id: IdeaId,
        reminder_id: ReminderId,
    },
}

impl JourneyEvent {
    /// Dotted event name used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            JourneyEvent::JourneyStarted { .. } => "journey.started",
            JourneyEvent::StageCompleted { .. } => "journey.stage_completed",
            JourneyEvent::ProgressReconciled { .. } => "journey.progress_reconciled",
            JourneyEvent::CatalogRegenerated { .. } => "journey.catalog_regenerated",
            JourneyEvent::NoteAdded { .. } => "journey.note_added",
            JourneyEvent::NoteDeleted { .. } => "journey.note_deleted",
            JourneyEvent::ReminderAdded { .. } => "journey.reminder_added",
            JourneyEvent::ReminderCompleted { .. } => "journey.reminder_completed",
            JourneyEvent::ReminderDeleted { .. } => "journey.reminder_deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = JourneyEvent::NoteDeleted {
            idea_id: IdeaId::new(),
            note_id: NoteId::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "note_deleted");
        assert_eq!(event.event_type(), "journey.note_deleted");
    }
}
