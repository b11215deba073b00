//! JourneyView - the read model views render.

use serde::Serialize;

use crate::domain::foundation::{IdeaId, Percentage, StageStatus};

use super::{BoatPosition, IslandLayout, Note, ProgressState, Reminder, Stage};

/// One stage together with its derived status and attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub stage: Stage,
    pub status: StageStatus,
    pub notes: Vec<Note>,
    pub reminders: Vec<Reminder>,
}

/// Snapshot of a journey, recomputed after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyView {
    pub idea_id: IdeaId,
    pub revision: u64,
    pub stages: Vec<StageView>,
    pub current_index: usize,
    pub completion: Percentage,
    pub boat_position: Option<BoatPosition>,
    pub unscoped_reminders: Vec<Reminder>,
    pub is_finished: bool,
    pub is_regenerating: bool,
}

impl JourneyView {
    /// Projects a progress state onto the read model.
    pub fn project(state: &ProgressState, layout: &IslandLayout, is_regenerating: bool) -> Self {
        let stages = state
            .stages()
            .iter()
            .enumerate()
            .map(|(index, stage)| StageView {
                stage: stage.clone(),
                status: state.status_at(index),
                notes: state.notes().for_stage(&stage.id).to_vec(),
                reminders: state
                    .reminders()
                    .for_scope(Some(&stage.id))
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            idea_id: state.idea_id(),
            revision: state.revision(),
            stages,
            current_index: state.current_index(),
            completion: state.completion(),
            boat_position: layout.boat_position(state.current_index(), state.stages().len()),
            unscoped_reminders: state
                .reminders()
                .for_scope(None)
                .into_iter()
                .cloned()
                .collect(),
            is_finished: state.is_finished(),
            is_regenerating,
        }
    }

    /// The stage the user is on, if the journey is not finished.
    pub fn current_stage(&self) -> Option<&StageView> {
        self.stages.get(self.current_index)
    }

    /// Plain-text summary handed to the assistant as question context.
    pub fn context_summary(&self) -> String {
        let mut summary = format!(
            "Journey progress: {}% ({} of {} stages complete).",
            self.completion.value(),
            self.current_index.min(self.stages.len()),
            self.stages.len()
        );
        match self.current_stage() {
            Some(current) => {
                summary.push_str(&format!(
                    " Current stage: {} - {}.",
                    current.stage.title, current.stage.description
                ));
                let open = current.reminders.iter().filter(|r| !r.is_completed).count();
                if open > 0 {
                    summary.push_str(&format!(" Open reminders on this stage: {}.", open));
                }
                if let Some(note) = current.notes.last() {
                    summary.push_str(&format!(" Latest note: {}", note.content));
                }
            }
            None if self.is_finished && !self.stages.is_empty() => {
                summary.push_str(" Every stage is complete.");
            }
            None => {}
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{StageId, Timestamp};
    use crate::domain::journey::{ReminderDraft, StageKind};

    fn state(n: usize) -> ProgressState {
        let stages = (0..n)
            .map(|i| Stage {
                id: StageId::new(format!("s{}", i)).unwrap(),
                title: format!("Stage {}", i),
                description: format!("Do thing {}", i),
                kind: StageKind::Planning,
                order: i,
            })
            .collect();
        ProgressState::start(IdeaId::new(), stages)
    }

    #[test]
    fn project_derives_statuses_from_index() {
        let mut state = state(3);
        state.advance().unwrap();
        let view = JourneyView::project(&state, &IslandLayout::default(), false);

        let statuses: Vec<_> = view.stages.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![StageStatus::Completed, StageStatus::Current, StageStatus::Locked]
        );
        assert_eq!(view.completion.value(), 33);
        assert_eq!(view.revision, 1);
        assert!(!view.is_finished);
    }

    #[test]
    fn project_splits_scoped_and_unscoped_reminders() {
        let mut state = state(2);
        let s1 = StageId::new("s1").unwrap();
        state.add_note(&s1, "ask around").unwrap();
        state
            .insert_reminder(
                ReminderDraft::new("scoped", Timestamp::now())
                    .for_stage(s1)
                    .into_reminder()
                    .unwrap(),
            )
            .unwrap();
        state
            .insert_reminder(ReminderDraft::new("free", Timestamp::now()).into_reminder().unwrap())
            .unwrap();

        let view = JourneyView::project(&state, &IslandLayout::default(), true);
        assert_eq!(view.stages[1].notes.len(), 1);
        assert_eq!(view.stages[1].reminders.len(), 1);
        assert_eq!(view.unscoped_reminders.len(), 1);
        assert!(view.is_regenerating);
    }

    #[test]
    fn context_summary_mentions_current_stage() {
        let view = JourneyView::project(&state(4), &IslandLayout::default(), false);
        let summary = view.context_summary();
        assert!(summary.contains("0% (0 of 4 stages complete)"));
        assert!(summary.contains("Current stage: Stage 0 - Do thing 0."));
    }

    #[test]
    fn context_summary_for_finished_journey() {
        let mut state = state(3);
        for _ in 0..3 {
            state.advance().unwrap();
        }
        let view = JourneyView::project(&state, &IslandLayout::default(), false);
        assert!(view.context_summary().contains("Every stage is complete."));
        assert!(view.current_stage().is_none());
        assert!(view.boat_position.is_some());
    }
}
