//! ProgressState aggregate - the persisted position of a user in a journey.
//!
//! Owns the stage catalog, the current index, the completion set and the
//! per-stage notes and reminders. All mutations go through methods that keep
//! these invariants:
//!
//! - `0 <= current_index <= stages.len()`
//! - `completed_ids` is exactly the ids of `stages[..current_index]`
//! - `current_index` only moves forward, except when the catalog is regenerated
//! - notes and scoped reminders only reference stages of the current catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{
    DomainError, ErrorCode, IdeaId, NoteId, Percentage, ReminderId, StageId, StageStatus,
    StateMachine, Timestamp,
};

use super::{JourneyEvent, Note, NotesStore, Reminder, ReminderStore, Stage};

/// Progress reported by a system other than the timeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressSignal {
    /// `count` more stages are done.
    StagesCompleted { count: usize },
    /// The user is at least at stage `index`.
    StageReached { index: usize },
    /// Dashboard goals: `completed` of `total` done, scaled onto the stage list.
    GoalsCompleted { completed: usize, total: usize },
}

impl ProgressSignal {
    /// Maps the signal to a target index, never below `current` and never past `stage_count`.
    pub fn target_index(&self, current: usize, stage_count: usize) -> usize {
        let target = match *self {
            ProgressSignal::StagesCompleted { count } => current.saturating_add(count),
            ProgressSignal::StageReached { index } => index,
            ProgressSignal::GoalsCompleted { completed, total } => {
                if total == 0 {
                    0
                } else {
                    completed.min(total) * stage_count / total
                }
            }
        };
        target.min(stage_count).max(current)
    }
}

/// What a catalog replacement threw away.
#[derive(Debug, Clone, Default)]
pub struct RegenerationFallout {
    pub dropped_notes: usize,
    pub dropped_reminders: Vec<Reminder>,
}

/// The ProgressState aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    idea_id: IdeaId,
    revision: u64,
    updated_at: Timestamp,
    stages: Vec<Stage>,
    current_index: usize,
    completed_ids: BTreeSet<StageId>,
    #[serde(default)]
    notes: NotesStore,
    #[serde(default)]
    reminders: ReminderStore,
    #[serde(skip)]
    domain_events: Vec<JourneyEvent>,
}

impl ProgressState {
    /// Starts a journey at the first stage of `stages`.
    pub fn start(idea_id: IdeaId, stages: Vec<Stage>) -> Self {
        let now = Timestamp::now();
        let mut state = Self {
            idea_id,
            revision: 0,
            updated_at: now,
            stages,
            current_index: 0,
            completed_ids: BTreeSet::new(),
            notes: NotesStore::new(),
            reminders: ReminderStore::new(),
            domain_events: Vec::new(),
        };

        state.record_event(JourneyEvent::JourneyStarted {
            idea_id,
            stage_count: state.stages.len(),
            started_at: now,
        });

        state
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    /// Returns the idea this journey belongs to.
    pub fn idea_id(&self) -> IdeaId {
        self.idea_id
    }

    /// Monotonic counter bumped on every applied mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns when the state last changed.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the stage catalog in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns the index of the current stage (`stages().len()` once finished).
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the ids of completed stages.
    pub fn completed_ids(&self) -> &BTreeSet<StageId> {
        &self.completed_ids
    }

    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    pub fn reminders(&self) -> &ReminderStore {
        &self.reminders
    }

    /// Returns the stage the user is working on, if any.
    pub fn current_stage(&self) -> Option<&Stage> {
        self.stages.get(self.current_index)
    }

    /// Looks a stage up by id.
    pub fn stage(&self, stage_id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| &s.id == stage_id)
    }

    /// Returns the position of a stage in the catalog.
    pub fn stage_index(&self, stage_id: &StageId) -> Option<usize> {
        self.stages.iter().position(|s| &s.id == stage_id)
    }

    /// Returns the status of the stage at `index`.
    pub fn status_at(&self, index: usize) -> StageStatus {
        StageStatus::at(index, self.current_index)
    }

    /// Returns true once every stage is completed.
    pub fn is_finished(&self) -> bool {
        self.current_index >= self.stages.len()
    }

    /// Completed stages over total stages (zero for an empty catalog).
    pub fn completion(&self) -> Percentage {
        Percentage::from_ratio(self.completed_ids.len(), self.stages.len())
    }

    /// Takes accumulated domain events, clearing the internal buffer.
    pub fn take_events(&mut self) -> Vec<JourneyEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ───────────────────────────────────────────────────────────────
    // Stage transitions
    // ───────────────────────────────────────────────────────────────

    /// Completes the current stage and moves to the next one.
    ///
    /// Returns the id of the stage that was completed, or `JourneyComplete`
    /// when there is no current stage left.
    pub fn advance(&mut self) -> Result<StageId, DomainError> {
        let index = self.current_index;
        let stage_id = match self.stages.get(index) {
            Some(stage) => stage.id.clone(),
            None => {
                return Err(DomainError::new(
                    ErrorCode::JourneyComplete,
                    "Every stage of this journey is already complete",
                ))
            }
        };

        self.status_at(index)
            .transition_to(StageStatus::Completed)
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        self.completed_ids.insert(stage_id.clone());
        self.current_index = index + 1;
        self.touch();

        self.record_event(JourneyEvent::StageCompleted {
            idea_id: self.idea_id,
            stage_id: stage_id.clone(),
            current_index: self.current_index,
        });

        Ok(stage_id)
    }

    /// Completes a specific stage, which must be the current one.
    pub fn complete_stage(&mut self, stage_id: &StageId) -> Result<(), DomainError> {
        let index = self.stage_index(stage_id).ok_or_else(|| {
            DomainError::new(ErrorCode::StageNotFound, "Stage not found")
                .with_detail("stage_id", stage_id.as_str())
        })?;

        match self.status_at(index) {
            StageStatus::Completed => Err(DomainError::new(
                ErrorCode::StageAlreadyCompleted,
                format!("Stage '{}' is already completed", stage_id),
            )),
            StageStatus::Locked => Err(DomainError::new(
                ErrorCode::StageLocked,
                format!(
                    "Stage '{}' is locked until stage {} is completed",
                    stage_id, self.current_index
                ),
            )),
            StageStatus::Current => self.advance().map(|_| ()),
        }
    }

    /// Applies an external progress signal.
    ///
    /// The index only ever moves forward; every stage passed on the way is
    /// added to the completion set. Returns how many stages were newly passed.
    pub fn reconcile(&mut self, signal: ProgressSignal) -> usize {
        let from = self.current_index;
        let target = signal.target_index(from, self.stages.len());
        if target <= from {
            return 0;
        }

        for stage in &self.stages[from..target] {
            self.completed_ids.insert(stage.id.clone());
        }
        self.current_index = target;
        self.touch();

        self.record_event(JourneyEvent::ProgressReconciled {
            idea_id: self.idea_id,
            from_index: from,
            to_index: target,
        });

        target - from
    }

    /// Replaces the stage catalog and resets progress.
    ///
    /// Notes and stage-scoped reminders belong to the old catalog and are
    /// dropped; unscoped reminders survive.
    pub fn regenerate(&mut self, stages: Vec<Stage>) -> RegenerationFallout {
        let dropped_notes = self.notes.retain_stages(|_| false);
        let dropped_reminders = self.reminders.drain_scoped();

        self.stages = stages;
        self.current_index = 0;
        self.completed_ids.clear();
        self.touch();

        self.record_event(JourneyEvent::CatalogRegenerated {
            idea_id: self.idea_id,
            stage_count: self.stages.len(),
            dropped_notes,
            dropped_reminders: dropped_reminders.len(),
        });

        RegenerationFallout {
            dropped_notes,
            dropped_reminders,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Notes & reminders
    // ───────────────────────────────────────────────────────────────

    /// Attaches a note to an existing stage.
    pub fn add_note(&mut self, stage_id: &StageId, content: &str) -> Result<Note, DomainError> {
        self.require_stage(stage_id)?;
        let note = self.notes.add(stage_id, content, Timestamp::now())?;
        self.touch();

        self.record_event(JourneyEvent::NoteAdded {
            idea_id: self.idea_id,
            stage_id: stage_id.clone(),
            note_id: note.id,
        });

        Ok(note)
    }

    /// Removes a note; `None` if it did not exist.
    pub fn delete_note(&mut self, note_id: NoteId) -> Option<Note> {
        let (_, note) = self.notes.delete(note_id)?;
        self.touch();
        self.record_event(JourneyEvent::NoteDeleted {
            idea_id: self.idea_id,
            note_id,
        });
        Some(note)
    }

    /// Stores a validated reminder. A stage scope must name an existing stage.
    pub fn insert_reminder(&mut self, reminder: Reminder) -> Result<(), DomainError> {
        if let Some(stage_id) = &reminder.stage_id {
            self.require_stage(stage_id)?;
        }

        let event = JourneyEvent::ReminderAdded {
            idea_id: self.idea_id,
            reminder_id: reminder.id,
            synced_to_calendar: reminder.calendar_event_ref.is_some(),
        };
        self.reminders.insert(reminder);
        self.touch();
        self.record_event(event);
        Ok(())
    }

    /// Marks a reminder completed.
    pub fn complete_reminder(&mut self, reminder_id: ReminderId) -> Result<Reminder, DomainError> {
        let reminder = self
            .reminders
            .complete(reminder_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ReminderNotFound, "Reminder not found")
                    .with_detail("reminder_id", reminder_id.to_string())
            })?;
        self.touch();
        self.record_event(JourneyEvent::ReminderCompleted {
            idea_id: self.idea_id,
            reminder_id,
        });
        Ok(reminder)
    }

    /// Removes a reminder; `None` if it did not exist.
    pub fn delete_reminder(&mut self, reminder_id: ReminderId) -> Option<Reminder> {
        let reminder = self.reminders.delete(reminder_id)?;
        self.touch();
        self.record_event(JourneyEvent::ReminderDeleted {
            idea_id: self.idea_id,
            reminder_id,
        });
        Some(reminder)
    }

    // ───────────────────────────────────────────────────────────────
    // Integrity
    // ───────────────────────────────────────────────────────────────

    /// Lists every broken invariant (empty when the state is consistent).
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            if stage.order != i {
                violations.push(format!("stage '{}' has order {} at position {}", stage.id, stage.order, i));
            }
        }

        let unique: BTreeSet<&StageId> = self.stages.iter().map(|s| &s.id).collect();
        if unique.len() != self.stages.len() {
            violations.push("duplicate stage ids".to_string());
        }

        if self.current_index > self.stages.len() {
            violations.push(format!(
                "current index {} exceeds stage count {}",
                self.current_index,
                self.stages.len()
            ));
        }

        let expected: BTreeSet<StageId> = self
            .stages
            .iter()
            .take(self.current_index)
            .map(|s| s.id.clone())
            .collect();
        if expected != self.completed_ids {
            violations.push("completed ids do not match the stages before the current index".to_string());
        }

        violations
    }

    /// Repairs a state read back from storage.
    ///
    /// Stages are re-ranked by position, the index is clamped, the
    /// completion set is rebuilt from the index and records pointing at
    /// unknown stages are dropped. Any repair bumps the revision. Returns a
    /// description of each repair.
    pub fn repair(&mut self) -> Vec<String> {
        let mut repairs = self.invariant_violations();

        let mut seen = BTreeSet::new();
        self.stages.retain(|s| seen.insert(s.id.clone()));
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.order = i;
        }

        self.current_index = self.current_index.min(self.stages.len());
        self.completed_ids = self
            .stages
            .iter()
            .take(self.current_index)
            .map(|s| s.id.clone())
            .collect();

        let known: BTreeSet<StageId> = self.stages.iter().map(|s| s.id.clone()).collect();
        let dropped_notes = self.notes.retain_stages(|id| known.contains(id));
        if dropped_notes > 0 {
            repairs.push(format!("dropped {} orphaned notes", dropped_notes));
        }
        let orphans = self.reminders.drain_orphans(|id| known.contains(id));
        if !orphans.is_empty() {
            repairs.push(format!("dropped {} orphaned reminders", orphans.len()));
        }

        if !repairs.is_empty() {
            self.touch();
        }
        repairs
    }

    fn require_stage(&self, stage_id: &StageId) -> Result<(), DomainError> {
        if self.stage(stage_id).is_none() {
            return Err(DomainError::new(ErrorCode::StageNotFound, "Stage not found")
                .with_detail("stage_id", stage_id.as_str()));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Timestamp::now();
    }

    fn record_event(&mut self, event: JourneyEvent) {
        self.domain_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::journey::{ReminderDraft, StageKind};
    use proptest::prelude::*;

    fn stages(n: usize) -> Vec<Stage> {
        (0..n)
            .map(|i| Stage {
                id: StageId::new(format!("s{}", i)).unwrap(),
                title: format!("Stage {}", i),
                description: String::new(),
                kind: StageKind::Milestone,
                order: i,
            })
            .collect()
    }

    fn journey(n: usize) -> ProgressState {
        let mut state = ProgressState::start(IdeaId::new(), stages(n));
        state.take_events();
        state
    }

    fn sid(id: &str) -> StageId {
        StageId::new(id).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // start / advance
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn start_is_at_first_stage_with_nothing_completed() {
        let mut state = ProgressState::start(IdeaId::new(), stages(4));
        assert_eq!(state.current_index(), 0);
        assert!(state.completed_ids().is_empty());
        assert_eq!(state.revision(), 0);
        assert!(state.invariant_violations().is_empty());
        assert!(matches!(
            state.take_events()[..],
            [JourneyEvent::JourneyStarted { stage_count: 4, .. }]
        ));
    }

    #[test]
    fn advance_completes_current_stage() {
        let mut state = journey(3);
        let completed = state.advance().unwrap();

        assert_eq!(completed, sid("s0"));
        assert_eq!(state.current_index(), 1);
        assert!(state.completed_ids().contains(&sid("s0")));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn advance_past_the_end_is_rejected_without_change() {
        let mut state = journey(2);
        state.advance().unwrap();
        state.advance().unwrap();
        let revision = state.revision();

        let err = state.advance().unwrap_err();
        assert_eq!(err.code, ErrorCode::JourneyComplete);
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.revision(), revision);
        assert!(state.is_finished());
    }

    #[test]
    fn three_of_five_reads_sixty_percent() {
        let mut state = journey(5);
        for _ in 0..3 {
            state.advance().unwrap();
        }
        assert_eq!(state.completion().value(), 60);
        assert_eq!(state.current_index(), 3);
    }

    #[test]
    fn empty_catalog_reads_zero_percent_and_is_finished() {
        let state = journey(0);
        assert_eq!(state.completion(), Percentage::ZERO);
        assert!(state.is_finished());
        assert!(state.current_stage().is_none());
    }

    // ───────────────────────────────────────────────────────────────
    // complete_stage
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn complete_stage_accepts_current() {
        let mut state = journey(3);
        state.complete_stage(&sid("s0")).unwrap();
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn complete_stage_rejects_locked() {
        let mut state = journey(3);
        let err = state.complete_stage(&sid("s2")).unwrap_err();
        assert_eq!(err.code, ErrorCode::StageLocked);
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn complete_stage_rejects_already_completed() {
        let mut state = journey(3);
        state.advance().unwrap();
        let err = state.complete_stage(&sid("s0")).unwrap_err();
        assert_eq!(err.code, ErrorCode::StageAlreadyCompleted);
    }

    #[test]
    fn complete_stage_rejects_unknown() {
        let mut state = journey(3);
        let err = state.complete_stage(&sid("nope")).unwrap_err();
        assert_eq!(err.code, ErrorCode::StageNotFound);
    }

    // ───────────────────────────────────────────────────────────────
    // reconcile
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn reconcile_jump_backfills_completion() {
        let mut state = journey(5);
        let passed = state.reconcile(ProgressSignal::StageReached { index: 3 });

        assert_eq!(passed, 3);
        assert_eq!(state.current_index(), 3);
        for id in ["s0", "s1", "s2"] {
            assert!(state.completed_ids().contains(&sid(id)));
        }
        assert!(state.invariant_violations().is_empty());
    }

    #[test]
    fn reconcile_never_moves_backwards() {
        let mut state = journey(5);
        state.reconcile(ProgressSignal::StageReached { index: 4 });
        let revision = state.revision();

        assert_eq!(state.reconcile(ProgressSignal::StageReached { index: 1 }), 0);
        assert_eq!(state.current_index(), 4);
        assert_eq!(state.revision(), revision);
    }

    #[test]
    fn reconcile_saturates_at_stage_count() {
        let mut state = journey(4);
        state.reconcile(ProgressSignal::StagesCompleted { count: usize::MAX });
        assert_eq!(state.current_index(), 4);
        assert_eq!(state.completion(), Percentage::HUNDRED);
    }

    #[test]
    fn goals_signal_scales_onto_stages() {
        let mut state = journey(6);
        state.reconcile(ProgressSignal::GoalsCompleted { completed: 1, total: 2 });
        assert_eq!(state.current_index(), 3);

        // 2 of 3 goals on 6 stages -> stage 4
        state.reconcile(ProgressSignal::GoalsCompleted { completed: 2, total: 3 });
        assert_eq!(state.current_index(), 4);
    }

    #[test]
    fn goals_signal_with_zero_total_is_ignored() {
        let mut state = journey(3);
        assert_eq!(
            state.reconcile(ProgressSignal::GoalsCompleted { completed: 5, total: 0 }),
            0
        );
    }

    #[test]
    fn advance_and_reconcile_take_the_max() {
        let mut state = journey(5);
        state.advance().unwrap();
        state.reconcile(ProgressSignal::StageReached { index: 1 });
        assert_eq!(state.current_index(), 1);
        state.advance().unwrap();
        assert_eq!(state.current_index(), 2);
    }

    // ───────────────────────────────────────────────────────────────
    // regenerate
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn regenerate_resets_progress_and_drops_stage_records() {
        let mut state = journey(3);
        state.advance().unwrap();
        state.add_note(&sid("s0"), "kept?").unwrap();
        state
            .insert_reminder(
                ReminderDraft::new("scoped", Timestamp::now())
                    .for_stage(sid("s1"))
                    .into_reminder()
                    .unwrap(),
            )
            .unwrap();
        state
            .insert_reminder(ReminderDraft::new("free", Timestamp::now()).into_reminder().unwrap())
            .unwrap();

        let mut fresh = stages(4);
        for s in &mut fresh {
            s.id = StageId::new(format!("new-{}", s.order)).unwrap();
        }
        let fallout = state.regenerate(fresh);

        assert_eq!(fallout.dropped_notes, 1);
        assert_eq!(fallout.dropped_reminders.len(), 1);
        assert_eq!(state.stages().len(), 4);
        assert_eq!(state.current_index(), 0);
        assert!(state.completed_ids().is_empty());
        assert!(state.notes().is_empty());
        assert_eq!(state.reminders().len(), 1);
        assert!(state.invariant_violations().is_empty());
    }

    // ───────────────────────────────────────────────────────────────
    // notes / reminders
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn notes_may_be_added_to_locked_stages() {
        let mut state = journey(3);
        let note = state.add_note(&sid("s2"), "thinking ahead").unwrap();
        assert_eq!(state.notes().for_stage(&sid("s2"))[0].id, note.id);
    }

    #[test]
    fn add_note_rejects_unknown_stage_and_blank_content() {
        let mut state = journey(2);
        assert_eq!(
            state.add_note(&sid("zzz"), "hi").unwrap_err().code,
            ErrorCode::StageNotFound
        );
        assert_eq!(
            state.add_note(&sid("s0"), "   ").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn delete_note_is_noop_when_absent() {
        let mut state = journey(2);
        assert!(state.delete_note(NoteId::new()).is_none());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn insert_reminder_rejects_unknown_stage() {
        let mut state = journey(2);
        let reminder = ReminderDraft::new("x", Timestamp::now())
            .for_stage(sid("ghost"))
            .into_reminder()
            .unwrap();
        assert_eq!(
            state.insert_reminder(reminder).unwrap_err().code,
            ErrorCode::StageNotFound
        );
    }

    #[test]
    fn reminders_are_independent_of_stage_completion() {
        let mut state = journey(2);
        let reminder = ReminderDraft::new("follow up", Timestamp::now())
            .for_stage(sid("s0"))
            .into_reminder()
            .unwrap();
        let id = reminder.id;
        state.insert_reminder(reminder).unwrap();

        state.advance().unwrap();
        assert!(!state.reminders().get(id).unwrap().is_completed);

        state.complete_reminder(id).unwrap();
        assert!(state.reminders().get(id).unwrap().is_completed);
        assert_eq!(
            state.complete_reminder(ReminderId::new()).unwrap_err().code,
            ErrorCode::ReminderNotFound
        );
    }

    // ───────────────────────────────────────────────────────────────
    // repair / serialization
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn repair_fixes_corrupted_state() {
        let mut state = journey(3);
        state.add_note(&sid("s1"), "note").unwrap();
        let mut json = serde_json::to_value(&state).unwrap();
        json["current_index"] = serde_json::json!(9);
        json["completed_ids"] = serde_json::json!(["s0", "ghost"]);
        json["stages"][2]["order"] = serde_json::json!(7);

        let mut loaded: ProgressState = serde_json::from_value(json).unwrap();
        assert!(!loaded.invariant_violations().is_empty());
        let revision = loaded.revision();

        let repairs = loaded.repair();
        assert!(!repairs.is_empty());
        assert_eq!(loaded.revision(), revision + 1);
        assert!(loaded.invariant_violations().is_empty());
        assert_eq!(loaded.current_index(), 3);
        assert_eq!(loaded.notes().len(), 1);
    }

    #[test]
    fn repair_on_consistent_state_reports_nothing() {
        let mut state = journey(3);
        state.advance().unwrap();
        assert!(state.repair().is_empty());
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn serialization_skips_pending_events() {
        let mut state = ProgressState::start(IdeaId::new(), stages(2));
        state.advance().unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let mut back: ProgressState = serde_json::from_str(&json).unwrap();
        assert!(back.take_events().is_empty());
        state.take_events();
        assert_eq!(back, state);
    }

    proptest! {
        #[test]
        fn fresh_state_is_well_formed(n in 3usize..=10) {
            let state = journey(n);
            prop_assert_eq!(state.current_index(), 0);
            prop_assert!(state.completed_ids().is_empty());
            prop_assert_eq!(state.stages().len(), n);
            for (i, stage) in state.stages().iter().enumerate() {
                prop_assert_eq!(stage.order, i);
            }
        }

        #[test]
        fn reconcile_is_monotonic_and_backfills(
            n in 3usize..=10,
            signals in prop::collection::vec((0u8..3, 0usize..12, 0usize..12), 0..20)
        ) {
            let mut state = journey(n);
            for (kind, a, b) in signals {
                let before = state.current_index();
                let signal = match kind {
                    0 => ProgressSignal::StagesCompleted { count: a },
                    1 => ProgressSignal::StageReached { index: a },
                    _ => ProgressSignal::GoalsCompleted { completed: a, total: b },
                };
                state.reconcile(signal);
                prop_assert!(state.current_index() >= before);
                prop_assert!(state.current_index() <= n);
                for stage in &state.stages()[..state.current_index()] {
                    prop_assert!(state.completed_ids().contains(&stage.id));
                }
                prop_assert!(state.invariant_violations().is_empty());
            }
        }

        #[test]
        fn advance_steps_by_one(n in 3usize..=10, steps in 0usize..12) {
            let mut state = journey(n);
            for _ in 0..steps {
                let k = state.current_index();
                match state.advance() {
                    Ok(id) => {
                        prop_assert_eq!(state.current_index(), k + 1);
                        prop_assert!(state.completed_ids().contains(&id));
                    }
                    Err(e) => {
                        prop_assert_eq!(k, n);
                        prop_assert_eq!(e.code, ErrorCode::JourneyComplete);
                    }
                }
            }
        }
    }
}
