//! JourneyEngine - orchestrates the stage catalog and the progress state.
//!
//! The engine owns the progress of the selected idea behind an async mutex.
//! The lock is never held across a call to an external collaborator: AI,
//! calendar and storage calls happen with the lock released, and their
//! results are applied afterwards in one step. Every applied mutation
//! re-projects the [`JourneyView`], publishes it on a watch channel,
//! broadcasts the recorded domain events and queues a snapshot with the
//! [`ProgressWriter`].

mod error;
mod outcomes;
mod settings;

pub use error::JourneyError;
pub use outcomes::{
    CalendarWarning, ExternalChange, ExternalOutcome, ReconcileOutcome, RegenerateOutcome,
    RegenerationReport, ReminderCreated, ReminderDeleted,
};
pub use settings::EngineSettings;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex, MutexGuard};

use crate::application::catalog::StageCatalog;
use crate::application::persistence::{ProgressWriter, WriterStats};
use crate::config::AppConfig;
use crate::domain::foundation::{
    DomainError, ErrorCode, NoteId, ReminderId, StageId, Timestamp, ValidationError,
};
use crate::domain::journey::{
    BusinessIdea, CalendarEventRef, JourneyEvent, JourneyView, Note, ProgressSignal,
    ProgressState, Reminder, ReminderDraft,
};
use crate::ports::{AIClient, CalendarError, CalendarEventRequest, CalendarGateway, ProgressStorage};

#[derive(Default)]
struct EngineState {
    idea: Option<BusinessIdea>,
    progress: Option<ProgressState>,
    /// Bumped on every idea selection.
    selection: u64,
    /// Last regeneration ticket handed out.
    latest_ticket: u64,
    /// Ticket of the regeneration whose result is still awaited.
    pending_ticket: Option<u64>,
}

fn active(state: &mut EngineState) -> Result<&mut ProgressState, JourneyError> {
    state.progress.as_mut().ok_or(JourneyError::NoActiveJourney)
}

/// Releases the pending flag if a regeneration future is dropped early.
///
/// When the state is locked at that moment the ticket is parked in
/// `cancelled_ticket` and cleared by the next [`JourneyEngine::lock_state`].
struct PendingRegeneration<'a> {
    engine: &'a JourneyEngine,
    ticket: u64,
    armed: bool,
}

impl PendingRegeneration<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingRegeneration<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.engine.state.try_lock() {
            Ok(mut state) => self.engine.release_ticket(&mut state, self.ticket),
            Err(_) => self.engine.cancelled_ticket.store(self.ticket, Ordering::SeqCst),
        }
    }
}

/// The journey progression engine.
pub struct JourneyEngine {
    catalog: StageCatalog,
    ai_client: Arc<dyn AIClient>,
    storage: Arc<dyn ProgressStorage>,
    calendar: Arc<dyn CalendarGateway>,
    writer: ProgressWriter,
    settings: EngineSettings,
    state: Mutex<EngineState>,
    /// Ticket of a regeneration dropped while the state was locked; 0 when none.
    cancelled_ticket: AtomicU64,
    views: watch::Sender<Option<JourneyView>>,
    events: broadcast::Sender<JourneyEvent>,
}

impl JourneyEngine {
    /// Creates an engine with explicitly injected collaborators.
    ///
    /// Must be called inside a tokio runtime; the persistence writer task
    /// is spawned here.
    pub fn new(
        ai_client: Arc<dyn AIClient>,
        storage: Arc<dyn ProgressStorage>,
        calendar: Arc<dyn CalendarGateway>,
        settings: EngineSettings,
    ) -> Self {
        let (views, _) = watch::channel(None);
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));
        Self {
            catalog: StageCatalog::new(Arc::clone(&ai_client), settings.catalog.clone()),
            writer: ProgressWriter::spawn(Arc::clone(&storage)),
            ai_client,
            storage,
            calendar,
            settings,
            state: Mutex::new(EngineState::default()),
            cancelled_ticket: AtomicU64::new(0),
            views,
            events,
        }
    }

    /// Creates an engine configured from [`AppConfig`].
    pub fn from_config(
        config: &AppConfig,
        ai_client: Arc<dyn AIClient>,
        storage: Arc<dyn ProgressStorage>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Self {
        Self::new(ai_client, storage, calendar, EngineSettings::from_config(config))
    }

    // ───────────────────────────────────────────────────────────────
    // Read side
    // ───────────────────────────────────────────────────────────────

    /// Latest read model, `None` until an idea is selected.
    pub fn view(&self) -> Option<JourneyView> {
        self.views.borrow().clone()
    }

    /// Receives a new read model after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Option<JourneyView>> {
        self.views.subscribe()
    }

    /// Receives every domain event the journey records.
    pub fn events(&self) -> broadcast::Receiver<JourneyEvent> {
        self.events.subscribe()
    }

    /// The idea the current journey belongs to.
    pub async fn current_idea(&self) -> Option<BusinessIdea> {
        self.lock_state().await.idea.clone()
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    /// Waits until every queued progress snapshot has been handled.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    pub fn writer_stats(&self) -> &WriterStats {
        self.writer.stats()
    }

    // ───────────────────────────────────────────────────────────────
    // Idea selection
    // ───────────────────────────────────────────────────────────────

    /// Makes `idea` the active journey.
    ///
    /// Reselecting the active idea keeps the in-memory progress. Otherwise
    /// the newest of the stored state and any snapshot the writer could not
    /// save yet is resumed, or a template journey of the default size is
    /// started. Any in-flight regeneration for the previous idea is
    /// abandoned.
    pub async fn select_idea(&self, idea: BusinessIdea) -> Result<JourneyView, JourneyError> {
        {
            let mut state = self.lock_state().await;
            if let Some(view) = self.keep_active(&mut state, &idea) {
                return Ok(view);
            }
        }

        self.writer.flush().await;
        let loaded = self.storage.load(idea.id).await?;
        let unsaved = self.writer.take_unsaved(idea.id).await;

        let resumed = match (loaded, unsaved) {
            (Some(stored), Some(unsaved)) if unsaved.revision() > stored.revision() => {
                Some((unsaved, true))
            }
            (Some(stored), _) => Some((stored, false)),
            (None, Some(unsaved)) => Some((unsaved, true)),
            (None, None) => None,
        };

        let (progress, persist) = match resumed {
            Some((mut progress, unsaved)) => {
                let repairs = progress.repair();
                if !repairs.is_empty() {
                    tracing::warn!(idea_id = %idea.id, ?repairs, "Repaired persisted progress");
                }
                tracing::info!(
                    idea_id = %idea.id,
                    revision = progress.revision(),
                    current_index = progress.current_index(),
                    unsaved,
                    "Resumed journey"
                );
                let persist = unsaved || !repairs.is_empty();
                (progress, persist)
            }
            None => {
                let stages = self.catalog.build_template(&idea);
                tracing::info!(idea_id = %idea.id, stage_count = stages.len(), "Started journey");
                (ProgressState::start(idea.id, stages), true)
            }
        };

        let mut state = self.lock_state().await;
        if let Some(view) = self.keep_active(&mut state, &idea) {
            return Ok(view);
        }

        if let Some(ticket) = state.pending_ticket.take() {
            tracing::info!(ticket, "Abandoning regeneration for previously selected idea");
        }
        state.selection += 1;
        state.idea = Some(idea);
        state.progress = Some(progress);

        self.publish(&mut state, persist)
            .ok_or(JourneyError::NoActiveJourney)
    }

    /// Republishes the current journey when `idea` is already active.
    fn keep_active(&self, state: &mut EngineState, idea: &BusinessIdea) -> Option<JourneyView> {
        if state.progress.as_ref()?.idea_id() != idea.id {
            return None;
        }
        tracing::debug!(idea_id = %idea.id, "Idea already active, keeping in-memory progress");
        state.idea = Some(idea.clone());
        self.publish(state, false)
    }

    /// Selects `selected`, or the first available idea when nothing is selected.
    ///
    /// Returns `None` without touching the engine when there are no ideas.
    pub async fn resolve_and_select(
        &self,
        selected: Option<&BusinessIdea>,
        available: &[BusinessIdea],
    ) -> Result<Option<JourneyView>, JourneyError> {
        match StageCatalog::resolve_idea(selected, available) {
            Some(idea) => self.select_idea(idea.clone()).await.map(Some),
            None => {
                tracing::debug!("No business idea available, journey not started");
                Ok(None)
            }
        }
    }

    /// Single entry point for changes pushed by the business-plan store.
    pub async fn handle_external(
        &self,
        change: ExternalChange,
    ) -> Result<ExternalOutcome, JourneyError> {
        match change {
            ExternalChange::IdeaSelected(idea) => {
                self.select_idea(idea).await.map(ExternalOutcome::Selected)
            }
            ExternalChange::GoalCompleted { completed, total } => self
                .reconcile(ProgressSignal::GoalsCompleted { completed, total })
                .await
                .map(ExternalOutcome::Reconciled),
            ExternalChange::Progress(signal) => {
                self.reconcile(signal).await.map(ExternalOutcome::Reconciled)
            }
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Stage progression
    // ───────────────────────────────────────────────────────────────

    /// Completes the current stage. Returns the id of the completed stage.
    pub async fn advance(&self) -> Result<StageId, JourneyError> {
        let mut state = self.lock_state().await;
        let completed = active(&mut state)?.advance()?;
        self.publish(&mut state, true);
        tracing::info!(stage_id = %completed, "Stage completed");
        Ok(completed)
    }

    /// Completes a named stage, which must be the current one.
    pub async fn complete_stage(&self, stage_id: &StageId) -> Result<(), JourneyError> {
        let mut state = self.lock_state().await;
        active(&mut state)?.complete_stage(stage_id)?;
        self.publish(&mut state, true);
        tracing::info!(%stage_id, "Stage completed");
        Ok(())
    }

    /// Applies an external progress signal.
    ///
    /// Signals arriving while a regeneration is pending are dropped, since
    /// the catalog they refer to is about to be replaced.
    pub async fn reconcile(&self, signal: ProgressSignal) -> Result<ReconcileOutcome, JourneyError> {
        let mut state = self.lock_state().await;
        active(&mut state)?;

        if let Some(ticket) = state.pending_ticket {
            tracing::info!(ticket, ?signal, "Dropping progress signal during regeneration");
            return Ok(ReconcileOutcome::DroppedDuringRegeneration);
        }

        let progress = active(&mut state)?;
        let passed = progress.reconcile(signal);
        if passed == 0 {
            tracing::debug!(?signal, "Progress signal did not move the journey");
            return Ok(ReconcileOutcome::Unchanged);
        }
        let current_index = progress.current_index();
        self.publish(&mut state, true);

        tracing::info!(passed, current_index, "Reconciled external progress");
        Ok(ReconcileOutcome::Advanced {
            passed,
            current_index,
        })
    }

    /// Replaces the stage catalog with a freshly built one and resets progress.
    ///
    /// Only the most recent request is applied; an older request that
    /// resolves later reports `Superseded`, and a request for an idea that
    /// is no longer selected reports `Abandoned`. Generation failures fall
    /// back to the template and are reported in the outcome.
    pub async fn regenerate(&self, desired_count: usize) -> Result<RegenerateOutcome, JourneyError> {
        let desired_count = self.catalog.bounds().check(desired_count)?;

        let (idea, ticket, selection) = {
            let mut state = self.lock_state().await;
            let idea = state.idea.clone().ok_or(JourneyError::NoActiveJourney)?;
            state.latest_ticket += 1;
            let ticket = state.latest_ticket;
            state.pending_ticket = Some(ticket);
            let selection = state.selection;
            self.publish(&mut state, false);
            (idea, ticket, selection)
        };
        let mut pending = PendingRegeneration {
            engine: self,
            ticket,
            armed: true,
        };

        tracing::info!(idea_id = %idea.id, ticket, desired_count, "Regenerating stage catalog");
        let build = self.catalog.build(&idea, desired_count).await?;

        let mut state = self.lock_state().await;
        pending.disarm();
        if state.selection != selection {
            tracing::info!(idea_id = %idea.id, ticket, "Discarding regeneration for deselected idea");
            return Ok(RegenerateOutcome::Abandoned { ticket });
        }
        if state.latest_ticket != ticket {
            tracing::info!(ticket, latest = state.latest_ticket, "Discarding superseded regeneration");
            return Ok(RegenerateOutcome::Superseded { ticket });
        }

        state.pending_ticket = None;
        let used_fallback = build.used_fallback();
        let progress = active(&mut state)?;
        let fallout = progress.regenerate(build.stages);
        let stage_count = progress.stages().len();
        self.publish(&mut state, true);
        drop(state);

        tracing::info!(
            idea_id = %idea.id,
            ticket,
            stage_count,
            used_fallback,
            dropped_notes = fallout.dropped_notes,
            dropped_reminders = fallout.dropped_reminders.len(),
            "Stage catalog replaced"
        );

        let calendar_warnings = self.remove_calendar_events(&fallout.dropped_reminders).await;

        Ok(RegenerateOutcome::Applied(RegenerationReport {
            source: build.source,
            failure: build.failure,
            stage_count,
            dropped_notes: fallout.dropped_notes,
            dropped_reminders: fallout.dropped_reminders.len(),
            calendar_warnings,
        }))
    }

    // ───────────────────────────────────────────────────────────────
    // Notes
    // ───────────────────────────────────────────────────────────────

    /// Appends a note to a stage. Locked stages accept notes too.
    pub async fn add_note(&self, stage_id: &StageId, content: &str) -> Result<Note, JourneyError> {
        let mut state = self.lock_state().await;
        let note = active(&mut state)?.add_note(stage_id, content)?;
        self.publish(&mut state, true);
        Ok(note)
    }

    /// Deletes a note. Returns `false` if it did not exist.
    pub async fn delete_note(&self, note_id: NoteId) -> Result<bool, JourneyError> {
        let mut state = self.lock_state().await;
        let deleted = active(&mut state)?.delete_note(note_id).is_some();
        if deleted {
            self.publish(&mut state, true);
        }
        Ok(deleted)
    }

    // ───────────────────────────────────────────────────────────────
    // Reminders
    // ───────────────────────────────────────────────────────────────

    /// Creates a reminder, mirroring it to the calendar when requested.
    ///
    /// Calendar problems never prevent the reminder from being stored; they
    /// come back as a warning and leave `calendar_event_ref` empty.
    pub async fn add_reminder(&self, draft: ReminderDraft) -> Result<ReminderCreated, JourneyError> {
        let mut reminder = draft.into_reminder()?;

        let idea_id = {
            let mut state = self.lock_state().await;
            let progress = active(&mut state)?;
            if let Some(stage_id) = &reminder.stage_id {
                if progress.stage(stage_id).is_none() {
                    return Err(DomainError::new(ErrorCode::StageNotFound, "Stage not found")
                        .with_detail("stage_id", stage_id.as_str())
                        .into());
                }
            }
            progress.idea_id()
        };

        let mut warning = None;
        if reminder.notify_via_calendar {
            match self.sync_to_calendar(&reminder).await {
                Ok(event_ref) => reminder.calendar_event_ref = Some(event_ref),
                Err(w) => warning = Some(w),
            }
        }

        let mut state = self.lock_state().await;
        let inserted = match state.progress.as_mut() {
            Some(progress) if progress.idea_id() == idea_id => progress
                .insert_reminder(reminder.clone())
                .map_err(JourneyError::from),
            _ => Err(JourneyError::NoActiveJourney),
        };

        match inserted {
            Ok(()) => {
                self.publish(&mut state, true);
                tracing::info!(reminder_id = %reminder.id, synced = reminder.calendar_event_ref.is_some(), "Reminder added");
                Ok(ReminderCreated { reminder, warning })
            }
            Err(err) => {
                drop(state);
                if let Some(event_ref) = &reminder.calendar_event_ref {
                    self.delete_calendar_event(event_ref).await;
                }
                Err(err)
            }
        }
    }

    /// Marks a reminder completed. Stage completion is unaffected.
    pub async fn complete_reminder(&self, reminder_id: ReminderId) -> Result<Reminder, JourneyError> {
        let mut state = self.lock_state().await;
        let reminder = active(&mut state)?.complete_reminder(reminder_id)?;
        self.publish(&mut state, true);
        Ok(reminder)
    }

    /// Deletes a reminder and best-effort deletes its calendar event.
    pub async fn delete_reminder(&self, reminder_id: ReminderId) -> Result<ReminderDeleted, JourneyError> {
        let removed = {
            let mut state = self.lock_state().await;
            let removed = active(&mut state)?.delete_reminder(reminder_id);
            if removed.is_some() {
                self.publish(&mut state, true);
            }
            removed
        };

        let warning = match removed.as_ref().and_then(|r| r.calendar_event_ref.as_ref()) {
            Some(event_ref) => self.delete_calendar_event(event_ref).await,
            None => None,
        };

        Ok(ReminderDeleted {
            reminder: removed,
            warning,
        })
    }

    /// Incomplete reminders scheduled at or before `now`, earliest first.
    pub async fn reminders_due(&self, now: Timestamp) -> Result<Vec<Reminder>, JourneyError> {
        let mut state = self.lock_state().await;
        let due = active(&mut state)?
            .reminders()
            .due(now)
            .into_iter()
            .cloned()
            .collect();
        Ok(due)
    }

    // ───────────────────────────────────────────────────────────────
    // Assistant
    // ───────────────────────────────────────────────────────────────

    /// Asks the AI assistant a question about the current journey.
    pub async fn ask_question(&self, question: &str) -> Result<String, JourneyError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::empty_field("question").into());
        }

        let context = {
            let mut state = self.lock_state().await;
            let regenerating = state.pending_ticket.is_some();
            let brief = state.idea.as_ref().map(BusinessIdea::brief);
            let progress = active(&mut state)?;
            let view = JourneyView::project(progress, &self.settings.layout, regenerating);
            match brief {
                Some(brief) => format!("Business idea: {} {}", brief, view.context_summary()),
                None => view.context_summary(),
            }
        };

        let answer = self
            .ai_client
            .answer_progress_question(question, &context)
            .await?;
        Ok(answer)
    }

    // ───────────────────────────────────────────────────────────────
    // Internals
    // ───────────────────────────────────────────────────────────────

    /// Locks the engine state, first clearing a regeneration that was
    /// cancelled while the lock was held elsewhere.
    async fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        let mut state = self.state.lock().await;
        let cancelled = self.cancelled_ticket.swap(0, Ordering::SeqCst);
        if cancelled != 0 {
            self.release_ticket(&mut state, cancelled);
        }
        state
    }

    /// Clears the pending flag of a cancelled regeneration and republishes.
    fn release_ticket(&self, state: &mut EngineState, ticket: u64) {
        if state.pending_ticket == Some(ticket) {
            state.pending_ticket = None;
            tracing::info!(ticket, "Regeneration cancelled before completion");
            self.publish(state, false);
        }
    }

    /// Broadcasts pending events, queues a save and publishes a fresh view.
    fn publish(&self, state: &mut EngineState, persist: bool) -> Option<JourneyView> {
        let regenerating = state.pending_ticket.is_some();
        let progress = state.progress.as_mut()?;

        for event in progress.take_events() {
            tracing::debug!(
                idea_id = %progress.idea_id(),
                revision = progress.revision(),
                event = event.event_type(),
                "Journey event"
            );
            let _ = self.events.send(event);
        }

        if persist {
            self.writer.enqueue(progress.clone());
        }

        let view = JourneyView::project(progress, &self.settings.layout, regenerating);
        self.views.send_replace(Some(view.clone()));
        Some(view)
    }

    async fn sync_to_calendar(&self, reminder: &Reminder) -> Result<CalendarEventRef, CalendarWarning> {
        if !self.calendar.request_write_access().await {
            tracing::warn!(reminder_id = %reminder.id, "Calendar access denied, reminder kept locally");
            return Err(CalendarWarning::AccessDenied);
        }

        let request = CalendarEventRequest::new(
            &reminder.title,
            &reminder.message,
            reminder.scheduled_date,
            self.settings.event_duration_minutes,
        );
        self.calendar.create_event(request).await.map_err(|err| {
            tracing::warn!(reminder_id = %reminder.id, error = %err, "Calendar write failed, reminder kept locally");
            CalendarWarning::from(err)
        })
    }

    async fn delete_calendar_event(&self, event_ref: &CalendarEventRef) -> Option<CalendarWarning> {
        match self.calendar.delete_event(event_ref).await {
            Ok(()) | Err(CalendarError::EventNotFound(_)) => None,
            Err(err) => {
                tracing::warn!(%event_ref, error = %err, "Failed to delete calendar event");
                Some(CalendarWarning::from(err))
            }
        }
    }

    async fn remove_calendar_events(&self, reminders: &[Reminder]) -> Vec<CalendarWarning> {
        let mut warnings = Vec::new();
        for event_ref in reminders.iter().filter_map(|r| r.calendar_event_ref.as_ref()) {
            if let Some(warning) = self.delete_calendar_event(event_ref).await {
                warnings.push(warning);
            }
        }
        warnings
    }
}
