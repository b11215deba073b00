//! Reminders, optionally scoped to a stage and mirrored to a calendar.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ReminderId, StageId, Timestamp, ValidationError};

/// Opaque reference to an event in the external calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarEventRef(String);

impl CalendarEventRef {
    /// Wraps an adapter-specific event identifier.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarEventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scheduled nudge the user set for themselves.
///
/// Completion of a reminder is independent of stage completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    /// `None` for reminders not tied to any stage.
    pub stage_id: Option<StageId>,
    pub title: String,
    pub message: String,
    /// May lie in the past; reminders record intent, not a schedule guarantee.
    pub scheduled_date: Timestamp,
    pub is_completed: bool,
    pub notify_via_calendar: bool,
    pub calendar_event_ref: Option<CalendarEventRef>,
}

/// Input for creating a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDraft {
    pub stage_id: Option<StageId>,
    pub title: String,
    pub message: String,
    pub scheduled_date: Timestamp,
    pub notify_via_calendar: bool,
}

impl ReminderDraft {
    /// Creates an unscoped draft without calendar sync.
    pub fn new(title: impl Into<String>, scheduled_date: Timestamp) -> Self {
        Self {
            stage_id: None,
            title: title.into(),
            message: String::new(),
            scheduled_date,
            notify_via_calendar: false,
        }
    }

    /// Scopes the reminder to a stage.
    pub fn for_stage(mut self, stage_id: StageId) -> Self {
        self.stage_id = Some(stage_id);
        self
    }

    /// Sets the message body.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Requests a mirrored calendar event.
    pub fn with_calendar(mut self, notify: bool) -> Self {
        self.notify_via_calendar = notify;
        self
    }

    /// Validates the draft and turns it into a reminder without a calendar reference.
    pub fn into_reminder(self) -> Result<Reminder, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Reminder {
            id: ReminderId::new(),
            stage_id: self.stage_id,
            title: title.to_string(),
            message: self.message,
            scheduled_date: self.scheduled_date,
            is_completed: false,
            notify_via_calendar: self.notify_via_calendar,
            calendar_event_ref: None,
        })
    }
}

/// All reminders of a journey, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderStore {
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a reminder.
    pub fn insert(&mut self, reminder: Reminder) {
        self.reminders.push(reminder);
    }

    /// Looks a reminder up by id.
    pub fn get(&self, id: ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// Marks a reminder completed. Completing twice is harmless.
    pub fn complete(&mut self, id: ReminderId) -> Option<&Reminder> {
        let reminder = self.reminders.iter_mut().find(|r| r.id == id)?;
        reminder.is_completed = true;
        Some(&*reminder)
    }

    /// Removes a reminder by id.
    pub fn delete(&mut self, id: ReminderId) -> Option<Reminder> {
        let position = self.reminders.iter().position(|r| r.id == id)?;
        Some(self.reminders.remove(position))
    }

    /// Reminders with the given scope (`None` selects unscoped reminders).
    pub fn for_scope(&self, scope: Option<&StageId>) -> Vec<&Reminder> {
        self.reminders
            .iter()
            .filter(|r| r.stage_id.as_ref() == scope)
            .collect()
    }

    /// Removes every stage-scoped reminder, returning them.
    pub fn drain_scoped(&mut self) -> Vec<Reminder> {
        let (scoped, unscoped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.reminders)
            .into_iter()
            .partition(|r| r.stage_id.is_some());
        self.reminders = unscoped;
        scoped
    }

    /// Removes reminders scoped to stages rejected by `keep`, returning them.
    pub fn drain_orphans(&mut self, mut keep: impl FnMut(&StageId) -> bool) -> Vec<Reminder> {
        let (orphans, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.reminders)
            .into_iter()
            .partition(|r| r.stage_id.as_ref().is_some_and(|s| !keep(s)));
        self.reminders = kept;
        orphans
    }

    /// Incomplete reminders scheduled at or before `now`, earliest first.
    pub fn due(&self, now: Timestamp) -> Vec<&Reminder> {
        let mut due: Vec<&Reminder> = self
            .reminders
            .iter()
            .filter(|r| !r.is_completed && !r.scheduled_date.is_after(&now))
            .collect();
        due.sort_by_key(|r| r.scheduled_date);
        due
    }

    /// Iterates all reminders.
    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    /// Number of reminders.
    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    /// Returns true if there are no reminders.
    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: &str) -> StageId {
        StageId::new(id).unwrap()
    }

    fn reminder(title: &str, scope: Option<&str>, at: Timestamp) -> Reminder {
        let mut draft = ReminderDraft::new(title, at);
        if let Some(s) = scope {
            draft = draft.for_stage(stage(s));
        }
        draft.into_reminder().unwrap()
    }

    #[test]
    fn into_reminder_rejects_blank_title() {
        let result = ReminderDraft::new("   ", Timestamp::now()).into_reminder();
        assert_eq!(result, Err(ValidationError::empty_field("title")));
    }

    #[test]
    fn into_reminder_accepts_past_dates() {
        let past = Timestamp::now().add_days(-30);
        let r = ReminderDraft::new("File taxes", past).into_reminder().unwrap();
        assert_eq!(r.scheduled_date, past);
        assert!(!r.is_completed);
        assert!(r.calendar_event_ref.is_none());
    }

    #[test]
    fn complete_marks_reminder() {
        let mut store = ReminderStore::new();
        let r = reminder("Call bank", None, Timestamp::now());
        let id = r.id;
        store.insert(r);

        assert!(store.complete(id).unwrap().is_completed);
        assert!(store.complete(ReminderId::new()).is_none());
    }

    #[test]
    fn for_scope_separates_stage_and_unscoped() {
        let mut store = ReminderStore::new();
        store.insert(reminder("a", Some("s1"), Timestamp::now()));
        store.insert(reminder("b", None, Timestamp::now()));
        store.insert(reminder("c", Some("s1"), Timestamp::now()));

        assert_eq!(store.for_scope(Some(&stage("s1"))).len(), 2);
        assert_eq!(store.for_scope(None).len(), 1);
        assert!(store.for_scope(Some(&stage("s2"))).is_empty());
    }

    #[test]
    fn drain_scoped_keeps_unscoped() {
        let mut store = ReminderStore::new();
        store.insert(reminder("a", Some("s1"), Timestamp::now()));
        store.insert(reminder("b", None, Timestamp::now()));

        let drained = store.drain_scoped();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].title, "a");
        assert_eq!(store.len(), 1);
        assert_eq!(store.for_scope(None)[0].title, "b");
    }

    #[test]
    fn drain_orphans_removes_unknown_stages_only() {
        let mut store = ReminderStore::new();
        store.insert(reminder("keep", Some("s1"), Timestamp::now()));
        store.insert(reminder("drop", Some("gone"), Timestamp::now()));
        store.insert(reminder("free", None, Timestamp::now()));

        let orphans = store.drain_orphans(|s| s.as_str() == "s1");
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].title, "drop");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn due_lists_incomplete_past_reminders_in_date_order() {
        let now = Timestamp::now();
        let mut store = ReminderStore::new();
        store.insert(reminder("later", None, now.add_days(2)));
        store.insert(reminder("yesterday", None, now.add_days(-1)));
        store.insert(reminder("last week", None, now.add_days(-7)));
        let done = reminder("done", None, now.add_days(-3));
        let done_id = done.id;
        store.insert(done);
        store.complete(done_id);

        let titles: Vec<_> = store.due(now).iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["last week", "yesterday"]);
    }
}
