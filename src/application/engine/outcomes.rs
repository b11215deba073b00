//! Results of engine operations that can partially succeed.

use crate::domain::catalog::GenerationError;
use crate::domain::journey::{BusinessIdea, JourneyView, ProgressSignal, Reminder};
use crate::ports::CalendarError;

use crate::application::catalog::CatalogSource;

/// Non-fatal calendar problem attached to a reminder operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarWarning {
    AccessDenied,
    WriteFailed(String),
}

impl From<CalendarError> for CalendarWarning {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::AccessDenied => CalendarWarning::AccessDenied,
            other => CalendarWarning::WriteFailed(other.to_string()),
        }
    }
}

/// A reminder that was stored, plus any calendar warning.
#[derive(Debug, Clone)]
pub struct ReminderCreated {
    pub reminder: Reminder,
    pub warning: Option<CalendarWarning>,
}

/// Result of deleting a reminder. `reminder` is `None` if it did not exist.
#[derive(Debug, Clone)]
pub struct ReminderDeleted {
    pub reminder: Option<Reminder>,
    pub warning: Option<CalendarWarning>,
}

/// What an applied regeneration did.
#[derive(Debug, Clone)]
pub struct RegenerationReport {
    pub source: CatalogSource,
    pub failure: Option<GenerationError>,
    pub stage_count: usize,
    pub dropped_notes: usize,
    pub dropped_reminders: usize,
    pub calendar_warnings: Vec<CalendarWarning>,
}

impl RegenerationReport {
    pub fn used_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }
}

/// Result of a regeneration request.
#[derive(Debug, Clone)]
pub enum RegenerateOutcome {
    /// The new catalog replaced the old one.
    Applied(RegenerationReport),
    /// A newer regeneration was requested before this one resolved.
    Superseded { ticket: u64 },
    /// The selected idea changed before this one resolved.
    Abandoned { ticket: u64 },
}

impl RegenerateOutcome {
    pub fn report(&self) -> Option<&RegenerationReport> {
        match self {
            RegenerateOutcome::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// Result of applying an external progress signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The journey moved forward by `passed` stages.
    Advanced { passed: usize, current_index: usize },
    /// The signal did not move the journey.
    Unchanged,
    /// A regeneration was pending; the signal was discarded.
    DroppedDuringRegeneration,
}

/// Change pushed by the external business-plan store.
#[derive(Debug, Clone)]
pub enum ExternalChange {
    /// The user picked a different business idea.
    IdeaSelected(BusinessIdea),
    /// Dashboard goals were completed.
    GoalCompleted { completed: usize, total: usize },
    /// Any other progress signal.
    Progress(ProgressSignal),
}

/// Result of handling an [`ExternalChange`].
#[derive(Debug, Clone)]
pub enum ExternalOutcome {
    Selected(JourneyView),
    Reconciled(ReconcileOutcome),
}
