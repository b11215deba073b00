//! Calendar Gateway Port - Interface for the device calendar.
//!
//! Reminders can be mirrored as calendar events. Every calendar call may
//! fail independently of the reminder it belongs to.

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::domain::journey::CalendarEventRef;

/// An event to create in the external calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventRequest {
    pub title: String,
    pub notes: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl CalendarEventRequest {
    /// Creates a request for an event lasting `duration_minutes` from `start`.
    pub fn new(
        title: impl Into<String>,
        notes: impl Into<String>,
        start: Timestamp,
        duration_minutes: i64,
    ) -> Self {
        Self {
            title: title.into(),
            notes: notes.into(),
            start,
            end: start.plus_minutes(duration_minutes),
        }
    }
}

/// Calendar errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar access denied")]
    AccessDenied,

    #[error("Calendar write failed: {0}")]
    WriteFailed(String),

    #[error("Calendar event not found: {0}")]
    EventNotFound(String),
}

/// Port for calendar side effects
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Asks for permission to write events. Returns whether it was granted.
    async fn request_write_access(&self) -> bool;

    /// Creates an event and returns its external reference.
    async fn create_event(
        &self,
        request: CalendarEventRequest,
    ) -> Result<CalendarEventRef, CalendarError>;

    /// Deletes an event previously created by this gateway.
    async fn delete_event(&self, event_ref: &CalendarEventRef) -> Result<(), CalendarError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_end_is_start_plus_duration() {
        let start = Timestamp::now();
        let request = CalendarEventRequest::new("Call supplier", "", start, 45);
        assert_eq!(request.end, start.plus_minutes(45));
    }
}
