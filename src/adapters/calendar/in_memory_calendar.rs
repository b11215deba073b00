//! In-Memory Calendar Adapter
//!
//! Keeps created events in a map. Access can be denied and writes or
//! deletes can be made to fail, which is what tests need to exercise the
//! non-fatal calendar paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::journey::CalendarEventRef;
use crate::ports::{CalendarError, CalendarEventRequest, CalendarGateway};

/// In-memory calendar
#[derive(Debug, Clone)]
pub struct InMemoryCalendar {
    events: Arc<RwLock<HashMap<CalendarEventRef, CalendarEventRequest>>>,
    access_granted: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
    access_requests: Arc<AtomicUsize>,
}

impl Default for InMemoryCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCalendar {
    /// Creates a calendar that grants access and accepts writes.
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            access_granted: Arc::new(AtomicBool::new(true)),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
            access_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a calendar whose access prompt is always declined.
    pub fn denying_access() -> Self {
        let calendar = Self::new();
        calendar.set_access_granted(false);
        calendar
    }

    pub fn set_access_granted(&self, granted: bool) {
        self.access_granted.store(granted, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// How many times access was requested.
    pub fn access_request_count(&self) -> usize {
        self.access_requests.load(Ordering::SeqCst)
    }

    /// Number of events currently stored.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Looks up a stored event.
    pub async fn event(&self, event_ref: &CalendarEventRef) -> Option<CalendarEventRequest> {
        self.events.read().await.get(event_ref).cloned()
    }
}

#[async_trait]
impl CalendarGateway for InMemoryCalendar {
    async fn request_write_access(&self) -> bool {
        self.access_requests.fetch_add(1, Ordering::SeqCst);
        self.access_granted.load(Ordering::SeqCst)
    }

    async fn create_event(
        &self,
        request: CalendarEventRequest,
    ) -> Result<CalendarEventRef, CalendarError> {
        if !self.access_granted.load(Ordering::SeqCst) {
            return Err(CalendarError::AccessDenied);
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CalendarError::WriteFailed("calendar is read-only".to_string()));
        }

        let event_ref = CalendarEventRef::new(format!("mem-{}", Uuid::new_v4()));
        self.events.write().await.insert(event_ref.clone(), request);
        Ok(event_ref)
    }

    async fn delete_event(&self, event_ref: &CalendarEventRef) -> Result<(), CalendarError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CalendarError::WriteFailed("delete rejected".to_string()));
        }
        match self.events.write().await.remove(event_ref) {
            Some(_) => Ok(()),
            None => Err(CalendarError::EventNotFound(event_ref.to_string())),
        }
    }
}
