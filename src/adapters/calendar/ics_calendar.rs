//! iCalendar File Adapter
//!
//! Writes one `.ics` file per event into a directory, which any desktop
//! calendar can import. The event reference is the file's UID.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::config::CalendarConfig;
use crate::domain::foundation::Timestamp;
use crate::domain::journey::CalendarEventRef;
use crate::ports::{CalendarError, CalendarEventRequest, CalendarGateway};

/// Directory of iCalendar files
#[derive(Debug, Clone)]
pub struct IcsCalendar {
    dir: PathBuf,
}

impl IcsCalendar {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(&config.ics_dir)
    }

    fn event_path(&self, uid: &str) -> PathBuf {
        self.dir.join(format!("{}.ics", uid))
    }

    /// Renders a single-event VCALENDAR document.
    pub fn render(uid: &str, request: &CalendarEventRequest, stamp: Timestamp) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//journey-engine//reminders//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", uid),
            format!("DTSTAMP:{}", stamp.to_ical()),
            format!("DTSTART:{}", request.start.to_ical()),
            format!("DTEND:{}", request.end.to_ical()),
            format!("SUMMARY:{}", escape_text(&request.title)),
        ];
        if !request.notes.is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&request.notes)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut document = lines.join("\r\n");
        document.push_str("\r\n");
        document
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[async_trait]
impl CalendarGateway for IcsCalendar {
    async fn request_write_access(&self) -> bool {
        match fs::create_dir_all(&self.dir).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "Calendar directory is not writable");
                false
            }
        }
    }

    async fn create_event(
        &self,
        request: CalendarEventRequest,
    ) -> Result<CalendarEventRef, CalendarError> {
        let uid = Uuid::new_v4().to_string();
        let document = Self::render(&uid, &request, Timestamp::now());

        fs::write(self.event_path(&uid), document)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => CalendarError::AccessDenied,
                _ => CalendarError::WriteFailed(e.to_string()),
            })?;

        Ok(CalendarEventRef::new(uid))
    }

    async fn delete_event(&self, event_ref: &CalendarEventRef) -> Result<(), CalendarError> {
        match fs::remove_file(self.event_path(event_ref.as_str())).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CalendarError::EventNotFound(event_ref.to_string()))
            }
            Err(e) => Err(CalendarError::WriteFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn render_escapes_text_and_formats_dates() {
        let start = Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap());
        let request = CalendarEventRequest::new("Call bank; ask, politely", "line1\nline2", start, 60);

        let ics = IcsCalendar::render("abc", &request, start);

        assert!(ics.contains("UID:abc\r\n"));
        assert!(ics.contains("DTSTART:20250301T093000Z\r\n"));
        assert!(ics.contains("DTEND:20250301T103000Z\r\n"));
        assert!(ics.contains("SUMMARY:Call bank\\; ask\\, politely\r\n"));
        assert!(ics.contains("DESCRIPTION:line1\\nline2\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn render_omits_empty_description() {
        let request = CalendarEventRequest::new("Launch", "", Timestamp::now(), 30);
        assert!(!IcsCalendar::render("x", &request, Timestamp::now()).contains("DESCRIPTION"));
    }

    #[tokio::test]
    async fn create_writes_file_and_delete_removes_it() {
        let temp_dir = TempDir::new().unwrap();
        let calendar = IcsCalendar::new(temp_dir.path().join("events"));

        assert!(calendar.request_write_access().await);
        let request = CalendarEventRequest::new("Launch", "", Timestamp::now(), 60);
        let event_ref = calendar.create_event(request).await.unwrap();

        let path = temp_dir.path().join("events").join(format!("{}.ics", event_ref));
        assert!(path.exists());

        calendar.delete_event(&event_ref).await.unwrap();
        assert!(!path.exists());
        assert!(matches!(
            calendar.delete_event(&event_ref).await,
            Err(CalendarError::EventNotFound(_))
        ));
    }
}
