//! Calendar configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Calendar sync settings
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Length of the event created for a reminder
    #[serde(default = "default_event_duration")]
    pub event_duration_minutes: i64,

    /// Directory for exported `.ics` events
    #[serde(default = "default_ics_dir")]
    pub ics_dir: PathBuf,
}

impl CalendarConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.event_duration_minutes <= 0 {
            return Err(ValidationError::InvalidEventDuration);
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            event_duration_minutes: default_event_duration(),
            ics_dir: default_ics_dir(),
        }
    }
}

fn default_event_duration() -> i64 {
    60
}

fn default_ics_dir() -> PathBuf {
    PathBuf::from("./data/calendar")
}
