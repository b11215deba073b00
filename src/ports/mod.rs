//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the journey engine and the outside world. Adapters implement these ports.
//!
//! - `AIClient` - Stage generation and progress Q&A
//! - `ProgressStorage` - Load/save of the progress aggregate
//! - `CalendarGateway` - Calendar events mirrored from reminders

mod ai_client;
mod calendar;
mod progress_storage;

pub use ai_client::{AIClient, AIError};
pub use calendar::{CalendarError, CalendarEventRequest, CalendarGateway};
pub use progress_storage::{ProgressStorage, StorageError};
