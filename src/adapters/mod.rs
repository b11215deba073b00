//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the journey engine to external systems:
//! - `ai` - AI clients (mock, offline)
//! - `storage` - Progress persistence (file, in-memory)
//! - `calendar` - Calendar gateways (iCalendar files, in-memory)

pub mod ai;
pub mod calendar;
pub mod storage;

pub use ai::{MockAIClient, UnavailableAIClient};
pub use calendar::{IcsCalendar, InMemoryCalendar};
pub use storage::{FileProgressStorage, InMemoryProgressStorage};
