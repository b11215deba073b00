//! Calendar Adapters
//!
//! Implementations of the CalendarGateway port.
//!
//! - **InMemoryCalendar** - Event bookkeeping in memory, with access and failure switches
//! - **IcsCalendar** - One iCalendar (`.ics`) file per event in a directory

mod ics_calendar;
mod in_memory_calendar;

pub use ics_calendar::IcsCalendar;
pub use in_memory_calendar::InMemoryCalendar;
