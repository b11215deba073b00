//! Application layer - orchestration over the journey domain.
//!
//! - `catalog` - builds stage lists from AI generation or the template
//! - `persistence` - ordered background saving of progress snapshots
//! - `engine` - the [`JourneyEngine`] driving one active journey

pub mod catalog;
pub mod engine;
pub mod persistence;

pub use catalog::{CatalogBuild, CatalogSettings, CatalogSource, StageCatalog};
pub use engine::{
    CalendarWarning, EngineSettings, ExternalChange, ExternalOutcome, JourneyEngine, JourneyError,
    ReconcileOutcome, RegenerateOutcome, RegenerationReport, ReminderCreated, ReminderDeleted,
};
pub use persistence::{ProgressWriter, WriterStats};
