//! Journey module - the progress aggregate and everything attached to it.
//!
//! A journey is the ordered stage list built for one [`BusinessIdea`] plus the
//! user's position within it. [`ProgressState`] is the only mutable aggregate;
//! stages, notes and reminders are values it owns.

mod events;
mod idea;
mod layout;
mod notes;
mod progress;
mod reminders;
mod stage;
mod view;

pub use events::JourneyEvent;
pub use idea::{BusinessIdea, Difficulty, IdeaCategory};
pub use layout::{BoatPosition, IslandLayout};
pub use notes::{Note, NotesStore};
pub use progress::{ProgressSignal, ProgressState, RegenerationFallout};
pub use reminders::{CalendarEventRef, Reminder, ReminderDraft, ReminderStore};
pub use stage::{Stage, StageDraft, StageKind};
pub use view::{JourneyView, StageView};
