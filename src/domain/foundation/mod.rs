//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the journey domain.

mod errors;
mod ids;
mod percentage;
mod stage_status;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{IdeaId, NoteId, ReminderId, StageId};
pub use percentage::Percentage;
pub use stage_status::StageStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
