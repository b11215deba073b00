//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `journey` - Progress aggregate, stages, notes, reminders and the read model
//! - `catalog` - Pure stage list builders (template and AI draft validation)

pub mod catalog;
pub mod foundation;
pub mod journey;
