//! Journey Engine - guided progression through a business-idea roadmap
//!
//! This crate turns a selected business idea into an ordered list of stages,
//! tracks the user's position along it, and keeps notes and reminders
//! attached to stages. Stage lists come from an AI client with a
//! deterministic template as fallback. Progress is persisted in the
//! background and published as a reactive read model.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

pub use application::{JourneyEngine, JourneyError};
pub use config::AppConfig;
